//! Author identities: per-article sightings and the name → ids aggregate.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A (name, id) pair observed on one article page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorSighting {
    pub name: String,
    pub id: String,
}

impl AuthorSighting {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Distinct author names mapped to every id observed for that name.
///
/// Names are compared exactly (case-sensitive). A name only enters the map
/// together with an id, so no entry ever has an empty id set; deserialization
/// rejects input that would break this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, BTreeSet<String>>",
    into = "BTreeMap<String, BTreeSet<String>>"
)]
pub struct AuthorMap {
    authors: BTreeMap<String, BTreeSet<String>>,
}

/// Author maps keyed by year, as persisted in `author_info.json`.
pub type AuthorInfo = BTreeMap<String, AuthorMap>;

impl AuthorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one sighting in. Returns `true` if the id was new for that name.
    pub fn insert(&mut self, sighting: AuthorSighting) -> bool {
        self.authors
            .entry(sighting.name)
            .or_default()
            .insert(sighting.id)
    }

    /// Union another map into this one.
    pub fn merge(&mut self, other: &AuthorMap) {
        for (name, ids) in &other.authors {
            self.authors
                .entry(name.clone())
                .or_default()
                .extend(ids.iter().cloned());
        }
    }

    pub fn ids_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.authors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.authors.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.authors.keys().map(String::as_str)
    }

    /// Every id observed in this map, regardless of name.
    pub fn all_ids(&self) -> BTreeSet<String> {
        self.authors.values().flatten().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.authors.iter().map(|(name, ids)| (name.as_str(), ids))
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}

impl Extend<AuthorSighting> for AuthorMap {
    fn extend<I: IntoIterator<Item = AuthorSighting>>(&mut self, iter: I) {
        for sighting in iter {
            self.insert(sighting);
        }
    }
}

impl FromIterator<AuthorSighting> for AuthorMap {
    fn from_iter<I: IntoIterator<Item = AuthorSighting>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

/// Error for persisted author data that breaks the non-empty id invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("author \"{0}\" has no ids")]
pub struct EmptyIdSetError(pub String);

impl TryFrom<BTreeMap<String, BTreeSet<String>>> for AuthorMap {
    type Error = EmptyIdSetError;

    fn try_from(authors: BTreeMap<String, BTreeSet<String>>) -> Result<Self, Self::Error> {
        if let Some((name, _)) = authors.iter().find(|(_, ids)| ids.is_empty()) {
            return Err(EmptyIdSetError(name.clone()));
        }
        Ok(Self { authors })
    }
}

impl From<AuthorMap> for BTreeMap<String, BTreeSet<String>> {
    fn from(map: AuthorMap) -> Self {
        map.authors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sightings() -> Vec<AuthorSighting> {
        vec![
            AuthorSighting::new("Alice", "1"),
            AuthorSighting::new("Bob", "2"),
            AuthorSighting::new("Alice", "1"),
            AuthorSighting::new("Bob", "3"),
            AuthorSighting::new("alice", "4"),
        ]
    }

    #[test]
    fn test_merges_ids_by_exact_name() {
        let map: AuthorMap = sightings().into_iter().collect();
        assert_eq!(map.len(), 3);
        assert_eq!(map.ids_of("Alice").unwrap().len(), 1);
        assert_eq!(map.ids_of("Bob").unwrap().len(), 2);
        // case-sensitive key
        assert_eq!(
            map.ids_of("alice").unwrap().iter().collect::<Vec<_>>(),
            vec!["4"]
        );
    }

    #[test]
    fn test_order_independent() {
        let forward: AuthorMap = sightings().into_iter().collect();
        let reverse: AuthorMap = sightings().into_iter().rev().collect();

        let mut rotated = sightings();
        rotated.rotate_left(2);
        let rotated: AuthorMap = rotated.into_iter().collect();

        assert_eq!(forward, reverse);
        assert_eq!(forward, rotated);
    }

    #[test]
    fn test_no_empty_id_sets() {
        let map: AuthorMap = sightings().into_iter().collect();
        assert!(map.iter().all(|(_, ids)| !ids.is_empty()));
        assert!(AuthorMap::new().iter().next().is_none());
    }

    #[test]
    fn test_insert_reports_new_ids() {
        let mut map = AuthorMap::new();
        assert!(map.insert(AuthorSighting::new("Alice", "1")));
        assert!(!map.insert(AuthorSighting::new("Alice", "1")));
        assert!(map.insert(AuthorSighting::new("Alice", "2")));
    }

    #[test]
    fn test_ids_only_grow() {
        let mut map = AuthorMap::new();
        let mut previous = 0;
        for sighting in sightings() {
            map.insert(sighting);
            let size = map.ids_of("Bob").map_or(0, BTreeSet::len);
            assert!(size >= previous);
            previous = size;
        }
    }

    #[test]
    fn test_merge_unions_ids() {
        let mut a: AuthorMap = vec![AuthorSighting::new("Alice", "1")].into_iter().collect();
        let b: AuthorMap = vec![
            AuthorSighting::new("Alice", "9"),
            AuthorSighting::new("Carol", "5"),
        ]
        .into_iter()
        .collect();
        a.merge(&b);
        assert_eq!(a.ids_of("Alice").unwrap().len(), 2);
        assert!(a.contains("Carol"));
        assert_eq!(a.all_ids().len(), 3);
    }

    #[test]
    fn test_json_round_trip() {
        let map: AuthorMap = sightings().into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        let back: AuthorMap = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }

    #[test]
    fn test_rejects_empty_id_list() {
        let result: Result<AuthorMap, _> = serde_json::from_str(r#"{"Alice": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_reads_unordered_id_lists() {
        let map: AuthorMap = serde_json::from_str(r#"{"Bob": ["3", "2", "3"]}"#).unwrap();
        assert_eq!(
            map.ids_of("Bob").unwrap().iter().collect::<Vec<_>>(),
            vec!["2", "3"]
        );
    }
}

#[cfg(test)]
mod proptest_author_map {
    use super::*;
    use proptest::prelude::*;

    fn sighting() -> impl Strategy<Value = AuthorSighting> {
        ("[A-Ca-c][a-z]{0,3}", "[0-9]{1,3}").prop_map(|(name, id)| AuthorSighting::new(name, id))
    }

    fn sightings() -> impl Strategy<Value = Vec<AuthorSighting>> {
        prop::collection::vec(sighting(), 0..40)
    }

    fn author_info() -> impl Strategy<Value = AuthorInfo> {
        prop::collection::btree_map(
            "20[0-2][0-9]",
            sightings().prop_map(|s| s.into_iter().collect::<AuthorMap>()),
            0..4,
        )
    }

    proptest! {
        #[test]
        fn prop_aggregate_ignores_sighting_order(
            (original, shuffled) in sightings().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
        ) {
            let forward: AuthorMap = original.into_iter().collect();
            let reordered: AuthorMap = shuffled.into_iter().collect();
            prop_assert_eq!(forward, reordered);
        }

        #[test]
        fn prop_every_name_has_ids(sightings in sightings()) {
            let map: AuthorMap = sightings.iter().cloned().collect();

            prop_assert!(map.iter().all(|(_, ids)| !ids.is_empty()));
            for sighting in &sightings {
                let ids = map.ids_of(&sighting.name);
                prop_assert!(ids.is_some_and(|ids| ids.contains(&sighting.id)));
            }
        }

        #[test]
        fn prop_deserialization_rejects_empty_id_sets(
            raw in prop::collection::btree_map(
                "[a-c]{1,3}",
                prop::collection::btree_set("[0-9]{1,2}", 0..3),
                0..6,
            )
        ) {
            let has_empty = raw.values().any(BTreeSet::is_empty);
            let json = serde_json::to_string(&raw).unwrap();
            let parsed = serde_json::from_str::<AuthorMap>(&json);

            prop_assert_eq!(parsed.is_err(), has_empty);
            if let Ok(map) = parsed {
                prop_assert!(map.iter().all(|(_, ids)| !ids.is_empty()));
            }
        }

        #[test]
        fn prop_author_info_json_round_trip(info in author_info()) {
            let json = serde_json::to_string(&info).unwrap();
            let back: AuthorInfo = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(info, back);
        }
    }
}
