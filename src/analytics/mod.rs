//! Cross-year analytics over per-year author maps.
//!
//! - [`multi_profile_authors`]: names that map to more than one id anywhere in the corpus
//! - [`overlap_report`]: intersections and unions of per-year name (or id) sets
//!
//! A year missing from the input takes part as the empty set.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::AuthorInfo;

/// Which identity key the overlap statistics are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityKey {
    /// Author names (the aggregate's dedup key)
    Name,
    /// Author ids, all ids of a year pooled together
    Id,
}

/// One set-algebra statistic with its members for auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlap {
    pub label: String,
    pub members: BTreeSet<String>,
}

impl Overlap {
    pub fn count(&self) -> usize {
        self.members.len()
    }
}

/// Names whose ids, unioned across every year, number more than one.
pub fn multi_profile_authors(info: &AuthorInfo) -> BTreeMap<String, BTreeSet<String>> {
    let mut ids_by_name: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for authors in info.values() {
        for (name, ids) in authors.iter() {
            ids_by_name
                .entry(name.to_string())
                .or_default()
                .extend(ids.iter().cloned());
        }
    }
    ids_by_name.retain(|_, ids| ids.len() > 1);
    ids_by_name
}

/// The key set of one year; empty when the year is absent.
pub fn year_keys(info: &AuthorInfo, year: &str, key: IdentityKey) -> BTreeSet<String> {
    match (info.get(year), key) {
        (None, _) => BTreeSet::new(),
        (Some(authors), IdentityKey::Name) => authors.names().map(str::to_string).collect(),
        (Some(authors), IdentityKey::Id) => authors.all_ids(),
    }
}

pub fn intersect_all(sets: &[BTreeSet<String>]) -> BTreeSet<String> {
    let Some((first, rest)) = sets.split_first() else {
        return BTreeSet::new();
    };
    rest.iter().fold(first.clone(), |acc, set| {
        acc.intersection(set).cloned().collect()
    })
}

pub fn union_all(sets: &[BTreeSet<String>]) -> BTreeSet<String> {
    sets.iter().flatten().cloned().collect()
}

/// Overlap statistics for `years` in the given order, treating the last one as
/// the target year:
///
/// - every pairwise intersection (`2001 & 2002`, `2001 & 2021`, `2002 & 2021`)
/// - the union of the earlier years intersected with the target (`(2001 | 2002) & 2021`)
/// - the intersection of all years (`2001 & 2002 & 2021`)
///
/// The last two only appear with three or more years, where they differ from the
/// pairwise ones.
pub fn overlap_report(info: &AuthorInfo, years: &[String], key: IdentityKey) -> Vec<Overlap> {
    let sets: Vec<BTreeSet<String>> = years.iter().map(|y| year_keys(info, y, key)).collect();
    let mut report = Vec::new();

    for i in 0..years.len() {
        for j in (i + 1)..years.len() {
            report.push(Overlap {
                label: format!("{} & {}", years[i], years[j]),
                members: sets[i].intersection(&sets[j]).cloned().collect(),
            });
        }
    }

    if let (true, Some((target, earlier)), Some((target_year, earlier_years))) =
        (years.len() >= 3, sets.split_last(), years.split_last())
    {
        report.push(Overlap {
            label: format!("({}) & {}", earlier_years.join(" | "), target_year),
            members: union_all(earlier).intersection(target).cloned().collect(),
        });
        report.push(Overlap {
            label: years.join(" & "),
            members: intersect_all(&sets),
        });
    }

    report
}

/// Everything printed after an author run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorReport {
    /// year → number of distinct names
    pub year_sizes: BTreeMap<String, usize>,
    pub multi_profile: BTreeMap<String, BTreeSet<String>>,
    pub name_overlaps: Vec<Overlap>,
    pub id_overlaps: Vec<Overlap>,
}

impl AuthorReport {
    pub fn build(info: &AuthorInfo, years: &[String]) -> Self {
        Self {
            year_sizes: years
                .iter()
                .map(|y| (y.clone(), info.get(y).map_or(0, |a| a.len())))
                .collect(),
            multi_profile: multi_profile_authors(info),
            name_overlaps: overlap_report(info, years, IdentityKey::Name),
            id_overlaps: overlap_report(info, years, IdentityKey::Id),
        }
    }
}
