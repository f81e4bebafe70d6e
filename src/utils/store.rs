//! JSON result files under the configured results directory.
//!
//! # Layout
//!
//! ```text
//! results/
//!   author_info.json         year → name → [id, ...]
//!   university_info.json     year → institution → count
//!   other_info.json          year → institution → count
//!   manual_info.json         [url, ...]
//!   universities.json        [institution, ...]
//!   paper_affiliations.json  year → article link → [institution, ...]
//! ```
//!
//! `author_info.json` doubles as the author crawl cache: when it exists and
//! parses, the crawl is skipped for the whole run.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::PathBuf;

use crate::models::{AuthorInfo, ManualCheckList};

pub const AUTHOR_INFO_FILE: &str = "author_info.json";
pub const UNIVERSITY_INFO_FILE: &str = "university_info.json";
pub const OTHER_INFO_FILE: &str = "other_info.json";
pub const MANUAL_INFO_FILE: &str = "manual_info.json";
pub const UNIVERSITIES_FILE: &str = "universities.json";
pub const PAPER_AFFILIATIONS_FILE: &str = "paper_affiliations.json";

/// year → institution → count
pub type InstitutionCounts = BTreeMap<String, BTreeMap<String, u64>>;

/// year → article link → institutions
pub type PaperAffiliations = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads and writes the result files of one results directory.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Previously saved author maps, or `None` if the file does not exist.
    ///
    /// A file that exists but does not hold valid author maps is an error
    /// rather than a cache miss.
    pub fn load_authors(&self) -> Result<Option<AuthorInfo>, StoreError> {
        self.read_json(AUTHOR_INFO_FILE)
    }

    pub fn save_authors(&self, info: &AuthorInfo) -> Result<PathBuf, StoreError> {
        self.write_json(AUTHOR_INFO_FILE, info)
    }

    pub fn save_university_info(&self, counts: &InstitutionCounts) -> Result<PathBuf, StoreError> {
        self.write_json(UNIVERSITY_INFO_FILE, counts)
    }

    pub fn save_other_info(&self, counts: &InstitutionCounts) -> Result<PathBuf, StoreError> {
        self.write_json(OTHER_INFO_FILE, counts)
    }

    pub fn save_universities(&self, universities: &[String]) -> Result<PathBuf, StoreError> {
        self.write_json(UNIVERSITIES_FILE, universities)
    }

    pub fn save_paper_affiliations(
        &self,
        papers: &PaperAffiliations,
    ) -> Result<PathBuf, StoreError> {
        self.write_json(PAPER_AFFILIATIONS_FILE, papers)
    }

    /// Append the URLs of `manual` to `manual_info.json`, keeping what an
    /// earlier run already recorded. A URL is listed once, at its first
    /// position.
    pub fn record_manual(&self, manual: &ManualCheckList) -> Result<Vec<String>, StoreError> {
        let mut urls: Vec<String> = self.read_json(MANUAL_INFO_FILE)?.unwrap_or_default();
        let mut seen: HashSet<String> = HashSet::new();
        urls.retain(|url| seen.insert(url.clone()));
        for url in manual.urls() {
            if seen.insert(url.clone()) {
                urls.push(url);
            }
        }
        self.write_json(MANUAL_INFO_FILE, &urls)?;
        Ok(urls)
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, StoreError> {
        let path = self.path(file);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Json { path, source })
    }

    fn write_json<T: Serialize + ?Sized>(
        &self,
        file: &str,
        value: &T,
    ) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path(file);
        let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::info!("saved {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthorMap, AuthorSighting, ManualCheck};
    use tempfile::TempDir;

    fn info() -> AuthorInfo {
        let mut info = AuthorInfo::new();
        let authors: AuthorMap = vec![
            AuthorSighting::new("Alice Smith", "81100000001"),
            AuthorSighting::new("Bob Jones", "81100000002"),
            AuthorSighting::new("Bob Jones", "81100000003"),
        ]
        .into_iter()
        .collect();
        info.insert("2001".to_string(), authors);
        info.insert("2002".to_string(), AuthorMap::new());
        info
    }

    #[test]
    fn test_author_info_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path());

        assert!(store.load_authors().unwrap().is_none());

        let saved = info();
        store.save_authors(&saved).unwrap();
        let loaded = store.load_authors().unwrap().unwrap();

        assert_eq!(loaded, saved);
        assert_eq!(loaded["2001"].ids_of("Bob Jones").unwrap().len(), 2);
    }

    #[test]
    fn test_author_info_shape_on_disk() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path());
        store.save_authors(&info()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path(AUTHOR_INFO_FILE)).unwrap())
                .unwrap();
        assert_eq!(raw["2001"]["Alice Smith"], serde_json::json!(["81100000001"]));
        assert_eq!(raw["2002"], serde_json::json!({}));
    }

    #[test]
    fn test_empty_id_list_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path());
        fs::write(
            store.path(AUTHOR_INFO_FILE),
            r#"{"2001": {"Alice Smith": []}}"#,
        )
        .unwrap();

        assert!(matches!(store.load_authors(), Err(StoreError::Json { .. })));
    }

    #[test]
    fn test_record_manual_appends() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path().join("nested"));

        let mut first = ManualCheckList::new();
        first.push(ManualCheck::new("https://dl.acm.org/doi/1", "missing id"));
        store.record_manual(&first).unwrap();

        let mut second = ManualCheckList::new();
        second.push(ManualCheck::new("https://dl.acm.org/profile/2", "no institutions"));
        let urls = store.record_manual(&second).unwrap();

        assert_eq!(
            urls,
            vec!["https://dl.acm.org/doi/1", "https://dl.acm.org/profile/2"]
        );
        let on_disk: Vec<String> =
            serde_json::from_str(&fs::read_to_string(store.path(MANUAL_INFO_FILE)).unwrap())
                .unwrap();
        assert_eq!(on_disk, urls);
    }

    #[test]
    fn test_record_manual_skips_known_urls() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path());

        let mut run = ManualCheckList::new();
        run.push(ManualCheck::new("https://dl.acm.org/doi/1", "missing id"));
        run.push(ManualCheck::new("https://dl.acm.org/profile/2", "no institutions"));
        run.push(ManualCheck::new("https://dl.acm.org/doi/1", "missing name"));
        store.record_manual(&run).unwrap();

        // the same run again adds nothing
        let urls = store.record_manual(&run).unwrap();
        assert_eq!(
            urls,
            vec!["https://dl.acm.org/doi/1", "https://dl.acm.org/profile/2"]
        );

        let mut next = ManualCheckList::new();
        next.push(ManualCheck::new("https://dl.acm.org/profile/2", "fetch failed"));
        next.push(ManualCheck::new("https://dl.acm.org/profile/9", "fetch failed"));
        let urls = store.record_manual(&next).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://dl.acm.org/doi/1",
                "https://dl.acm.org/profile/2",
                "https://dl.acm.org/profile/9"
            ]
        );
    }

    #[test]
    fn test_save_counts_creates_directory() {
        let dir = TempDir::new().unwrap();
        let store = ResultStore::new(dir.path().join("out"));

        let mut counts = InstitutionCounts::new();
        counts
            .entry("2021".to_string())
            .or_default()
            .insert("mit".to_string(), 3);
        let path = store.save_university_info(&counts).unwrap();

        assert!(path.ends_with(UNIVERSITY_INFO_FILE));
        let loaded: InstitutionCounts =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(loaded, counts);
    }
}
