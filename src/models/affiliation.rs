//! Institution classification (academia vs other) and per-year tallies.
//!
//! Classification is a plain keyword containment test on the lower-cased
//! institution string. It is deterministic and total, and it is known to miss
//! academic institutions whose names contain none of the keywords.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Keywords that mark an institution string as academic.
pub const DEFAULT_ACADEMIA_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "institute of technology",
    "uc",
    "epfl",
    "mit",
    "usc",
    "virginia tech",
    "icsi",
    "cornell",
    "eth",
    "kaust",
    "tu delft",
    "uiuc",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Academia,
    Other,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Academia => "academia",
            Classification::Other => "other",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword-based institution classifier.
#[derive(Debug, Clone)]
pub struct AffiliationClassifier {
    keywords: Vec<String>,
}

impl AffiliationClassifier {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True if the institution contains any academia keyword.
    pub fn is_academic(&self, institution: &str) -> bool {
        let lowered = institution.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    pub fn classify(&self, institution: &str) -> Classification {
        if self.is_academic(institution) {
            Classification::Academia
        } else {
            Classification::Other
        }
    }
}

impl Default for AffiliationClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_ACADEMIA_KEYWORDS)
    }
}

/// Institution occurrence counts keyed by year, then classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffiliationTally {
    counts: BTreeMap<String, BTreeMap<Classification, BTreeMap<String, u64>>>,
}

impl AffiliationTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a year shows up in the output even if nothing is recorded for it.
    pub fn ensure_year(&mut self, year: &str) {
        self.counts.entry(year.to_string()).or_default();
    }

    /// Count one occurrence and return the updated count.
    pub fn record(&mut self, year: &str, institution: &str, class: Classification) -> u64 {
        let count = self
            .counts
            .entry(year.to_string())
            .or_default()
            .entry(class)
            .or_default()
            .entry(institution.to_string())
            .or_insert(0);
        *count += 1;
        *count
    }

    pub fn count(&self, year: &str, class: Classification, institution: &str) -> u64 {
        self.counts
            .get(year)
            .and_then(|by_class| by_class.get(&class))
            .and_then(|institutions| institutions.get(institution))
            .copied()
            .unwrap_or(0)
    }

    /// year → institution → count for one classification.
    pub fn by_class(&self, class: Classification) -> BTreeMap<String, BTreeMap<String, u64>> {
        self.counts
            .iter()
            .map(|(year, by_class)| {
                (
                    year.clone(),
                    by_class.get(&class).cloned().unwrap_or_default(),
                )
            })
            .collect()
    }

    pub fn years(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Total occurrences for a year and classification.
    pub fn total(&self, year: &str, class: Classification) -> u64 {
        self.counts
            .get(year)
            .and_then(|by_class| by_class.get(&class))
            .map(|institutions| institutions.values().sum())
            .unwrap_or(0)
    }
}

/// Academia-only vs industry-involved paper counts for one year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaperBreakdown {
    pub total: usize,
    pub academia_only: usize,
}

impl PaperBreakdown {
    pub fn industry_involved(&self) -> usize {
        self.total - self.academia_only
    }
}

/// Classify each paper by its institution set.
///
/// A paper is academia-only when every institution on it is academic; a paper
/// with no institutions at all counts as academia-only. Each matched
/// institution string is appended to `universities`.
pub fn classify_papers(
    classifier: &AffiliationClassifier,
    papers: &BTreeMap<String, BTreeSet<String>>,
    universities: &mut Vec<String>,
) -> PaperBreakdown {
    let mut breakdown = PaperBreakdown {
        total: papers.len(),
        academia_only: 0,
    };

    for institutions in papers.values() {
        let mut all_academia = true;
        for institution in institutions {
            if classifier.is_academic(institution) {
                universities.push(institution.clone());
            } else {
                all_academia = false;
            }
        }
        if all_academia {
            breakdown.academia_only += 1;
        }
    }

    breakdown
}
