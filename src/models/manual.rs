//! References that need a human to look at them.

use serde::{Deserialize, Serialize};

/// A page that automated extraction could not fully handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualCheck {
    pub url: String,
    pub reason: String,
}

impl ManualCheck {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Ordered list of manual-check entries collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualCheckList {
    entries: Vec<ManualCheck>,
}

impl ManualCheckList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ManualCheck) {
        self.entries.push(entry);
    }

    /// Flat URL list in discovery order, as written to `manual_info.json`.
    pub fn urls(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.url.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManualCheck> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<ManualCheck> for ManualCheckList {
    fn extend<I: IntoIterator<Item = ManualCheck>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_every_entry_in_order() {
        let mut list = ManualCheckList::new();
        list.push(ManualCheck::new("https://dl.acm.org/doi/1", "missing id"));
        list.push(ManualCheck::new("https://dl.acm.org/doi/1", "missing name"));
        list.push(ManualCheck::new("https://dl.acm.org/profile/7", "no institutions"));

        assert_eq!(list.len(), 3);
        assert_eq!(
            list.urls(),
            vec![
                "https://dl.acm.org/doi/1",
                "https://dl.acm.org/doi/1",
                "https://dl.acm.org/profile/7"
            ]
        );
    }
}
