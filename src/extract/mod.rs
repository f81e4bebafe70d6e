//! HTML extraction for listing, article, and profile pages.
//!
//! Failures come in two sizes. A whole-page structural failure is an
//! [`ExtractError`]. A single malformed item comes back as
//! [`Extracted::Skipped`] with a [`ManualCheck`] describing it, and the caller
//! moves on to the next item.

mod article;
mod listing;
mod profile;

pub use article::{extract_authors, extract_institutions};
pub use listing::{extract_article_links, ArticleLinks};
pub use profile::{extract_profile, ProfileAffiliations};

use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::OnceLock;

use crate::models::ManualCheck;

/// Errors that make a whole page unusable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// A listing page without any of its item markers; the site layout has likely changed
    #[error("no `{marker}` discovered at {url}. please confirm the site is working")]
    Structure { marker: &'static str, url: String },

    /// A page is missing a section that every page of its kind should have
    #[error("missing `{marker}` on {url}")]
    MissingMarker { marker: &'static str, url: String },
}

/// Outcome for one item on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted<T> {
    Item(T),
    Skipped(ManualCheck),
}

impl<T> Extracted<T> {
    pub fn item(self) -> Option<T> {
        match self {
            Extracted::Item(item) => Some(item),
            Extracted::Skipped(_) => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Extracted::Skipped(_))
    }
}

/// Split per-item outcomes into the extracted items and the skipped entries.
pub fn partition<T>(entries: Vec<Extracted<T>>) -> (Vec<T>, Vec<ManualCheck>) {
    let mut items = Vec::new();
    let mut skipped = Vec::new();
    for entry in entries {
        match entry {
            Extracted::Item(item) => items.push(item),
            Extracted::Skipped(check) => skipped.push(check),
        }
    }
    (items, skipped)
}

pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css}: {e}"))
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"));
    re.replace_all(text.trim(), " ").into_owned()
}

/// The first non-blank text node under `element`, normalized.
pub(crate) fn first_text(element: ElementRef<'_>) -> Option<String> {
    element
        .text()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(normalize_whitespace)
}

/// Text nodes that are direct children of `element`, joined and normalized.
pub(crate) fn own_text(element: ElementRef<'_>) -> Option<String> {
    let text: String = element
        .children()
        .filter_map(|child| child.value().as_text().map(|t| t.trim().to_string()))
        .collect::<Vec<_>>()
        .join(" ");
    let text = normalize_whitespace(&text);
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Univ.\n  of\tTokyo "), "Univ. of Tokyo");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_own_text_skips_child_elements() {
        let html = Html::parse_fragment(r#"<span><img src="a.png"/> Jane <b>x</b> Doe </span>"#);
        let span = html.select(&selector("span")).next().unwrap();
        assert_eq!(own_text(span).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_first_text() {
        let html = Html::parse_fragment("<p>\n <i> </i>MIT<br/>Cambridge</p>");
        let p = html.select(&selector("p")).next().unwrap();
        assert_eq!(first_text(p).as_deref(), Some("MIT"));
    }

    #[test]
    fn test_partition() {
        let entries = vec![
            Extracted::Item(1),
            Extracted::Skipped(ManualCheck::new("https://x", "bad")),
            Extracted::Item(2),
        ];
        assert!(entries[1].is_skipped());
        let (items, skipped) = partition(entries);
        assert_eq!(items, vec![1, 2]);
        assert_eq!(skipped.len(), 1);
    }
}
