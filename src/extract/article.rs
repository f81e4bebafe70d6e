//! Authors and institutions from an article detail page.
//!
//! Page layout (one `li` per author):
//!
//! ```html
//! <ul ariaa-label="authors">
//!   <li class="loa__item">
//!     <span class="loa__author-name"><span><img src="..."/>Jane Doe</span></span>
//!     <span class="loa_author_inst"><p data-doi="10.1145/contrib-81100318553">MIT</p></span>
//!   </li>
//! </ul>
//! ```
//!
//! The misspelled `ariaa-label` is what the library serves; `aria-label` is
//! accepted as well.

use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

use super::{first_text, own_text, selector, ExtractError, Extracted};
use crate::models::{AuthorSighting, ManualCheck, PageUrl};

const AUTHORS_MARKER: &str = "ul[aria-label=authors]";

struct ArticleSelectors {
    author_list: Selector,
    author_item: Selector,
    name_inner: Selector,
    institution: Selector,
}

fn selectors() -> &'static ArticleSelectors {
    static SELECTORS: OnceLock<ArticleSelectors> = OnceLock::new();
    SELECTORS.get_or_init(|| ArticleSelectors {
        author_list: selector(r#"ul[ariaa-label="authors"], ul[aria-label="authors"]"#),
        author_item: selector("li.loa__item"),
        name_inner: selector("span.loa__author-name span"),
        institution: selector("span.loa_author_inst p"),
    })
}

fn author_items<'a>(
    document: &'a Html,
    article_url: &PageUrl,
) -> Result<Vec<ElementRef<'a>>, ExtractError> {
    let selectors = selectors();
    let list = document
        .select(&selectors.author_list)
        .next()
        .ok_or_else(|| ExtractError::MissingMarker {
            marker: AUTHORS_MARKER,
            url: article_url.to_string(),
        })?;
    Ok(list.select(&selectors.author_item).collect())
}

fn author_name(item: ElementRef<'_>) -> Option<String> {
    item.select(&selectors().name_inner).next().and_then(own_text)
}

fn institution_marker(item: ElementRef<'_>) -> Option<ElementRef<'_>> {
    item.select(&selectors().institution).next()
}

/// `10.1145/contrib-81100318553` → `81100318553`
fn author_id(marker: ElementRef<'_>) -> Option<String> {
    marker
        .value()
        .attr("data-doi")
        .and_then(|doi| doi.split('-').nth(1))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Extract one (name, id) sighting per author entry.
///
/// An entry without a name or an id becomes [`Extracted::Skipped`]; the other
/// entries are unaffected. The only page-level error is a missing authors list.
pub fn extract_authors(
    document: &Html,
    article_url: &PageUrl,
) -> Result<Vec<Extracted<AuthorSighting>>, ExtractError> {
    let items = author_items(document, article_url)?;
    tracing::info!(
        "\t{} author(s) discovered for article {}",
        items.len(),
        article_url
    );

    let entries = items
        .into_iter()
        .map(|item| {
            let name = author_name(item);
            let id = institution_marker(item).and_then(author_id);
            match (name, id) {
                (Some(name), Some(id)) => {
                    tracing::debug!("discovered author: {} - {}", id, name);
                    Extracted::Item(AuthorSighting::new(name, id))
                }
                (name, id) => {
                    let reason = format!(
                        "wrong author name: {} or id: {}",
                        name.as_deref().unwrap_or("None"),
                        id.as_deref().unwrap_or("None")
                    );
                    tracing::warn!("please manually investigate {} ({})", article_url, reason);
                    Extracted::Skipped(ManualCheck::new(article_url.as_str(), reason))
                }
            }
        })
        .collect();

    Ok(entries)
}

/// The lower-cased institution of each author entry that carries one.
///
/// Entries without an institution marker are left out. A marker without any
/// text comes back as [`Extracted::Skipped`] so the article can be checked by
/// hand.
pub fn extract_institutions(
    document: &Html,
    article_url: &PageUrl,
) -> Result<Vec<Extracted<String>>, ExtractError> {
    let entries = author_items(document, article_url)?
        .into_iter()
        .filter_map(|item| {
            let marker = institution_marker(item)?;
            let entry = match first_text(marker) {
                Some(institution) => {
                    tracing::debug!("discovered institution for {} is {}", article_url, institution);
                    Extracted::Item(institution.to_lowercase())
                }
                None => {
                    let name = author_name(item);
                    let reason = format!(
                        "empty institution for author {}",
                        name.as_deref().unwrap_or("None")
                    );
                    tracing::warn!("please manually investigate {} ({})", article_url, reason);
                    Extracted::Skipped(ManualCheck::new(article_url.as_str(), reason))
                }
            };
            Some(entry)
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::partition;
    use crate::models::AuthorMap;

    fn article_url() -> PageUrl {
        PageUrl::parse("https://dl.acm.org/doi/10.1145/383059.383060").unwrap()
    }

    fn author(name: &str, doi: Option<&str>, inst: &str) -> String {
        let doi_attr = doi
            .map(|d| format!(r#" data-doi="{}""#, d))
            .unwrap_or_default();
        format!(
            r#"<li class="loa__item">
                 <span class="loa__author-name"><span><img src="/pic.png"/>{name}</span></span>
                 <span class="loa_author_inst"><p{doi_attr}>{inst}</p></span>
               </li>"#
        )
    }

    fn page(items: &[String]) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><ul ariaa-label="authors">{}</ul></body></html>"#,
            items.join("\n")
        ))
    }

    #[test]
    fn test_skips_author_without_id() {
        let html = page(&[
            author("Alice Smith", Some("10.1145/contrib-81100000001"), "MIT"),
            author("Bob Jones", None, "Acme Corp"),
        ]);

        let entries = extract_authors(&html, &article_url()).unwrap();
        let (sightings, skipped) = partition(entries);

        assert_eq!(sightings, vec![AuthorSighting::new("Alice Smith", "81100000001")]);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].url, article_url().as_str());

        let map: AuthorMap = sightings.into_iter().collect();
        assert_eq!(map.len(), 1);
        assert!(map.contains("Alice Smith"));
    }

    #[test]
    fn test_skips_author_without_name() {
        let html = page(&[
            r#"<li class="loa__item"><span class="loa_author_inst"><p data-doi="10.1145/contrib-1">X</p></span></li>"#
                .to_string(),
            author("Carol White", Some("10.1145/contrib-2"), "EPFL"),
        ]);

        let entries = extract_authors(&html, &article_url()).unwrap();
        assert!(entries[0].is_skipped());
        assert_eq!(
            entries[1].clone().item(),
            Some(AuthorSighting::new("Carol White", "2"))
        );
    }

    #[test]
    fn test_id_without_dash_is_missing() {
        let html = page(&[author("Dan Brown", Some("10.1145/contrib"), "MIT")]);
        let entries = extract_authors(&html, &article_url()).unwrap();
        assert!(entries[0].is_skipped());
    }

    #[test]
    fn test_accepts_aria_label_spelling() {
        let html = Html::parse_document(&format!(
            r#"<ul aria-label="authors">{}</ul>"#,
            author("Eve Adams", Some("10.1145/contrib-99"), "ETH Zurich")
        ));
        let entries = extract_authors(&html, &article_url()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_skipped());
    }

    #[test]
    fn test_missing_author_list() {
        let html = Html::parse_document("<html><body><p>Withdrawn</p></body></html>");
        let err = extract_authors(&html, &article_url()).unwrap_err();
        assert!(matches!(err, ExtractError::MissingMarker { .. }));
        assert!(extract_institutions(&html, &article_url()).is_err());
    }

    #[test]
    fn test_institutions_lowercased() {
        let html = page(&[
            author("Alice Smith", Some("10.1145/contrib-1"), "MIT"),
            author("Bob Jones", Some("10.1145/contrib-2"), "  MIT "),
            author("Carol White", None, "Acme\n   Corp"),
            r#"<li class="loa__item"><span class="loa__author-name"><span>Nobody</span></span></li>"#
                .to_string(),
        ]);

        let (institutions, skipped) = partition(extract_institutions(&html, &article_url()).unwrap());
        assert_eq!(institutions, vec!["mit", "mit", "acme corp"]);
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_empty_institution_is_skipped() {
        let html = page(&[
            author("Alice Smith", Some("10.1145/contrib-1"), "MIT"),
            author("Bob Jones", Some("10.1145/contrib-2"), ""),
        ]);

        let entries = extract_institutions(&html, &article_url()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], Extracted::Item("mit".to_string()));
        match &entries[1] {
            Extracted::Skipped(check) => {
                assert_eq!(check.url, article_url().as_str());
                assert!(check.reason.contains("Bob Jones"));
            }
            other => panic!("expected a skipped entry, got {:?}", other),
        }
    }
}
