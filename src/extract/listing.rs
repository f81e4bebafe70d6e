//! Article links from a proceedings listing page.

use scraper::{Html, Selector};
use std::sync::OnceLock;

use super::{normalize_whitespace, selector, ExtractError};
use crate::models::PageUrl;

const ITEM_MARKER: &str = "issue-item__title";

struct ListingSelectors {
    item_title: Selector,
    link: Selector,
}

fn selectors() -> &'static ListingSelectors {
    static SELECTORS: OnceLock<ListingSelectors> = OnceLock::new();
    SELECTORS.get_or_init(|| ListingSelectors {
        item_title: selector("h5.issue-item__title"),
        link: selector("a[href]"),
    })
}

/// Links found on one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleLinks {
    /// `href` values in page order
    pub links: Vec<String>,
    /// Text of each item title that had no link; one warning was logged per entry
    pub skipped: Vec<String>,
}

/// Collect the article link of every item title on a listing page.
///
/// A page with no item titles at all is a structural error. An item title
/// without a link is skipped with a warning.
pub fn extract_article_links(
    document: &Html,
    listing_url: &PageUrl,
) -> Result<ArticleLinks, ExtractError> {
    let selectors = selectors();
    let mut found = ArticleLinks::default();
    let mut markers = 0usize;

    tracing::info!("parsing article urls from {}...", listing_url);
    for item in document.select(&selectors.item_title) {
        markers += 1;
        match item
            .select(&selectors.link)
            .next()
            .and_then(|a| a.value().attr("href"))
        {
            Some(href) => found.links.push(href.trim().to_string()),
            None => {
                let title = normalize_whitespace(&item.text().collect::<String>());
                tracing::warn!("no article link found for \"{}\" on {}", title, listing_url);
                found.skipped.push(title);
            }
        }
    }

    if markers == 0 {
        return Err(ExtractError::Structure {
            marker: ITEM_MARKER,
            url: listing_url.to_string(),
        });
    }

    tracing::info!(
        "{} article link(s) found on {} ({} skipped)",
        found.links.len(),
        listing_url,
        found.skipped.len()
    );
    Ok(found)
}
