//! Conference years, their listing URLs, and the per-year crawl record.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::config::YearSite;
use crate::models::{AuthorMap, InvalidUrlError, ListingUrl, ManualCheckList, PageUrl};

/// A year key together with the site configuration used to crawl it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConferenceYear {
    key: String,
    site: YearSite,
}

impl ConferenceYear {
    pub fn new(key: impl Into<String>, site: YearSite) -> Self {
        Self {
            key: key.into(),
            site,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn base_url(&self) -> Result<PageUrl, InvalidUrlError> {
        PageUrl::parse(self.site.base_url.clone())
    }

    /// Listing pages for this year, one per tab parameter value if any are configured.
    pub fn listing_urls(&self) -> Result<Vec<ListingUrl>, InvalidUrlError> {
        let listing = self.base_url()?.join(&self.site.path)?;

        let tabs = match &self.site.tabs {
            Some(tabs) if !tabs.values.is_empty() => tabs,
            _ => return Ok(vec![listing]),
        };

        let mut seen = HashSet::new();
        let mut urls = Vec::with_capacity(tabs.values.len());
        for value in &tabs.values {
            if seen.insert(value.as_str()) {
                urls.push(listing.with_query_param(&tabs.param, value)?);
            }
        }
        Ok(urls)
    }

    /// Resolve an article link found on a listing page.
    pub fn article_url(&self, link: &str) -> Result<PageUrl, InvalidUrlError> {
        self.base_url()?.join(link)
    }
}

/// Everything gathered while crawling one year.
#[derive(Debug, Clone, Default)]
pub struct YearCrawl {
    pub year: String,
    /// Article links in discovery order, duplicates across listings included.
    pub article_links: Vec<String>,
    pub authors: AuthorMap,
    /// Article link → lower-cased institutions on that article.
    pub article_institutions: BTreeMap<String, BTreeSet<String>>,
    pub manual: ManualCheckList,
    /// Set when a fatal error stopped the year early; the other fields hold what was
    /// collected before that.
    pub failure: Option<String>,
}

impl YearCrawl {
    pub fn new(year: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}
