//! Validated page URLs.
//!
//! Every URL handed to a [`PageFetcher`](crate::fetcher::PageFetcher) goes through
//! [`PageUrl::parse`] or [`PageUrl::join`]; there is no way to build one from an
//! unchecked string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Returned when a string is not an absolute `http://` or `https://` URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Passed string value \"{0}\" is not an \"http*://\" URL")]
pub struct InvalidUrlError(pub String);

/// An absolute URL with an `http` or `https` scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageUrl(String);

/// Listing pages use the same validated representation as any other page.
pub type ListingUrl = PageUrl;

impl PageUrl {
    /// Validate and wrap a URL string.
    pub fn parse(value: impl Into<String>) -> Result<Self, InvalidUrlError> {
        let value = value.into();
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(Self(value))
        } else {
            Err(InvalidUrlError(value))
        }
    }

    /// Resolve a relative or absolute reference against this URL.
    pub fn join(&self, reference: &str) -> Result<Self, InvalidUrlError> {
        let base = url::Url::parse(&self.0).map_err(|_| InvalidUrlError(self.0.clone()))?;
        let joined = base
            .join(reference)
            .map_err(|_| InvalidUrlError(reference.to_string()))?;
        Self::parse(String::from(joined))
    }

    /// Replace the query string with a single `key=value` pair (form-encoded).
    pub fn with_query_param(&self, key: &str, value: &str) -> Result<Self, InvalidUrlError> {
        let mut url = url::Url::parse(&self.0).map_err(|_| InvalidUrlError(self.0.clone()))?;
        url.query_pairs_mut().clear().append_pair(key, value);
        Self::parse(String::from(url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PageUrl {
    type Err = InvalidUrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PageUrl {
    type Error = InvalidUrlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<PageUrl> for String {
    fn from(url: PageUrl) -> Self {
        url.0
    }
}
