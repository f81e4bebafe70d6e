//! Page fetchers: turn a validated URL into rendered HTML.
//!
//! The crawl only talks to the [`PageFetcher`] trait. Three implementations are
//! provided:
//!
//! - [`ChromeFetcher`]: one headless Chrome/Chromium session driven over DevTools
//! - [`HttpFetcher`]: a plain HTTP GET, enough for pages that render server-side
//! - [`MockFetcher`]: canned pages for tests
//!
//! Fetchers are called strictly one at a time. A fetcher owns its session for the
//! whole run and must be released with [`PageFetcher::close`] on both the success
//! and the failure path.

mod chrome;
mod http;
pub mod mock;

pub use chrome::ChromeFetcher;
pub use http::HttpFetcher;
pub use mock::MockFetcher;

use async_trait::async_trait;

use crate::config::Config;
use crate::models::PageUrl;

/// Interface for anything that can load a page.
#[async_trait]
pub trait PageFetcher: Send + Sync + std::fmt::Debug {
    /// Short identifier used in logs ("chrome", "http", "mock")
    fn id(&self) -> &str;

    /// Load the page and return its rendered HTML
    async fn fetch(&self, url: &PageUrl) -> Result<String, FetchError>;

    /// Release the session. Fetching after this is an error.
    async fn close(&self) -> Result<(), FetchError> {
        Ok(())
    }
}

/// Build the fetcher the configuration asks for: the headless browser when an
/// executable is configured, plain HTTP otherwise.
pub async fn from_config(config: &Config) -> Result<Box<dyn PageFetcher>, FetchError> {
    if config.browser.path.is_some() {
        Ok(Box::new(ChromeFetcher::launch(&config.browser).await?))
    } else {
        tracing::info!("No browser executable configured, fetching pages over plain HTTP");
        Ok(Box::new(HttpFetcher::from_config(&config.http)?))
    }
}

/// Errors that can occur while loading a page
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The browser session could not be started or is no longer usable
    #[error("Browser session error: {0}")]
    Session(String),

    /// Network or transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The browser ran but did not produce a page
    #[error("Unable to render {url}: {message}")]
    Render { url: String, message: String },

    /// No page is known for this URL
    #[error("Page not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}
