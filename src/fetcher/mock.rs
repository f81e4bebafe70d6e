//! Mock fetcher for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::fetcher::{FetchError, PageFetcher};
use crate::models::PageUrl;

/// A fetcher that serves predefined pages and records every request.
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl MockFetcher {
    /// Create a new mock fetcher with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`set_page`](Self::set_page).
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.set_page(url, html);
        self
    }

    /// Serve `html` for `url`.
    pub fn set_page(&self, url: impl Into<String>, html: impl Into<String>) {
        let mut guard = self.pages.lock().unwrap();
        guard.insert(url.into(), html.into());
    }

    /// Every URL requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    fn id(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &PageUrl) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        let guard = self.pages.lock().unwrap();
        guard
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }

    async fn close(&self) -> Result<(), FetchError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
