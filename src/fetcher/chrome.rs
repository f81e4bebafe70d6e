//! Headless Chrome/Chromium page fetcher.
//!
//! One browser process is launched per run and driven over the DevTools
//! protocol. Every fetch opens a tab, waits for navigation plus
//! `render_wait_ms` for the page's scripts, reads the serialized DOM and closes
//! the tab again.

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig as LaunchConfig};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::BrowserConfig;
use crate::fetcher::{FetchError, PageFetcher};
use crate::models::PageUrl;

pub struct ChromeFetcher {
    executable: PathBuf,
    render_wait: Duration,
    browser: Mutex<Option<Browser>>,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for ChromeFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromeFetcher")
            .field("executable", &self.executable)
            .field("render_wait", &self.render_wait)
            .finish_non_exhaustive()
    }
}

/// Parse a `"width,height"` window size.
fn parse_window_size(raw: &str) -> Result<(u32, u32), FetchError> {
    let invalid = || FetchError::Session(format!("invalid window size {:?}", raw));
    let (width, height) = raw.split_once(',').ok_or_else(invalid)?;
    let width = width.trim().parse().map_err(|_| invalid())?;
    let height = height.trim().parse().map_err(|_| invalid())?;
    Ok((width, height))
}

/// Browser launch options for the configured executable.
fn launch_config(config: &BrowserConfig) -> Result<LaunchConfig, FetchError> {
    let executable = config
        .path
        .as_ref()
        .ok_or_else(|| FetchError::Session("no browser executable configured".to_string()))?;

    if !executable.is_file() {
        return Err(FetchError::Session(format!(
            "unable to load browser at {}",
            executable.display()
        )));
    }

    let (width, height) = parse_window_size(&config.window_size)?;
    LaunchConfig::builder()
        .chrome_executable(executable)
        .window_size(width, height)
        .no_sandbox()
        .arg("--disable-gpu")
        .arg("--disable-dev-shm-usage")
        .build()
        .map_err(FetchError::Session)
}

impl ChromeFetcher {
    /// Start the browser session. Fails if no usable executable is configured
    /// or the browser does not come up.
    pub async fn launch(config: &BrowserConfig) -> Result<Self, FetchError> {
        let options = launch_config(config)?;
        let executable = config.path.clone().unwrap_or_default();

        let (browser, mut handler) = Browser::launch(options).await.map_err(|e| {
            FetchError::Session(format!(
                "unable to start browser at {}: {}",
                executable.display(),
                e
            ))
        })?;

        // The handler drives the DevTools connection until the browser exits.
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        tracing::info!("Using browser at {}", executable.display());
        Ok(Self {
            executable,
            render_wait: Duration::from_millis(config.render_wait_ms),
            browser: Mutex::new(Some(browser)),
            handler: Mutex::new(Some(handler)),
        })
    }
}

#[async_trait]
impl PageFetcher for ChromeFetcher {
    fn id(&self) -> &str {
        "chrome"
    }

    async fn fetch(&self, url: &PageUrl) -> Result<String, FetchError> {
        let guard = self.browser.lock().await;
        let browser = guard
            .as_ref()
            .ok_or_else(|| FetchError::Session("browser session already closed".to_string()))?;

        let render_error = |e: chromiumoxide::error::CdpError| FetchError::Render {
            url: url.to_string(),
            message: e.to_string(),
        };

        tracing::info!("fetching {} web content...", url);
        let page = browser.new_page(url.as_str()).await.map_err(render_error)?;
        page.wait_for_navigation().await.map_err(render_error)?;
        if !self.render_wait.is_zero() {
            tokio::time::sleep(self.render_wait).await;
        }
        let html = page.content().await.map_err(render_error)?;

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close tab for {}: {}", url, e);
        }

        if html.trim().is_empty() {
            return Err(FetchError::Render {
                url: url.to_string(),
                message: "browser returned an empty document".to_string(),
            });
        }
        Ok(html)
    }

    async fn close(&self) -> Result<(), FetchError> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };

        let closed = browser.close().await;
        if let Err(e) = browser.wait().await {
            tracing::debug!("Failed to reap browser process: {}", e);
        }
        if let Some(handler) = self.handler.lock().await.take() {
            if let Err(e) = handler.await {
                tracing::warn!("Browser event handler ended abnormally: {}", e);
            }
        }

        closed.map_err(|e| FetchError::Session(e.to_string()))?;
        tracing::info!("Browser session closed");
        Ok(())
    }
}
