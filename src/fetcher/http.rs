//! Plain HTTP page fetcher.

use async_trait::async_trait;

use crate::config::HttpConfig;
use crate::fetcher::{FetchError, PageFetcher};
use crate::models::PageUrl;
use crate::utils::HttpClient;

/// Fetches pages with a single GET and no script execution.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: HttpClient,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::from_config(&HttpConfig::default())
    }

    pub fn from_config(config: &HttpConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: HttpClient::from_config(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    fn id(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &PageUrl) -> Result<String, FetchError> {
        tracing::info!("fetching {} web content...", url);

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| FetchError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Failed to fetch URL {}: {}", url, status);
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/doi/proceedings/10.1145/383059")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body><h5 class=\"issue-item__title\"></h5></body></html>")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let url = PageUrl::parse(format!("{}/doi/proceedings/10.1145/383059", server.url())).unwrap();
        let body = fetcher.fetch(&url).await.unwrap();

        assert!(body.contains("issue-item__title"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/profile/81100000001")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let url = PageUrl::parse(format!("{}/profile/81100000001", server.url())).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }
}
