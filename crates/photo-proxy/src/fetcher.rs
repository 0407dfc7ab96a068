//! Unsplash photo fetching

use std::time::Duration;

use async_trait::async_trait;
use photo_cache::{CacheError, FetchedPhoto, PhotoFetcher, Result};
use reqwest::{header, Client};
use tracing::{debug, warn};

use crate::types::RandomPhotoResponse;

const UNSPLASH_RANDOM_URL: &str = "https://api.unsplash.com/photos/random";
const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the Unsplash random-photo API.
///
/// A fetch is two upstream calls: the random-photo JSON lookup, then the
/// image download from the URL it names.
pub struct UnsplashFetcher {
    client: Client,
    api_url: String,
    access_key: String,
}

impl UnsplashFetcher {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self::with_api_url(UNSPLASH_RANDOM_URL, access_key)
    }

    /// Create a fetcher against a custom API base, for tests
    pub fn with_api_url(api_url: &str, access_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url: api_url.to_string(),
            access_key: access_key.into(),
        }
    }

    /// Ask Unsplash for a random landscape photo matching `theme`
    async fn random_photo_url(&self, theme: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.api_url)
            .header(
                header::AUTHORIZATION,
                format!("Client-ID {}", self.access_key),
            )
            .query(&[("query", theme), ("orientation", "landscape")])
            .send()
            .await
            .map_err(to_fetch_error)?;

        if !response.status().is_success() {
            warn!(theme, status = %response.status(), "Unsplash lookup failed");
            return Err(CacheError::FetchFailed(format!(
                "Unsplash returned status {}",
                response.status()
            )));
        }

        let body: RandomPhotoResponse = response.json().await.map_err(to_fetch_error)?;
        Ok(body.urls.full)
    }

    /// Download the photo itself
    async fn download(&self, url: &str) -> Result<FetchedPhoto> {
        let response = self.client.get(url).send().await.map_err(to_fetch_error)?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "photo download failed");
            return Err(CacheError::FetchFailed(format!(
                "Photo host returned status {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let data = response.bytes().await.map_err(to_fetch_error)?;

        debug!(size = data.len(), content_type = %content_type, "downloaded photo");
        Ok(FetchedPhoto { data, content_type })
    }
}

#[async_trait]
impl PhotoFetcher for UnsplashFetcher {
    async fn fetch(&self, theme: &str) -> Result<FetchedPhoto> {
        let photo_url = self.random_photo_url(theme).await?;
        debug!(theme, url = %photo_url, "resolved random photo");
        self.download(&photo_url).await
    }
}

fn to_fetch_error(err: reqwest::Error) -> CacheError {
    CacheError::FetchFailed(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_unsplash_api() {
        let fetcher = UnsplashFetcher::new("test-key");
        assert_eq!(fetcher.api_url, UNSPLASH_RANDOM_URL);
        assert_eq!(fetcher.access_key, "test-key");
    }

    #[test]
    fn test_custom_api_url() {
        let fetcher = UnsplashFetcher::with_api_url("http://127.0.0.1:9/random", "k");
        assert_eq!(fetcher.api_url, "http://127.0.0.1:9/random");
    }

    #[tokio::test]
    async fn test_unreachable_api_is_a_fetch_failure() {
        // Port 9 (discard) refuses connections
        let fetcher = UnsplashFetcher::with_api_url("http://127.0.0.1:9/random", "k");
        let result = fetcher.fetch("nature").await;
        assert!(matches!(result, Err(CacheError::FetchFailed(_))));
    }
}
