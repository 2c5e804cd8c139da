//! HTTP access to the PetProfiles API

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use tracing::debug;

use super::durable::ImageFetcher;
use super::error::FetchError;
use super::sync::ProfileSource;
use crate::api::API_KEY_HEADER;
use crate::config::Config;
use crate::models::{ApiResponse, PetProfile};

/// Timeout applied to every request, image downloads included
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// API client authenticated with a static key.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpApiClient {
    /// Creates a client for `base_url` (for example `http://host:5000/api`).
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, FetchError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| FetchError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(&config.api_base_url, config.api_key.clone())
    }

    /// Absolute `http(s)` references are used as is; anything else names an
    /// image on the API's images resource.
    pub fn image_url(&self, reference: &str) -> String {
        match Url::parse(reference) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => reference.to_string(),
            _ => format!("{}/Images/{}", self.base_url, reference),
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                url: url.to_string(),
            });
        }

        debug!("GET {} -> {}", url, status);
        Ok(response)
    }
}

#[async_trait]
impl ImageFetcher for HttpApiClient {
    async fn fetch_image(&self, reference: &str) -> Result<Bytes, FetchError> {
        let url = self.image_url(reference);
        Ok(self.get(&url).await?.bytes().await?)
    }
}

#[async_trait]
impl ProfileSource for HttpApiClient {
    async fn fetch_profiles(&self) -> Result<Vec<PetProfile>, FetchError> {
        let url = format!("{}/PetProfiles", self.base_url);
        let envelope: ApiResponse<Vec<PetProfile>> = self.get(&url).await?.json().await?;

        if !envelope.success {
            return Err(FetchError::Api(
                envelope
                    .message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            ));
        }

        Ok(envelope.data.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_relative_reference() {
        let client = HttpApiClient::new("http://localhost:5000/api/", None).unwrap();
        assert_eq!(
            client.image_url("123_0.png"),
            "http://localhost:5000/api/Images/123_0.png"
        );
    }

    #[test]
    fn test_image_url_absolute_reference() {
        let client = HttpApiClient::new("http://localhost:5000/api", None).unwrap();
        assert_eq!(
            client.image_url("https://cdn.example.com/rex.jpg"),
            "https://cdn.example.com/rex.jpg"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpApiClient::new("not a url", None);
        assert!(matches!(result, Err(FetchError::InvalidBaseUrl(_))));
    }
}
