//! Remote content gateway over `reqwest`.
//!
//! Every request carries a JSON content type. Transport failures and non-2xx
//! answers are returned as [`SiteError`] values; nothing is retried or
//! swallowed here.

use crate::domain::ports::{ConfigProvider, ContentSource, QueryParams};
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};

#[derive(Debug, Clone)]
pub struct ContentGateway {
    client: Client,
    origin: String,
    api_base: String,
}

impl ContentGateway {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SiteError::Config {
                message: format!("HTTP client could not be built: {}", e),
            })?;

        let origin = config.base_url().trim_end_matches('/').to_string();
        let prefix = config.api_prefix().trim_end_matches('/');
        let api_base = format!("{}{}", origin, prefix);

        Ok(Self {
            client,
            origin,
            api_base,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn endpoint(&self, resource_path: &str) -> String {
        if resource_path.starts_with('/') {
            format!("{}{}", self.api_base, resource_path)
        } else {
            format!("{}/{}", self.api_base, resource_path)
        }
    }

    async fn execute(&self, request: RequestBuilder, url: &str) -> Result<serde_json::Value> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Request to {} failed: {}", url, e);
            SiteError::from(e)
        })?;

        let status = response.status();
        tracing::debug!("Response from {}: {}", url, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Backend answered {} for {}", status, url);
            return Err(SiteError::Http {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body
                },
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ContentSource for ContentGateway {
    async fn fetch_collection(
        &self,
        resource_path: &str,
        query: &QueryParams,
    ) -> Result<serde_json::Value> {
        let url = self.endpoint(resource_path);
        tracing::debug!("GET {} with {} query params", url, query.len());
        let request = self.client.get(&url).query(query);
        self.execute(request, &url).await
    }

    async fn submit_record(
        &self,
        resource_path: &str,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let url = self.endpoint(resource_path);
        tracing::debug!("POST {}", url);
        let request = self.client.post(&url).json(payload);
        self.execute(request, &url).await
    }

    fn resolve_media_url(&self, url: Option<&str>) -> Option<String> {
        resolve_media_url(&self.origin, url)
    }
}

/// Absolute URLs pass through, relative ones are prefixed with `origin`,
/// missing or blank input yields `None`.
pub fn resolve_media_url(origin: &str, url: Option<&str>) -> Option<String> {
    let url = url.map(str::trim).filter(|u| !u.is_empty())?;
    if url.starts_with("http://") || url.starts_with("https://") {
        return Some(url.to_string());
    }

    let origin = origin.trim_end_matches('/');
    if url.starts_with('/') {
        Some(format!("{}{}", origin, url))
    } else {
        Some(format!("{}/{}", origin, url))
    }
}
