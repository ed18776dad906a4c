use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Query-string pairs sent along with a collection request, in order.
pub type QueryParams = [(String, String)];

/// Read/write access to the headless content backend.
///
/// Implementations never swallow failures: every transport or non-2xx
/// problem comes back as an error and the caller decides on fallbacks.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_collection(
        &self,
        resource_path: &str,
        query: &QueryParams,
    ) -> Result<serde_json::Value>;

    async fn submit_record(
        &self,
        resource_path: &str,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value>;

    /// Absolute URL for a media path returned by the backend, `None` for
    /// missing or empty input.
    fn resolve_media_url(&self, url: Option<&str>) -> Option<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn api_prefix(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn search_debounce(&self) -> Duration;
    fn rotation_interval(&self) -> Duration;
}

/// Connectivity signal consulted when a request fails without a status.
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Assumes the host is online; transport errors still classify as network errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeOnline;

impl Connectivity for AssumeOnline {
    fn is_online(&self) -> bool {
        true
    }
}
