//! HTTP client seam used by the reachability prober and the catalog resolver.

use crate::error::SubsetError;

use async_trait::async_trait;
use std::time::Duration;

/// Default timeout for catalog, metadata and probe requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Response to a GET request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl HttpResponse {
    /// Whether the status code indicates success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for issuing GET requests with a bounded timeout.
///
/// This is the seam between the networking components and the HTTP library, allowing tests to
/// substitute scripted responses.
#[async_trait]
pub trait HttpGet: Send + Sync {
    /// Perform a GET request with a bounded timeout, returning status and body.
    ///
    /// # Arguments
    ///
    /// * `url`: URL to request
    /// * `timeout`: Upper bound on the whole request
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, SubsetError>;
}

/// [HttpGet] implementation backed by [reqwest].
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new reqwest-backed HTTP client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestHttpClient {
    /// Create a default reqwest-backed HTTP client.
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpGet for ReqwestHttpClient {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, SubsetError> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_success() {
        let response = HttpResponse {
            status: 200,
            body: String::new(),
        };
        assert!(response.is_success());
        let response = HttpResponse {
            status: 404,
            body: String::new(),
        };
        assert!(!response.is_success());
    }
}
