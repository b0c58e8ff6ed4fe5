//! Reachability probing of OPeNDAP dataset endpoints.

use crate::http_client::{HttpGet, DEFAULT_REQUEST_TIMEOUT};

use std::time::Duration;

/// Marker token at the start of a DDS document describing a dataset.
const DATASET_MARKER: &str = "Dataset";

/// Probes whether a URL denotes a live OPeNDAP dataset endpoint.
#[derive(Debug)]
pub struct Prober<H> {
    http: H,
    timeout: Duration,
}

impl<H: HttpGet> Prober<H> {
    /// Create a new Prober with the default probe timeout.
    pub fn new(http: H) -> Self {
        Self {
            http,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Create a new Prober with a probe timeout.
    pub fn with_timeout(http: H, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// Whether a URL denotes a live OPeNDAP dataset endpoint.
    ///
    /// Empty URLs and local file references return false without a request. Otherwise one DDS
    /// metadata request is issued; true requires a success status and a body starting with the
    /// dataset marker. Transport failures and non-conforming responses fold to false, never an
    /// error. No retries are made.
    ///
    /// # Arguments
    ///
    /// * `url`: URL to probe
    pub async fn probe(&self, url: &str) -> bool {
        if url.is_empty() || url.starts_with("file") {
            return false;
        }
        let dds_url = format!("{}.dds", url);
        match self.http.get(&dds_url, self.timeout).await {
            Ok(response) => response.is_success() && response.body.starts_with(DATASET_MARKER),
            Err(error) => {
                tracing::debug!("probe of {} failed: {}", dds_url, error);
                false
            }
        }
    }
}
