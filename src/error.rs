//! Error handling.

use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Subsetting service error type
///
/// This type encapsulates the various errors that may occur. Absence outcomes (zero catalog
/// matches, a failed reachability probe, an empty subset) are not represented here; they are
/// ordinary return values.
#[derive(Debug, Error)]
pub enum SubsetError {
    /// Error fetching or parsing a catalog document
    #[error("catalog at {url} is unavailable: {reason}")]
    CatalogUnavailable { url: Url, reason: String },

    /// Error opening a dataset resource
    #[error("failed to open dataset {resource}: {reason}")]
    ResourceOpen { resource: String, reason: String },

    /// Error applying the subsetting transform to a dataset
    #[error("transform failed for {resource}: {reason}")]
    Transform { resource: String, reason: String },

    /// Error writing a subsetted dataset to an output file
    #[error("failed to write dataset to {}", path.display())]
    DatasetWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error performing an HTTP request
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error acquiring a semaphore
    #[error("error acquiring resources")]
    SemaphoreAcquire(#[from] tokio::sync::AcquireError),

    /// A subsetting task panicked or was cancelled
    #[error("subsetting task failed")]
    TaskJoin(#[from] tokio::task::JoinError),

    /// Error serialising the manifest descriptor
    #[error("failed to serialise manifest")]
    ManifestSerialisation(#[from] serde_json::Error),
}

impl SubsetError {
    /// Return a `ResourceOpen` error for a resource.
    pub fn resource_open(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceOpen {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    /// Return a `Transform` error for a resource.
    pub fn transform(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transform {
            resource: resource.into(),
            reason: reason.into(),
        }
    }
}
