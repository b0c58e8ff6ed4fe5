//! Fixtures shared by tests: scripted collaborators and dataset builders.

use crate::catalog::CatalogClient;
use crate::dataset::{Dataset, DatasetStore};
use crate::error::SubsetError;
use crate::http_client::{HttpGet, HttpResponse};
use crate::models::{CatalogEntry, ResourceDescriptor};

use async_trait::async_trait;
use hashbrown::HashMap;
use ndarray::ArrayD;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

pub(crate) fn url(url: &str) -> Url {
    Url::parse(url).unwrap()
}

/// A [CatalogClient] returning a fixed list of entries.
pub(crate) struct StaticCatalog {
    pub entries: Vec<CatalogEntry>,
}

#[async_trait]
impl CatalogClient for StaticCatalog {
    async fn fetch_catalog(&self, _url: &Url) -> Result<Vec<CatalogEntry>, SubsetError> {
        Ok(self.entries.clone())
    }
}

/// A [CatalogClient] that always fails.
pub(crate) struct UnavailableCatalog;

#[async_trait]
impl CatalogClient for UnavailableCatalog {
    async fn fetch_catalog(&self, url: &Url) -> Result<Vec<CatalogEntry>, SubsetError> {
        Err(SubsetError::CatalogUnavailable {
            url: url.clone(),
            reason: "connection refused".to_string(),
        })
    }
}

/// An [HttpGet] stub serving scripted responses. Requests for unknown URLs fail as transport
/// errors.
#[derive(Default)]
pub(crate) struct ScriptedHttp {
    responses: HashMap<String, HttpResponse>,
}

impl ScriptedHttp {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_response(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl HttpGet for ScriptedHttp {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, SubsetError> {
        self.responses.get(url).cloned().ok_or_else(|| {
            SubsetError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("no route to {}", url),
            ))
        })
    }
}

/// A [DatasetStore] serving datasets from memory and recording writes.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    datasets: HashMap<String, Dataset>,
    pub writes: Mutex<Vec<(PathBuf, Dataset)>>,
    jitter: bool,
}

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_dataset(mut self, url: &str, dataset: Dataset) -> Self {
        self.datasets.insert(url.to_string(), dataset);
        self
    }

    /// Perturb completion order under concurrency with a per-resource delay.
    pub(crate) fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }
}

#[async_trait]
impl DatasetStore for InMemoryStore {
    async fn open(&self, resource: &ResourceDescriptor) -> Result<Dataset, SubsetError> {
        if self.jitter {
            let millis = resource.url().as_str().bytes().map(u64::from).sum::<u64>() % 7;
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
        self.datasets
            .get(resource.url().as_str())
            .cloned()
            .ok_or_else(|| SubsetError::resource_open(resource.url().as_str(), "not found"))
    }

    async fn write(&self, dataset: &Dataset, path: &Path) -> Result<(), SubsetError> {
        self.writes
            .lock()
            .await
            .push((path.to_path_buf(), dataset.clone()));
        Ok(())
    }
}

/// A small grid dataset with the given spatial extent. Zero extent yields an empty dataset.
pub(crate) fn grid_dataset(extent: usize) -> Dataset {
    Dataset::new()
        .with_dimension("time", 120)
        .with_dimension("lat", extent)
        .with_dimension("lon", extent)
        .with_variable("tasmax", ArrayD::zeros(vec![120, extent, extent]))
        .with_attribute("driving_experiment_id", "historical,rcp45")
}

/// A DAS attribute document declaring one variable and a driving experiment list.
pub(crate) fn das_document(variable: &str, experiments: &str) -> String {
    format!(
        "Attributes {{\n    {} {{\n        String units \"K\";\n    }}\n    NC_GLOBAL {{\n        String driving_experiment_id \"{}\";\n    }}\n}}\n",
        variable, experiments
    )
}
