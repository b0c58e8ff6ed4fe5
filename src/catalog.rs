//! Dataset discovery: fetching catalog documents and filtering their entries.

use crate::dataset::DatasetStore;
use crate::error::SubsetError;
use crate::http_client::{HttpGet, DEFAULT_REQUEST_TIMEOUT};
use crate::models::{CatalogEntry, ParsingMethod, ResourceDescriptor};

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;
use url::Url;

/// Name of the global attribute listing a dataset's driving experiments.
pub const DRIVING_EXPERIMENT_ATTRIBUTE: &str = "driving_experiment_id";

lazy_static! {
    /// Matches the driving experiment attribute declaration in a DAS document.
    static ref DRIVING_EXPERIMENT: Regex =
        Regex::new(r#"String driving_experiment_id "(.+)""#).unwrap();
}

/// Trait for fetching catalog documents: the catalog client collaborator.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch the catalog document at a URL and return its entries, in the catalog's native
    /// enumeration order.
    ///
    /// # Arguments
    ///
    /// * `url`: URL of the catalog document
    async fn fetch_catalog(&self, url: &Url) -> Result<Vec<CatalogEntry>, SubsetError>;
}

/// [CatalogClient] for JSON catalog documents: an array of entries, each with a display name
/// and access URLs keyed by protocol.
///
/// Catalog servers speaking other formats (such as THREDDS XML) are reached through their own
/// [CatalogClient] implementations.
#[derive(Debug)]
pub struct JsonCatalogClient<H> {
    http: H,
    timeout: Duration,
}

impl<H: HttpGet> JsonCatalogClient<H> {
    /// Create a new JSON catalog client.
    pub fn new(http: H) -> Self {
        Self {
            http,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Create a new JSON catalog client with a request timeout.
    pub fn with_timeout(http: H, timeout: Duration) -> Self {
        Self { http, timeout }
    }
}

#[async_trait]
impl<H: HttpGet> CatalogClient for JsonCatalogClient<H> {
    async fn fetch_catalog(&self, url: &Url) -> Result<Vec<CatalogEntry>, SubsetError> {
        let response = self
            .http
            .get(url.as_str(), self.timeout)
            .await
            .map_err(|error| SubsetError::CatalogUnavailable {
                url: url.clone(),
                reason: error.to_string(),
            })?;
        if !response.is_success() {
            return Err(SubsetError::CatalogUnavailable {
                url: url.clone(),
                reason: format!("HTTP status {}", response.status),
            });
        }
        serde_json::from_str(&response.body).map_err(|error| SubsetError::CatalogUnavailable {
            url: url.clone(),
            reason: error.to_string(),
        })
    }
}

/// Resolves the datasets on a catalog server matching a variable and an experiment identifier.
///
/// Matching is dispatched on a [ParsingMethod]; the three strategies are structurally parallel
/// but trade accuracy against per-entry network cost.
#[derive(Debug)]
pub struct CatalogResolver<C, H, S> {
    catalog: C,
    http: H,
    store: S,
    timeout: Duration,
}

impl<C, H, S> CatalogResolver<C, H, S>
where
    C: CatalogClient,
    H: HttpGet,
    S: DatasetStore,
{
    /// Create a new CatalogResolver.
    ///
    /// # Arguments
    ///
    /// * `catalog`: Catalog client used to fetch the catalog document
    /// * `http`: HTTP client used for per-entry metadata requests
    /// * `store`: Array I/O backend used by the full-open strategy
    pub fn new(catalog: C, http: H, store: S) -> Self {
        Self {
            catalog,
            http,
            store,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the timeout for per-entry metadata requests.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Return the OPeNDAP access URLs of catalog entries matching a variable and experiment.
    ///
    /// Entries without an OPeNDAP access URL are skipped. Matches are returned in the
    /// catalog's enumeration order. Zero matches and an empty catalog are `Ok` outcomes; only
    /// an unreachable or unparsable catalog is an error.
    ///
    /// # Arguments
    ///
    /// * `catalog_url`: URL of the catalog document
    /// * `variable`: Name of the variable to match
    /// * `experiment`: Experiment identifier to match (e.g. `rcp45`)
    /// * `method`: Matching strategy, held fixed for the whole resolution
    pub async fn resolve(
        &self,
        catalog_url: &Url,
        variable: &str,
        experiment: &str,
        method: ParsingMethod,
    ) -> Result<Vec<Url>, SubsetError> {
        let entries = self.catalog.fetch_catalog(catalog_url).await?;
        tracing::debug!(
            "resolving {} catalog entries with method {}",
            entries.len(),
            method
        );
        let mut urls = Vec::new();
        for entry in &entries {
            let Some(access_url) = entry.opendap_url() else {
                continue;
            };
            let matched = match method {
                ParsingMethod::Filename => {
                    entry.name.starts_with(variable) && entry.name.contains(experiment)
                }
                ParsingMethod::MetadataProbe => {
                    self.matches_das(access_url, variable, experiment).await
                }
                ParsingMethod::FullOpen => {
                    self.matches_open(access_url, variable, experiment).await
                }
            };
            if matched {
                urls.push(access_url.clone());
            }
        }
        Ok(urls)
    }

    /// Fetch an entry's DAS attribute document and test it for the variable and experiment.
    ///
    /// A failed fetch means the entry does not match; it is not an error.
    async fn matches_das(&self, access_url: &Url, variable: &str, experiment: &str) -> bool {
        let das_url = format!("{}.das", access_url);
        match self.http.get(&das_url, self.timeout).await {
            Ok(response) if response.is_success() => {
                das_matches(&response.body, variable, experiment)
            }
            _ => false,
        }
    }

    /// Open an entry's dataset and test its materialised attributes for the variable and
    /// experiment.
    ///
    /// A failed open means the entry does not match; it is not an error.
    async fn matches_open(&self, access_url: &Url, variable: &str, experiment: &str) -> bool {
        let resource = ResourceDescriptor::new(access_url.clone());
        let Ok(dataset) = self.store.open(&resource).await else {
            return false;
        };
        let has_experiment = dataset
            .global_attribute(DRIVING_EXPERIMENT_ATTRIBUTE)
            .is_some_and(|value| value.split(',').any(|candidate| candidate.trim() == experiment));
        has_experiment && dataset.has_variable(variable)
    }
}

/// Test a DAS attribute document for a variable declaration and a driving experiment.
///
/// The variable must be declared as a top-level block; the experiment must appear in the
/// comma-separated value list of the driving experiment string attribute.
fn das_matches(das: &str, variable: &str, experiment: &str) -> bool {
    let variable_block = format!("    {} {{", variable);
    let has_variable = das.lines().any(|line| line.starts_with(&variable_block));
    let has_experiment = das.lines().any(|line| {
        DRIVING_EXPERIMENT
            .captures(line)
            .is_some_and(|captures| {
                captures[1]
                    .split(',')
                    .any(|candidate| candidate.trim() == experiment)
            })
    });
    has_variable && has_experiment
}
