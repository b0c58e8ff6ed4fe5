//! Concurrent subsetting of dataset resources into a manifest of output files.

use crate::dataset::{Dataset, DatasetStore};
use crate::error::SubsetError;
use crate::models::{DatasetFormat, Manifest, OutputArtifact, ResourceDescriptor};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;

/// The transform applied to each opened dataset.
///
/// A pure function from an opened dataset to its subsetted form. A result with a zero-extent
/// dimension marks the resource as producing nothing.
pub type Transform = dyn Fn(Dataset) -> Result<Dataset, SubsetError> + Send + Sync;

/// Fans a subsetting transform out over a list of dataset resources and aggregates the output
/// files into a [Manifest].
///
/// The manifest is the only state shared between in-flight tasks; appends to it are serialised
/// behind a mutex. Its final order reflects completion order, not input order, when more than
/// one task runs at a time.
#[derive(Debug)]
pub struct SubsetOrchestrator<S> {
    store: Arc<S>,
    workdir: PathBuf,
    identity: String,
}

impl<S: DatasetStore + 'static> SubsetOrchestrator<S> {
    /// Create a new SubsetOrchestrator.
    ///
    /// # Arguments
    ///
    /// * `store`: Array I/O backend used to open resources and write outputs
    /// * `workdir`: Per-batch working directory in which output files are rooted
    pub fn new(store: S, workdir: impl Into<PathBuf>) -> Self {
        Self {
            store: Arc::new(store),
            workdir: workdir.into(),
            identity: "subset".to_string(),
        }
    }

    /// Set the identity recorded in produced manifests.
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    /// Open every resource, apply the transform, persist non-empty results and return the
    /// manifest of output files.
    ///
    /// With `concurrency == 1` resources are processed strictly sequentially, in input order.
    /// With `concurrency > 1` up to that many tasks run at once and the manifest records
    /// artifacts in completion order. Either way the manifest is returned only once every
    /// resource has been handled.
    ///
    /// A resource whose transform yields an empty result is logged and skipped; it is not an
    /// error. Any other per-resource failure (open, transform, write) aborts the whole batch
    /// and cancels tasks still in flight.
    ///
    /// # Arguments
    ///
    /// * `resources`: The resources to subset
    /// * `transform`: The subsetting transform, shared by all tasks
    /// * `concurrency`: Maximum number of resources processed at once
    pub async fn subset_all(
        &self,
        resources: Vec<ResourceDescriptor>,
        transform: Arc<Transform>,
        concurrency: usize,
    ) -> Result<Manifest, SubsetError> {
        let mut manifest = Manifest::new(
            &self.identity,
            "Subsetted netCDF files",
            "gridsubset",
            &self.workdir,
        );

        if concurrency <= 1 {
            for resource in resources {
                let artifact =
                    process_resource(&*self.store, &self.workdir, &resource, &*transform).await?;
                if let Some(artifact) = artifact {
                    manifest.push(artifact);
                }
            }
            return Ok(manifest);
        }

        let manifest = Arc::new(Mutex::new(manifest));
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut tasks: JoinSet<Result<(), SubsetError>> = JoinSet::new();
        for resource in resources {
            let store = Arc::clone(&self.store);
            let workdir = self.workdir.clone();
            let transform = Arc::clone(&transform);
            let semaphore = Arc::clone(&semaphore);
            let manifest = Arc::clone(&manifest);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await?;
                let artifact =
                    process_resource(&*store, &workdir, &resource, &*transform).await?;
                if let Some(artifact) = artifact {
                    manifest.lock().await.push(artifact);
                }
                Ok(())
            });
        }

        // The first failed task aborts the batch; dropping the JoinSet cancels the rest.
        while let Some(joined) = tasks.join_next().await {
            joined??;
        }

        // Every task has completed, so the manifest has a single owner again.
        let manifest = match Arc::try_unwrap(manifest) {
            Ok(manifest) => manifest.into_inner(),
            Err(manifest) => manifest.lock().await.clone(),
        };
        Ok(manifest)
    }
}

/// Process one resource: open, transform, persist.
///
/// Returns the output artifact, or `None` when the transform produced an empty result.
async fn process_resource<S: DatasetStore>(
    store: &S,
    workdir: &Path,
    resource: &ResourceDescriptor,
    transform: &Transform,
) -> Result<Option<OutputArtifact>, SubsetError> {
    let dataset = store.open(resource).await?;
    let subset = transform(dataset)?;
    if subset.is_empty() {
        tracing::warn!("subset is empty for dataset: {}", resource.url());
        return Ok(None);
    }
    let path = workdir.join(resource.output_file_name());
    store.write(&subset, &path).await?;
    Ok(Some(OutputArtifact {
        identity: resource.base_name(),
        format: DatasetFormat::NetCdf,
        file: path,
    }))
}
