//! In-memory model of a gridded dataset and the array I/O contract.

use crate::error::SubsetError;
use crate::models::ResourceDescriptor;

use async_trait::async_trait;
use hashbrown::HashMap;
use ndarray::ArrayD;
use std::path::Path;

/// A named dimension of a dataset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dimension {
    /// Name of the dimension
    pub name: String,
    /// Extent of the dimension
    pub extent: usize,
}

/// An opened gridded dataset.
///
/// Holds named dimensions, data variables backed by [ndarray] arrays, and global attributes.
/// This is the unit of data that subsetting transforms consume and produce; reading it from and
/// writing it to an on-disk format is delegated to a [DatasetStore].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    dimensions: Vec<Dimension>,
    variables: HashMap<String, ArrayD<f64>>,
    attributes: HashMap<String, String>,
}

impl Dataset {
    /// Return a new, empty Dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dimension. Returns self for chaining.
    pub fn with_dimension(mut self, name: impl Into<String>, extent: usize) -> Self {
        self.dimensions.push(Dimension {
            name: name.into(),
            extent,
        });
        self
    }

    /// Add a data variable. Returns self for chaining.
    pub fn with_variable(mut self, name: impl Into<String>, data: ArrayD<f64>) -> Self {
        self.variables.insert(name.into(), data);
        self
    }

    /// Add a global attribute. Returns self for chaining.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// The dataset's dimensions.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// The names of the dataset's data variables.
    pub fn data_vars(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Whether the dataset declares a data variable with the given name.
    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// The data of a variable, if declared.
    pub fn variable(&self, name: &str) -> Option<&ArrayD<f64>> {
        self.variables.get(name)
    }

    /// The value of a global attribute, if declared.
    pub fn global_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the dataset is empty: true when any dimension has zero extent.
    ///
    /// An empty subset result is skipped rather than written out.
    pub fn is_empty(&self) -> bool {
        self.dimensions.iter().any(|dimension| dimension.extent == 0)
    }
}

/// Contract for opening and persisting datasets: the array I/O collaborator.
///
/// Implementations are expected to open remote resources lazily or streamed where the
/// underlying format supports it, and to honour a bounded per-request timeout for remote
/// fetches.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Open a dataset resource.
    ///
    /// # Arguments
    ///
    /// * `resource`: Descriptor of the dataset to open
    async fn open(&self, resource: &ResourceDescriptor) -> Result<Dataset, SubsetError>;

    /// Persist a dataset to a file.
    ///
    /// # Arguments
    ///
    /// * `dataset`: The dataset to persist
    /// * `path`: Path of the output file
    async fn write(&self, dataset: &Dataset, path: &Path) -> Result<(), SubsetError>;
}

/// Placeholder [DatasetStore] for contexts without an array I/O backend.
///
/// Opening or writing through it always fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoArrayIo;

#[async_trait]
impl DatasetStore for NoArrayIo {
    async fn open(&self, resource: &ResourceDescriptor) -> Result<Dataset, SubsetError> {
        Err(SubsetError::resource_open(
            resource.url().as_str(),
            "no array I/O backend configured",
        ))
    }

    async fn write(&self, _dataset: &Dataset, path: &Path) -> Result<(), SubsetError> {
        Err(SubsetError::DatasetWrite {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "no array I/O backend configured",
            ),
        })
    }
}
