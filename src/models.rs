//! Data types and associated functions and methods

use crate::error::SubsetError;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use strum_macros::Display;
use url::Url;

/// Name of the catalog access protocol used to open datasets remotely.
pub const OPENDAP_PROTOCOL: &str = "OPENDAP";

/// Suffix inserted into output file names, between the base name and the extension.
pub const OUTPUT_SUFFIX: &str = "-subset";

/// An opaque handle to a remote or local dataset.
///
/// Identified by its source URL. An optional local path records where the dataset has been
/// materialised on disk, if it has been.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ResourceDescriptor {
    /// Location of the dataset
    url: Url,
    /// Local path of the dataset, if materialised on disk
    file: Option<PathBuf>,
}

impl ResourceDescriptor {
    /// Return a new ResourceDescriptor for a URL.
    pub fn new(url: Url) -> Self {
        Self { url, file: None }
    }

    /// Return a new ResourceDescriptor for a URL with a known local path.
    pub fn with_file(url: Url, file: PathBuf) -> Self {
        Self {
            url,
            file: Some(file),
        }
    }

    /// Source URL of the resource.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Local path of the resource, if known.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Whether the resource denotes a local file rather than a remote endpoint.
    pub fn is_local(&self) -> bool {
        self.url.scheme() == "file"
    }

    /// File name of the resource: the local file name if known, otherwise the final path
    /// segment of the URL.
    fn file_name(&self) -> String {
        if let Some(file) = &self.file {
            if let Some(name) = file.file_name() {
                return name.to_string_lossy().into_owned();
            }
        }
        self.url
            .path_segments()
            .and_then(|segments| segments.filter(|segment| !segment.is_empty()).last())
            .unwrap_or("dataset")
            .to_string()
    }

    /// Base name of the resource: the file name without its extension.
    ///
    /// This is the identity under which the resource's output artifact is recorded.
    pub fn base_name(&self) -> String {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => name,
        }
    }

    /// Name of the output file for this resource: base name, [OUTPUT_SUFFIX], original
    /// extension.
    pub fn output_file_name(&self) -> String {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => {
                format!("{}{}.{}", stem, OUTPUT_SUFFIX, extension)
            }
            _ => format!("{}{}", name, OUTPUT_SUFFIX),
        }
    }
}

/// Strategy for deciding whether a catalog entry matches a variable and experiment.
///
/// The strategies trade accuracy against cost. An entry that matches under one strategy may not
/// match under another; hold the strategy fixed across a resolution for reproducible results.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ParsingMethod {
    /// Match on the entry name alone. Cheapest, no extra requests, but relies on file naming
    /// conventions holding.
    #[strum(serialize = "filename")]
    Filename,
    /// Fetch each entry's DAS attribute document and match on its declared variable and
    /// driving experiment. One extra request per catalog entry.
    #[strum(serialize = "metadata-probe")]
    MetadataProbe,
    /// Open each dataset and inspect its materialised attributes. Most accurate and most
    /// expensive.
    #[strum(serialize = "full-open")]
    FullOpen,
}

/// One item exposed by a remote catalog: a display name and access URLs keyed by protocol.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CatalogEntry {
    /// Display name of the entry
    pub name: String,
    /// Access URLs keyed by protocol name
    pub access_urls: HashMap<String, Url>,
}

impl CatalogEntry {
    /// Return a new CatalogEntry with a single OPeNDAP access URL.
    pub fn opendap(name: impl Into<String>, url: Url) -> Self {
        let mut access_urls = HashMap::new();
        access_urls.insert(OPENDAP_PROTOCOL.to_string(), url);
        Self {
            name: name.into(),
            access_urls,
        }
    }

    /// The entry's OPeNDAP access URL, if it exposes one.
    pub fn opendap_url(&self) -> Option<&Url> {
        self.access_urls.get(OPENDAP_PROTOCOL)
    }
}

/// Format of an output artifact.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    /// netCDF
    #[strum(serialize = "netcdf")]
    NetCdf,
}

/// The result of subsetting one resource.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OutputArtifact {
    /// Identity of the artifact, derived from the source resource's base name
    pub identity: String,
    /// Declared format of the output file
    pub format: DatasetFormat,
    /// Path of the output file
    pub file: PathBuf,
}

/// An aggregate of the output artifacts produced by one subsetting batch.
///
/// Artifacts are recorded in completion order, which under concurrent execution is not
/// necessarily the caller's resource order.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Manifest {
    /// Identity of the batch
    identity: String,
    /// Human-readable description of the batch
    description: String,
    /// Publisher of the batch
    publisher: String,
    /// Working directory in which output files are rooted
    workdir: PathBuf,
    /// Output artifacts, in completion order
    files: Vec<OutputArtifact>,
}

impl Manifest {
    /// Return a new, empty Manifest.
    pub fn new(
        identity: impl Into<String>,
        description: impl Into<String>,
        publisher: impl Into<String>,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            identity: identity.into(),
            description: description.into(),
            publisher: publisher.into(),
            workdir: workdir.into(),
            files: Vec::new(),
        }
    }

    /// Identity of the batch.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Working directory in which output files are rooted.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Append an artifact. Ownership of the artifact transfers to the manifest.
    pub fn push(&mut self, artifact: OutputArtifact) {
        self.files.push(artifact);
    }

    /// The recorded artifacts, in completion order.
    pub fn files(&self) -> &[OutputArtifact] {
        &self.files
    }

    /// Number of recorded artifacts.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the manifest contains no artifacts.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The first recorded artifact, exposed as the batch's flagship output.
    pub fn flagship(&self) -> Option<&OutputArtifact> {
        self.files.first()
    }

    /// Serialise the manifest into a JSON descriptor referencing each artifact's file path and
    /// identity, suitable for a downstream protocol layer.
    pub fn descriptor(&self) -> Result<String, SubsetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(url: &str) -> ResourceDescriptor {
        ResourceDescriptor::new(Url::parse(url).unwrap())
    }

    #[test]
    fn resource_base_name_from_url() {
        let resource = remote("http://example.com/thredds/dodsC/tasmax_rcp45_r1.nc");
        assert_eq!("tasmax_rcp45_r1", resource.base_name());
        assert_eq!("tasmax_rcp45_r1-subset.nc", resource.output_file_name());
    }

    #[test]
    fn resource_base_name_from_file() {
        let resource = ResourceDescriptor::with_file(
            Url::parse("http://example.com/data").unwrap(),
            PathBuf::from("/tmp/pr_rcp85.nc"),
        );
        assert_eq!("pr_rcp85", resource.base_name());
        assert_eq!("pr_rcp85-subset.nc", resource.output_file_name());
    }

    #[test]
    fn resource_without_extension() {
        let resource = remote("http://example.com/thredds/dodsC/tasmax");
        assert_eq!("tasmax", resource.base_name());
        assert_eq!("tasmax-subset", resource.output_file_name());
    }

    #[test]
    fn resource_with_empty_path() {
        let resource = remote("http://example.com");
        assert_eq!("dataset", resource.base_name());
    }

    #[test]
    fn resource_is_local() {
        assert!(remote("file:///tmp/tasmax.nc").is_local());
        assert!(!remote("http://example.com/tasmax.nc").is_local());
    }

    #[test]
    fn catalog_entry_opendap_url() {
        let url = Url::parse("http://example.com/dodsC/ds.nc").unwrap();
        let entry = CatalogEntry::opendap("ds.nc", url.clone());
        assert_eq!(Some(&url), entry.opendap_url());
    }

    #[test]
    fn catalog_entry_without_opendap_url() {
        let url = Url::parse("http://example.com/fileServer/ds.nc").unwrap();
        let mut access_urls = HashMap::new();
        access_urls.insert("HTTPServer".to_string(), url);
        let entry = CatalogEntry {
            name: "ds.nc".to_string(),
            access_urls,
        };
        assert_eq!(None, entry.opendap_url());
    }

    #[test]
    fn parsing_method_display() {
        assert_eq!("filename", ParsingMethod::Filename.to_string());
        assert_eq!("metadata-probe", ParsingMethod::MetadataProbe.to_string());
        assert_eq!("full-open", ParsingMethod::FullOpen.to_string());
    }

    #[test]
    fn manifest_push_and_flagship() {
        let mut manifest = Manifest::new("subset", "Subsetted netCDF files", "gridsubset", "/work");
        assert!(manifest.is_empty());
        assert_eq!(None, manifest.flagship());
        let artifact = OutputArtifact {
            identity: "tasmax_rcp45_r1".to_string(),
            format: DatasetFormat::NetCdf,
            file: PathBuf::from("/work/tasmax_rcp45_r1-subset.nc"),
        };
        manifest.push(artifact.clone());
        assert_eq!(1, manifest.len());
        assert_eq!(Some(&artifact), manifest.flagship());
        assert_eq!(&[artifact][..], manifest.files());
    }

    #[test]
    fn manifest_descriptor() {
        let mut manifest = Manifest::new("subset", "Subsetted netCDF files", "gridsubset", "/work");
        manifest.push(OutputArtifact {
            identity: "tasmax_rcp45_r1".to_string(),
            format: DatasetFormat::NetCdf,
            file: PathBuf::from("/work/tasmax_rcp45_r1-subset.nc"),
        });
        let descriptor = manifest.descriptor().unwrap();
        let value: serde_json::Value = serde_json::from_str(&descriptor).unwrap();
        assert_eq!("subset", value["identity"]);
        assert_eq!("gridsubset", value["publisher"]);
        assert_eq!("tasmax_rcp45_r1", value["files"][0]["identity"]);
        assert_eq!("netcdf", value["files"][0]["format"]);
        assert_eq!("/work/tasmax_rcp45_r1-subset.nc", value["files"][0]["file"]);
    }
}
