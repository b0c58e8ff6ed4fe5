//! This crate discovers gridded climate datasets on a remote catalog server, applies a
//! caller-supplied spatial/temporal subsetting transform to each one, and aggregates the
//! resulting output files into a single manifest. Individual datasets are processed
//! concurrently up to a caller-chosen degree, with per-resource empty results tolerated and
//! logged rather than failing the batch.
//!
//! Three components are exposed:
//!
//! * The [subset orchestrator](subset::SubsetOrchestrator) fans a transform out over a list of
//!   resources and assembles the shared [manifest](models::Manifest).
//! * The [catalog resolver](catalog::CatalogResolver) filters a remote catalog's entries down
//!   to those matching a variable and an experiment identifier, with three interchangeable
//!   matching strategies of increasing cost and accuracy.
//! * The [reachability prober](probe::Prober) checks whether a URL denotes a live OPeNDAP
//!   dataset endpoint.
//!
//! The scientific transform itself, the on-disk array format and the catalog wire format are
//! collaborators behind traits ([dataset::DatasetStore], [catalog::CatalogClient],
//! [http_client::HttpGet]); this crate owns the orchestration, discovery and failure-isolation
//! logic only.
//!
//! It is built on top of a number of open source components.
//!
//! * [Tokio](tokio), the most popular asynchronous Rust runtime.
//! * [reqwest], an HTTP client built on the [hyper](https://hyper.rs) library.
//! * [Serde](serde) performs (de)serialisation of catalog documents and manifest descriptors.
//! * [ndarray] provides [NumPy](https://numpy.org)-like n-dimensional arrays backing dataset
//!   variables.

pub mod catalog;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod http_client;
pub mod models;
pub mod probe;
pub mod subset;
#[cfg(test)]
pub mod test_utils;
pub mod tracing;
