//! Command Line Interface (CLI) arguments.

use crate::models::ParsingMethod;

use clap::Parser;
use url::Url;

/// Gridsubset command line interface
#[derive(Clone, Debug, Parser)]
pub struct CommandLineArgs {
    /// URL of the catalog document listing candidate datasets
    #[arg(long, env = "GRIDSUBSET_CATALOG_URL")]
    pub catalog_url: Url,
    /// Name of the variable to match
    #[arg(long, env = "GRIDSUBSET_VARIABLE")]
    pub variable: String,
    /// Experiment identifier to match, e.g. rcp45
    #[arg(long, env = "GRIDSUBSET_EXPERIMENT")]
    pub experiment: String,
    /// Catalog entry matching strategy
    #[arg(
        long,
        value_enum,
        default_value_t = ParsingMethod::Filename,
        env = "GRIDSUBSET_PARSING_METHOD"
    )]
    pub parsing_method: ParsingMethod,
    /// Whether to probe each matching URL for reachability before listing it
    #[arg(long, default_value_t = false, env = "GRIDSUBSET_PROBE")]
    pub probe: bool,
    /// Timeout in seconds for catalog, metadata and probe requests
    #[arg(long, default_value_t = 5, env = "GRIDSUBSET_REQUEST_TIMEOUT")]
    pub request_timeout: u64,
}

/// Returns parsed command line arguments.
pub fn parse() -> CommandLineArgs {
    CommandLineArgs::parse()
}
