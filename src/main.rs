//! This file defines the gridsubset binary entry point.

use gridsubset::catalog::{CatalogResolver, JsonCatalogClient};
use gridsubset::cli;
use gridsubset::dataset::NoArrayIo;
use gridsubset::http_client::ReqwestHttpClient;
use gridsubset::models::ParsingMethod;
use gridsubset::probe::Prober;
use gridsubset::tracing;

use std::time::Duration;

/// Application entry point
#[tokio::main]
async fn main() {
    let args = cli::parse();
    tracing::init_tracing();

    if args.parsing_method == ParsingMethod::FullOpen {
        eprintln!("full-open parsing requires an array I/O backend; use filename or metadata-probe");
        std::process::exit(1);
    }

    let timeout = Duration::from_secs(args.request_timeout);
    let catalog = JsonCatalogClient::with_timeout(ReqwestHttpClient::new(), timeout);
    let resolver =
        CatalogResolver::new(catalog, ReqwestHttpClient::new(), NoArrayIo).with_timeout(timeout);

    let urls = match resolver
        .resolve(
            &args.catalog_url,
            &args.variable,
            &args.experiment,
            args.parsing_method,
        )
        .await
    {
        Ok(urls) => urls,
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    };

    let prober = Prober::with_timeout(ReqwestHttpClient::new(), timeout);
    for url in urls {
        if args.probe && !prober.probe(url.as_str()).await {
            continue;
        }
        println!("{}", url);
    }
}
