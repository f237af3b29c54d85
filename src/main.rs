use anyhow::{bail, Context, Result};
use size_advisor::catalog::{recommend_for_product, CachedSizeChartRepository, InMemoryCatalog};
use size_advisor::config::{CatalogConfig, MatcherConfig};
use size_advisor::localization::init_localization;
use size_advisor::measurements::UserMeasurements;
use size_advisor::request::load_request;
use size_advisor::size_matcher::SizeMatcher;
use std::env;
use std::fs;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "usage: size_advisor <request.json>\n       size_advisor <catalog.json> <product_id> <measurements.json>";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("SIZE_ADVISOR_LOG_FORMAT").is_ok_and(|format| format == "json");

    // Logs go to stderr so stdout carries only the recommendation
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();
    init_localization();

    info!("Starting size advisor");

    let matcher = SizeMatcher::new(MatcherConfig::from_env());
    let args: Vec<String> = env::args().skip(1).collect();

    let recommendation = match args.as_slice() {
        [request_path] => load_request(Path::new(request_path))?.run(&matcher),
        [catalog_path, product_id, measurements_path] => {
            let config = CatalogConfig::from_env();
            let catalog_json = fs::read_to_string(catalog_path)
                .with_context(|| format!("Failed to read catalog file {catalog_path}"))?;
            let catalog = InMemoryCatalog::from_json_str(&catalog_json)
                .with_context(|| format!("Failed to load catalog {catalog_path}"))?;
            let repository = CachedSizeChartRepository::new(catalog, &config);

            let measurements_json = fs::read_to_string(measurements_path)
                .with_context(|| format!("Failed to read measurements file {measurements_path}"))?;
            let measurements: UserMeasurements = serde_json::from_str(&measurements_json)
                .context("Failed to parse measurements")?;

            recommend_for_product(&repository, &matcher, &config, product_id, &measurements)?
        }
        _ => bail!(USAGE),
    };

    println!("{}", serde_json::to_string_pretty(&recommendation)?);
    Ok(())
}
