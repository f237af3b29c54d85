//! # Catalog Tests
//!
//! Tests for the product/size chart seam: caching, product lookups and the
//! product-level recommendation flow, plus loading request files from disk.

use anyhow::Result;
use serde_json::json;
use size_advisor::catalog::{
    recommend_for_product, CachedSizeChartRepository, InMemoryCatalog, Product,
    SizeChartRepository,
};
use size_advisor::catalog_errors::CatalogError;
use size_advisor::config::CatalogConfig;
use size_advisor::measurements::{Parameter, UserMeasurements};
use size_advisor::recommendation::{Confidence, FailureReason};
use size_advisor::request::load_request;
use size_advisor::size_chart::SizeChart;
use size_advisor::size_matcher::SizeMatcher;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;

const CATALOG_JSON: &str = r#"{
    "products": [
        { "product_id": "parka", "name": "Parka", "available_sizes": "S, M, L",
          "size_table_id": "outerwear_standard" },
        { "product_id": "jeans", "name": "Jeans", "available_sizes": "28,30",
          "size_table_id": "jeans" },
        { "product_id": "scarf", "name": "Scarf", "available_sizes": "ONE" },
        { "product_id": "mystery", "name": "Mystery", "available_sizes": "S",
          "size_table_id": "missing_table" }
    ],
    "size_tables": [
        { "table_id": "outerwear_standard", "size": "S", "chest_min": 80, "chest_max": 88,
          "waist_min": 60, "waist_max": 68, "russian_size": "42-44" },
        { "table_id": "outerwear_standard", "size": "M", "chest_min": 89, "chest_max": 97,
          "waist_min": 69, "waist_max": 76, "russian_size": "46-48" },
        { "table_id": "outerwear_standard", "size": "L", "chest_min": 98, "chest_max": 106,
          "waist_min": 77, "waist_max": 84, "russian_size": "50-52" },
        { "table_id": "jeans", "size": "28", "waist_girth_min": 70, "waist_girth_max": 74 },
        { "table_id": "jeans", "size": "30", "waist_girth_min": 75, "waist_girth_max": 79 }
    ]
}"#;

/// Repository that counts size chart fetches
struct CountingRepository {
    inner: InMemoryCatalog,
    fetches: AtomicUsize,
}

impl CountingRepository {
    fn new() -> Self {
        Self {
            inner: InMemoryCatalog::from_json_str(CATALOG_JSON).expect("catalog fixture is valid"),
            fetches: AtomicUsize::new(0),
        }
    }
}

impl SizeChartRepository for CountingRepository {
    fn size_chart(&self, table_id: &str) -> Result<SizeChart, CatalogError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.size_chart(table_id)
    }

    fn product(&self, product_id: &str) -> Result<Product, CatalogError> {
        self.inner.product(product_id)
    }
}

fn user() -> UserMeasurements {
    UserMeasurements::new()
        .with(Parameter::Chest, 95)
        .with(Parameter::Waist, 72)
        .with(Parameter::NationalSize, "46")
}

#[test]
fn test_recommend_for_product() -> Result<()> {
    let catalog = InMemoryCatalog::from_json_str(CATALOG_JSON)?;
    let config = CatalogConfig::default();

    let result =
        recommend_for_product(&catalog, &SizeMatcher::default(), &config, "parka", &user())?;

    assert_eq!(result.recommended_size.as_deref(), Some("M"));
    assert_eq!(result.confidence, Confidence::High);
    assert_eq!(result.details.max_possible_score, Some(3));
    Ok(())
}

#[test]
fn test_default_size_table_is_used() -> Result<()> {
    let catalog = InMemoryCatalog::from_json_str(CATALOG_JSON)?;
    let config = CatalogConfig::default();

    // The scarf names no table, so the outerwear chart applies, but it is only sold in ONE
    let result =
        recommend_for_product(&catalog, &SizeMatcher::default(), &config, "scarf", &user())?;
    assert_eq!(result.reason(), Some(FailureReason::NoAvailableSizes));
    Ok(())
}

#[test]
fn test_missing_table_becomes_no_size_table() -> Result<()> {
    let catalog = InMemoryCatalog::from_json_str(CATALOG_JSON)?;
    let result = recommend_for_product(
        &catalog,
        &SizeMatcher::default(),
        &CatalogConfig::default(),
        "mystery",
        &user(),
    )?;
    assert_eq!(result.reason(), Some(FailureReason::NoSizeTable));
    Ok(())
}

#[test]
fn test_unknown_product_is_an_error() -> Result<()> {
    let catalog = InMemoryCatalog::from_json_str(CATALOG_JSON)?;
    let result = recommend_for_product(
        &catalog,
        &SizeMatcher::default(),
        &CatalogConfig::default(),
        "nope",
        &user(),
    );
    assert_eq!(result, Err(CatalogError::ProductNotFound("nope".to_string())));
    Ok(())
}

#[test]
fn test_missing_measurements_short_circuit_lookups() -> Result<()> {
    let repository = CountingRepository::new();
    let result = recommend_for_product(
        &repository,
        &SizeMatcher::default(),
        &CatalogConfig::default(),
        "nope",
        &UserMeasurements::new(),
    )?;
    assert_eq!(result.reason(), Some(FailureReason::NoMeasurements));
    assert_eq!(repository.fetches.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn test_no_common_params_for_jeans() -> Result<()> {
    let catalog = InMemoryCatalog::from_json_str(CATALOG_JSON)?;
    let result = recommend_for_product(
        &catalog,
        &SizeMatcher::default(),
        &CatalogConfig::default(),
        "jeans",
        &user(),
    )?;
    assert_eq!(result.reason(), Some(FailureReason::NoCommonParams));

    let result = recommend_for_product(
        &catalog,
        &SizeMatcher::default(),
        &CatalogConfig::default(),
        "jeans",
        &UserMeasurements::new().with(Parameter::WaistGirth, 76),
    )?;
    assert_eq!(result.recommended_size.as_deref(), Some("30"));
    Ok(())
}

#[test]
fn test_cache_serves_repeated_lookups() -> Result<()> {
    let cached = CachedSizeChartRepository::new(CountingRepository::new(), &CatalogConfig::default());

    let first = cached.size_chart("outerwear_standard")?;
    let second = cached.size_chart("outerwear_standard")?;
    assert_eq!(first, second);
    assert_eq!(first.sizes(), vec!["S", "M", "L"]);
    assert_eq!(cached.inner().fetches.load(Ordering::SeqCst), 1);
    assert_eq!(cached.cached_tables(), 1);

    cached.clear_cache();
    assert_eq!(cached.cached_tables(), 0);
    cached.size_chart("outerwear_standard")?;
    assert_eq!(cached.inner().fetches.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_expired_entries_are_refetched() -> Result<()> {
    let config = CatalogConfig {
        size_table_ttl_secs: 0,
        ..Default::default()
    };
    let cached = CachedSizeChartRepository::new(CountingRepository::new(), &config);

    cached.size_chart("jeans")?;
    cached.size_chart("jeans")?;
    assert_eq!(cached.inner().fetches.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_failed_lookups_are_not_cached() {
    let cached = CachedSizeChartRepository::new(CountingRepository::new(), &CatalogConfig::default());

    assert!(cached.size_chart("missing_table").is_err());
    assert!(cached.size_chart("missing_table").is_err());
    assert_eq!(cached.inner().fetches.load(Ordering::SeqCst), 2);
    assert_eq!(cached.cached_tables(), 0);
}

#[test]
fn test_malformed_catalog_is_a_parse_error() {
    let result = InMemoryCatalog::from_json_str(r#"{ "size_tables": [ { "size": "S" } ] }"#);
    assert!(matches!(result, Err(CatalogError::Parse(_))));

    let result = InMemoryCatalog::from_json_str("not json");
    assert!(matches!(result, Err(CatalogError::Parse(_))));
}

#[test]
fn test_load_request_from_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    let request = json!({
        "measurements": { "chest": 95, "waist": 70, "hips": null },
        "size_table": [
            { "size": "S", "chest_min": 80, "chest_max": 88, "waist_min": 60, "waist_max": 68 },
            { "size": "M", "chest_min": 89, "chest_max": 97, "waist_min": 69, "waist_max": 76 }
        ],
        "available_sizes": ["S", "M"]
    });
    file.as_file_mut().write_all(request.to_string().as_bytes())?;

    let loaded = load_request(file.path())?;
    let result = loaded.run(&SizeMatcher::default());

    assert_eq!(result.recommended_size.as_deref(), Some("M"));
    assert_eq!(result.details.score, Some(2));
    assert_eq!(result.details.max_possible_score, Some(2));
    assert_eq!(result.confidence, Confidence::High);
    Ok(())
}

#[test]
fn test_load_request_reports_bad_files() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.as_file_mut().write_all(b"{ not json")?;

    let err = load_request(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse request file"));

    let err = load_request(std::path::Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read request file"));
    Ok(())
}
