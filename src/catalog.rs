//! # Catalog Module
//!
//! The seam between the size matcher and wherever products and size charts
//! live. Callers inject a [`SizeChartRepository`]; this module ships an
//! in-memory implementation and a TTL cache that can wrap any repository.
//!
//! ## Usage
//!
//! ```rust
//! use size_advisor::catalog::{recommend_for_product, CachedSizeChartRepository, InMemoryCatalog};
//! use size_advisor::config::CatalogConfig;
//! use size_advisor::measurements::{Parameter, UserMeasurements};
//! use size_advisor::size_matcher::SizeMatcher;
//!
//! let catalog = InMemoryCatalog::from_json_str(r#"{
//!     "products": [{ "product_id": "coat-1", "name": "Coat",
//!                    "available_sizes": "S, M", "size_table_id": "coats" }],
//!     "size_tables": [
//!         { "table_id": "coats", "size": "S", "chest_min": 80, "chest_max": 90 },
//!         { "table_id": "coats", "size": "M", "chest_min": 91, "chest_max": 100 }
//!     ]
//! }"#)?;
//! let config = CatalogConfig::default();
//! let repository = CachedSizeChartRepository::new(catalog, &config);
//!
//! let user = UserMeasurements::new().with(Parameter::Chest, 96);
//! let result = recommend_for_product(&repository, &SizeMatcher::default(), &config, "coat-1", &user)?;
//! assert_eq!(result.recommended_size.as_deref(), Some("M"));
//! # Ok::<(), size_advisor::catalog_errors::CatalogError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::catalog_errors::CatalogError;
use crate::config::CatalogConfig;
use crate::measurements::UserMeasurements;
use crate::recommendation::Recommendation;
use crate::size_chart::{SizeChart, SizeChartRow};
use crate::size_matcher::SizeMatcher;

/// A product as listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    /// Comma-separated size labels, e.g. "S, M, L"
    #[serde(default)]
    pub available_sizes: String,
    #[serde(default)]
    pub size_table_id: Option<String>,
}

impl Product {
    /// Size labels the product is sold in, in listing order
    pub fn available_sizes(&self) -> Vec<String> {
        self.available_sizes
            .split(',')
            .map(str::trim)
            .filter(|size| !size.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Size table of the product, or the configured default
    pub fn size_table_id<'a>(&'a self, config: &'a CatalogConfig) -> &'a str {
        match self.size_table_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => config.default_size_table_id.as_str(),
        }
    }
}

/// Source of products and size charts
pub trait SizeChartRepository: Send + Sync {
    /// The size chart with this table id, rows in catalog order
    fn size_chart(&self, table_id: &str) -> Result<SizeChart, CatalogError>;

    fn product(&self, product_id: &str) -> Result<Product, CatalogError>;
}

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    size_tables: Vec<SizeChartRow>,
}

/// Catalog held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    charts: HashMap<String, SizeChart>,
    products: HashMap<String, Product>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `{ "products": [...], "size_tables": [...] }`
    ///
    /// Size table rows are flat records carrying their own `table_id`.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let mut catalog = Self::new();

        for row in document.size_tables {
            catalog.add_row(row)?;
        }
        for product in document.products {
            catalog.add_product(product);
        }

        info!(
            tables = catalog.charts.len(),
            products = catalog.products.len(),
            "Loaded in-memory catalog"
        );
        Ok(catalog)
    }

    /// Append a row to the chart named by its `table_id`
    pub fn add_row(&mut self, row: SizeChartRow) -> Result<(), CatalogError> {
        let table_id = row
            .table_id
            .clone()
            .ok_or_else(|| CatalogError::Parse(format!("size '{}' has no table_id", row.size)))?;

        self.charts
            .entry(table_id.clone())
            .or_insert_with(|| SizeChart::new(&table_id, Vec::new()))
            .rows
            .push(row);
        Ok(())
    }

    /// Insert or replace a whole chart
    pub fn add_chart(&mut self, chart: SizeChart) {
        self.charts.insert(chart.table_id.clone(), chart);
    }

    pub fn add_product(&mut self, product: Product) {
        self.products.insert(product.product_id.clone(), product);
    }
}

impl SizeChartRepository for InMemoryCatalog {
    fn size_chart(&self, table_id: &str) -> Result<SizeChart, CatalogError> {
        self.charts
            .get(table_id)
            .cloned()
            .ok_or_else(|| CatalogError::TableNotFound(table_id.to_string()))
    }

    fn product(&self, product_id: &str) -> Result<Product, CatalogError> {
        self.products
            .get(product_id)
            .cloned()
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.to_string()))
    }
}

/// Repository decorator caching size charts for a fixed time
///
/// Only successful lookups are cached. Products are always read through.
pub struct CachedSizeChartRepository<R> {
    inner: R,
    ttl: Duration,
    charts: Mutex<HashMap<String, (Instant, SizeChart)>>,
}

impl<R: SizeChartRepository> CachedSizeChartRepository<R> {
    pub fn new(inner: R, config: &CatalogConfig) -> Self {
        Self {
            inner,
            ttl: Duration::from_secs(config.size_table_ttl_secs),
            charts: Mutex::new(HashMap::new()),
        }
    }

    /// Drop every cached chart
    pub fn clear_cache(&self) {
        self.lock_charts().clear();
        info!("Size chart cache cleared");
    }

    /// Number of charts currently cached (expired entries included)
    pub fn cached_tables(&self) -> usize {
        self.lock_charts().len()
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    fn lock_charts(&self) -> std::sync::MutexGuard<'_, HashMap<String, (Instant, SizeChart)>> {
        self.charts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<R: SizeChartRepository> SizeChartRepository for CachedSizeChartRepository<R> {
    fn size_chart(&self, table_id: &str) -> Result<SizeChart, CatalogError> {
        if let Some((fetched_at, chart)) = self.lock_charts().get(table_id) {
            if fetched_at.elapsed() < self.ttl {
                debug!(table_id = %table_id, "Size chart served from cache");
                return Ok(chart.clone());
            }
        }

        let chart = self.inner.size_chart(table_id)?;
        self.lock_charts()
            .insert(table_id.to_string(), (Instant::now(), chart.clone()));
        debug!(table_id = %table_id, rows = chart.len(), "Size chart cached");
        Ok(chart)
    }

    fn product(&self, product_id: &str) -> Result<Product, CatalogError> {
        self.inner.product(product_id)
    }
}

/// Recommend a size of a catalog product for the user
///
/// Mirrors the API endpoint: missing measurements short-circuit before any
/// lookup, an unknown product is an error, and a size chart that cannot be
/// fetched is treated as empty.
pub fn recommend_for_product<R: SizeChartRepository + ?Sized>(
    repository: &R,
    matcher: &SizeMatcher,
    config: &CatalogConfig,
    product_id: &str,
    measurements: &UserMeasurements,
) -> Result<Recommendation, CatalogError> {
    if measurements.is_empty() {
        return Ok(matcher.recommend_size(measurements, &SizeChart::default(), &[]));
    }

    let product = repository.product(product_id)?;
    let table_id = product.size_table_id(config);

    let chart = repository.size_chart(table_id).unwrap_or_else(|err| {
        warn!(product_id = %product_id, table_id = %table_id, error = %err, "Size chart lookup failed");
        SizeChart::new(table_id, Vec::new())
    });

    Ok(matcher.recommend_size(measurements, &chart, &product.available_sizes()))
}
