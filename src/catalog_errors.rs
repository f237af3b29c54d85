//! # Catalog Error Types Module
//!
//! Errors raised while looking up products and size charts. The size matcher
//! itself never fails; these only surface from the catalog seam around it.

/// Custom error types for catalog lookups
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// No size chart with this table id
    TableNotFound(String),
    /// No product with this id
    ProductNotFound(String),
    /// The backing store could not be read
    Load(String),
    /// Catalog data was malformed
    Parse(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::TableNotFound(id) => write!(f, "Size table not found: {id}"),
            CatalogError::ProductNotFound(id) => write!(f, "Product not found: {id}"),
            CatalogError::Load(msg) => write!(f, "Catalog load error: {msg}"),
            CatalogError::Parse(msg) => write!(f, "Catalog parse error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        CatalogError::Load(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Load(err.to_string())
    }
}
