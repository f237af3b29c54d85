//! # Recommendation Request Module
//!
//! A self-contained size recommendation request as a JSON document, used by
//! the command-line tool:
//!
//! ```json
//! {
//!   "measurements": { "chest": 95, "waist": 70, "hips": null },
//!   "size_table": [
//!     { "size": "S", "chest_min": 80, "chest_max": 88 },
//!     { "size": "M", "chest_min": 89, "chest_max": 97 }
//!   ],
//!   "available_sizes": ["S", "M"]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::measurements::UserMeasurements;
use crate::recommendation::Recommendation;
use crate::size_chart::{SizeChart, SizeChartRow};
use crate::size_matcher::SizeMatcher;

/// Everything the matcher needs for one recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeRequest {
    #[serde(default)]
    pub measurements: UserMeasurements,
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub size_table: Vec<SizeChartRow>,
    #[serde(default)]
    pub available_sizes: Vec<String>,
}

impl SizeRequest {
    /// The request's rows as a chart
    pub fn size_chart(&self) -> SizeChart {
        SizeChart::new(
            self.table_id.as_deref().unwrap_or_default(),
            self.size_table.clone(),
        )
    }

    pub fn run(&self, matcher: &SizeMatcher) -> Recommendation {
        matcher.recommend_size(&self.measurements, &self.size_chart(), &self.available_sizes)
    }
}

/// Read a request document from disk
pub fn load_request(path: &Path) -> Result<SizeRequest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file {}", path.display()))?;
    let request: SizeRequest = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse request file {}", path.display()))?;

    info!(
        path = %path.display(),
        rows = request.size_table.len(),
        available_sizes = request.available_sizes.len(),
        "Loaded size request"
    );
    Ok(request)
}
