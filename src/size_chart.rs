//! # Size Chart Module
//!
//! Size charts as they come out of the product catalog: an ordered list of
//! rows, one per size, each carrying a `(min, max)` pair for the parameters the
//! garment defines plus an optional national size band.
//!
//! Rows deserialize from the flat catalog record layout:
//!
//! ```json
//! { "table_id": "outerwear_standard", "size": "M",
//!   "chest_min": 90, "chest_max": 100, "russian_size": "46-48" }
//! ```
//!
//! A bound given as `null`, a blank string or text that is not an integer is
//! treated as absent. When only one side of a pair is present the range is
//! open on the other side.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

use crate::measurements::Parameter;
use crate::national_size::NationalSizeBand;

/// Inclusive centimeter range one size accepts for a parameter
///
/// A missing side leaves the range open in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl ParameterRange {
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Build a range from optional bounds, `None` when both are missing
    pub fn from_bounds(min: Option<i64>, max: Option<i64>) -> Option<Self> {
        if min.is_none() && max.is_none() {
            return None;
        }
        Some(Self { min, max })
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min.map_or(true, |min| min <= value) && self.max.map_or(true, |max| value <= max)
    }
}

/// One size of one garment table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct SizeChartRow {
    /// Table this row belongs to, when loaded from a multi-table catalog
    pub table_id: Option<String>,
    /// Size label, the row's identity within its chart
    pub size: String,
    ranges: BTreeMap<Parameter, ParameterRange>,
    national_size: Option<NationalSizeBand>,
}

impl SizeChartRow {
    /// Create a row with no parameters defined
    pub fn new(size: &str) -> Self {
        Self {
            table_id: None,
            size: size.trim().to_string(),
            ranges: BTreeMap::new(),
            national_size: None,
        }
    }

    /// Define a numeric parameter for this size
    ///
    /// # Examples
    ///
    /// ```rust
    /// use size_advisor::measurements::Parameter;
    /// use size_advisor::size_chart::SizeChartRow;
    ///
    /// let row = SizeChartRow::new("M").with_range(Parameter::Chest, 90, 100);
    /// assert!(row.range(Parameter::Chest).unwrap().contains(95));
    /// ```
    pub fn with_range(mut self, parameter: Parameter, min: i64, max: i64) -> Self {
        if !parameter.is_categorical() {
            self.ranges.insert(parameter, ParameterRange::new(min, max));
        }
        self
    }

    /// Define a numeric parameter with possibly missing bounds
    ///
    /// A row given neither bound leaves the parameter undefined.
    pub fn with_open_range(
        mut self,
        parameter: Parameter,
        min: Option<i64>,
        max: Option<i64>,
    ) -> Self {
        if parameter.is_categorical() {
            return self;
        }
        match ParameterRange::from_bounds(min, max) {
            Some(range) => {
                self.ranges.insert(parameter, range);
            }
            None => {
                self.ranges.remove(&parameter);
            }
        }
        self
    }

    /// Set the national size band from its raw text
    pub fn with_national_size(mut self, raw: &str) -> Self {
        self.national_size = parse_band(raw);
        self
    }

    pub fn with_table_id(mut self, table_id: &str) -> Self {
        self.table_id = Some(table_id.to_string());
        self
    }

    /// Range for a numeric parameter, if this size defines it
    pub fn range(&self, parameter: Parameter) -> Option<ParameterRange> {
        self.ranges.get(&parameter).copied()
    }

    pub fn national_size(&self) -> Option<&NationalSizeBand> {
        self.national_size.as_ref()
    }

    /// Whether this size defines the parameter at all
    pub fn defines(&self, parameter: Parameter) -> bool {
        if parameter.is_categorical() {
            self.national_size.is_some()
        } else {
            self.ranges.contains_key(&parameter)
        }
    }
}

fn parse_band(raw: &str) -> Option<NationalSizeBand> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(NationalSizeBand::parse(raw))
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 => {
                Some(format!("{}", f as i64))
            }
            _ => Some(n.to_string()),
        },
        _ => None,
    }
}

fn bound_from_record(record: &Map<String, Value>, key: &str, size: &str) -> Option<i64> {
    let value = record.get(key)?;
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(bound) => Some(bound),
            Err(_) => {
                warn!(size = %size, key = %key, value = %s, "Ignoring non-integer size chart bound");
                None
            }
        },
        _ => None,
    }
}

impl TryFrom<Map<String, Value>> for SizeChartRow {
    type Error = String;

    fn try_from(record: Map<String, Value>) -> Result<Self, Self::Error> {
        let size = record
            .get("size")
            .and_then(value_as_text)
            .ok_or_else(|| "size chart row is missing its size label".to_string())?;

        let mut row = SizeChartRow::new(&size);
        row.table_id = record.get("table_id").and_then(value_as_text);

        for parameter in Parameter::ALL {
            if parameter.is_categorical() {
                row.national_size = record
                    .get(parameter.key())
                    .and_then(value_as_text)
                    .and_then(|raw| parse_band(&raw));
                continue;
            }

            let min = bound_from_record(&record, &format!("{}_min", parameter.key()), &size);
            let max = bound_from_record(&record, &format!("{}_max", parameter.key()), &size);
            if let Some(range) = ParameterRange::from_bounds(min, max) {
                row.ranges.insert(parameter, range);
            }
        }

        Ok(row)
    }
}

impl From<SizeChartRow> for Map<String, Value> {
    fn from(row: SizeChartRow) -> Self {
        let mut record = Map::new();
        if let Some(table_id) = row.table_id {
            record.insert("table_id".to_string(), Value::from(table_id));
        }
        record.insert("size".to_string(), Value::from(row.size));
        for (parameter, range) in row.ranges {
            if let Some(min) = range.min {
                record.insert(format!("{}_min", parameter.key()), Value::from(min));
            }
            if let Some(max) = range.max {
                record.insert(format!("{}_max", parameter.key()), Value::from(max));
            }
        }
        if let Some(band) = row.national_size {
            record.insert(
                Parameter::NationalSize.key().to_string(),
                Value::from(band.as_str()),
            );
        }
        record
    }
}

/// Ordered collection of rows belonging to one table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeChart {
    pub table_id: String,
    pub rows: Vec<SizeChartRow>,
}

impl SizeChart {
    pub fn new(table_id: &str, rows: Vec<SizeChartRow>) -> Self {
        Self {
            table_id: table_id.to_string(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Keep only the rows whose size is in `available_sizes`, preserving chart order
    pub fn filter_available(&self, available_sizes: &[String]) -> SizeChart {
        let rows = self
            .rows
            .iter()
            .filter(|row| available_sizes.iter().any(|size| *size == row.size))
            .cloned()
            .collect();
        SizeChart::new(&self.table_id, rows)
    }

    /// Size labels in chart order
    pub fn sizes(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.size.as_str()).collect()
    }
}
