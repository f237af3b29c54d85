//! # Chart Boundaries Module
//!
//! Computes, for every parameter a size chart defines, the smallest lower
//! bound and the largest upper bound across all of its rows, together with the
//! size holding each extreme. The matcher uses these to decide whether a
//! measurement lies outside the chart entirely.

use std::collections::BTreeMap;
use tracing::debug;

use crate::measurements::Parameter;
use crate::size_chart::SizeChart;

/// One extreme bound of a parameter and the row holding it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extreme {
    pub value: i64,
    pub size: String,
    /// Position of the holding row in the chart
    pub row: usize,
}

/// Global extremes of one parameter across a chart
///
/// Lower bounds only feed `lowest` and upper bounds only feed `highest`, so
/// a chart whose rows are all open on one side has no extreme on that side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boundary {
    /// Smallest lower bound, held by the first row reaching it
    pub lowest: Option<Extreme>,
    /// Largest upper bound, held by the first row reaching it
    pub highest: Option<Extreme>,
}

impl Boundary {
    pub fn absolute_min(&self) -> Option<i64> {
        self.lowest.as_ref().map(|extreme| extreme.value)
    }

    pub fn absolute_max(&self) -> Option<i64> {
        self.highest.as_ref().map(|extreme| extreme.value)
    }

    pub fn size_at_min(&self) -> Option<&str> {
        self.lowest.as_ref().map(|extreme| extreme.size.as_str())
    }

    pub fn size_at_max(&self) -> Option<&str> {
        self.highest.as_ref().map(|extreme| extreme.size.as_str())
    }

    fn widen(&mut self, lower: Option<i64>, upper: Option<i64>, size: &str, row: usize) {
        if let Some(lower) = lower {
            if self.lowest.as_ref().map_or(true, |extreme| lower < extreme.value) {
                self.lowest = Some(Extreme {
                    value: lower,
                    size: size.to_string(),
                    row,
                });
            }
        }
        if let Some(upper) = upper {
            if self.highest.as_ref().map_or(true, |extreme| upper > extreme.value) {
                self.highest = Some(Extreme {
                    value: upper,
                    size: size.to_string(),
                    row,
                });
            }
        }
    }
}

/// Boundaries of every parameter a chart defines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartBoundaries {
    bounds: BTreeMap<Parameter, Boundary>,
    // Some row carries a national size band that is not numeric (e.g. "S-M")
    textual_national_size: bool,
}

impl ChartBoundaries {
    /// Numeric extremes of a parameter, if any row gives it a bound
    pub fn get(&self, parameter: Parameter) -> Option<&Boundary> {
        self.bounds.get(&parameter)
    }

    /// Whether the parameter is defined anywhere in the chart
    pub fn is_defined(&self, parameter: Parameter) -> bool {
        self.bounds.contains_key(&parameter)
            || (parameter.is_categorical() && self.textual_national_size)
    }

    /// Defined parameters, in scoring order
    pub fn defined_parameters(&self) -> Vec<Parameter> {
        Parameter::ALL
            .into_iter()
            .filter(|p| self.is_defined(*p))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty() && !self.textual_national_size
    }
}

/// Scan a (size-filtered) chart and collect per-parameter extremes
///
/// Rows that do not define a parameter are skipped for that parameter. An
/// empty chart yields empty boundaries.
pub fn extract_boundaries(chart: &SizeChart) -> ChartBoundaries {
    let mut boundaries = ChartBoundaries::default();

    for (index, row) in chart.rows.iter().enumerate() {
        for parameter in Parameter::ALL {
            let bounds = if parameter.is_categorical() {
                match row.national_size() {
                    Some(band) => match band.numeric_bounds() {
                        Some((lower, upper)) => Some((Some(lower), Some(upper))),
                        None => {
                            boundaries.textual_national_size = true;
                            None
                        }
                    },
                    None => None,
                }
            } else {
                row.range(parameter).map(|range| (range.min, range.max))
            };

            let Some((lower, upper)) = bounds else {
                continue;
            };

            boundaries
                .bounds
                .entry(parameter)
                .or_default()
                .widen(lower, upper, &row.size, index);
        }
    }

    debug!(
        table_id = %chart.table_id,
        rows = chart.len(),
        parameters = ?boundaries.defined_parameters(),
        "Extracted size chart boundaries"
    );

    boundaries
}
