//! # Size Matcher Module
//!
//! Picks the best-fitting size of a garment for a user's body measurements.
//!
//! ## Algorithm
//!
//! 1. The size chart is narrowed to the sizes the product is sold in.
//! 2. Chart-wide extremes are extracted for every parameter
//!    (see [`crate::boundaries`]).
//! 3. Each parameter the user knows and the chart defines is worth one point,
//!    and that point goes to exactly one size (or to none):
//!    - the first size whose range contains the value is credited;
//!    - otherwise a measurement above the chart's largest upper bound credits
//!      the size holding that bound, and one below the smallest lower bound
//!      credits the size holding that one;
//!    - a value that falls into a gap between two sizes credits nobody.
//!    - the national size band credits the first size whose band contains
//!      the user's band.
//! 4. The highest score wins, earlier chart rows win ties. A runner-up close
//!    enough to the winner is offered as an alternative, and the ratio of
//!    score to attainable score gives the confidence.
//!
//! The matcher is a pure function of its inputs and never fails: degenerate
//! input produces an unsuccessful [`Recommendation`] with a reason code.
//!
//! ## Usage
//!
//! ```rust
//! use size_advisor::measurements::{Parameter, UserMeasurements};
//! use size_advisor::recommendation::Confidence;
//! use size_advisor::size_chart::{SizeChart, SizeChartRow};
//! use size_advisor::size_matcher::recommend_size;
//!
//! let user = UserMeasurements::new().with(Parameter::Chest, 95);
//! let chart = SizeChart::new("tops", vec![
//!     SizeChartRow::new("S").with_range(Parameter::Chest, 80, 90),
//!     SizeChartRow::new("M").with_range(Parameter::Chest, 90, 100),
//! ]);
//!
//! let result = recommend_size(&user, &chart, &["S".to_string(), "M".to_string()]);
//! assert_eq!(result.recommended_size.as_deref(), Some("M"));
//! assert_eq!(result.confidence, Confidence::High);
//! ```

use tracing::{debug, info, trace, warn};

use crate::boundaries::{extract_boundaries, ChartBoundaries};
use crate::config::MatcherConfig;
use crate::localization::{t_args_lang, t_lang};
use crate::measurements::{Parameter, UserMeasurements};
use crate::recommendation::{Confidence, FailureReason, Recommendation, RecommendationDetails};
use crate::size_chart::SizeChart;

/// Score accumulated by one size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeScore {
    pub size: String,
    pub score: u32,
    /// Parameters credited to this size, in scoring order
    pub matched_parameters: Vec<Parameter>,
}

/// Per-size scores of one recommendation, one entry per chart row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScoreSheet {
    pub scores: Vec<SizeScore>,
    /// Parameters both known to the user and defined somewhere in the chart
    pub max_possible_score: u32,
}

impl ScoreSheet {
    /// Sizes ordered best first; equal scores keep chart order
    pub fn ranked(&self) -> Vec<&SizeScore> {
        let mut ranked: Vec<&SizeScore> = self.scores.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    fn credit(&mut self, row: usize, parameter: Parameter) {
        if let Some(entry) = self.scores.get_mut(row) {
            entry.score += 1;
            entry.matched_parameters.push(parameter);
        }
    }
}

/// Credit each of the user's parameters to at most one size of the chart
///
/// `chart` should already be narrowed to the available sizes. Numeric values
/// that do not convert to centimeters are skipped and do not count toward
/// `max_possible_score`.
pub fn score_sizes(user: &UserMeasurements, chart: &SizeChart) -> ScoreSheet {
    let boundaries = extract_boundaries(chart);
    let mut sheet = ScoreSheet {
        scores: chart
            .rows
            .iter()
            .map(|row| SizeScore {
                size: row.size.clone(),
                score: 0,
                matched_parameters: Vec::new(),
            })
            .collect(),
        max_possible_score: 0,
    };

    for parameter in Parameter::ALL {
        let Some(value) = user.get(parameter) else {
            continue;
        };

        if !boundaries.is_defined(parameter) {
            trace!(parameter = %parameter, "Parameter not defined by the chart, skipping");
            continue;
        }

        let credited = if parameter.is_categorical() {
            sheet.max_possible_score += 1;
            credit_national_size(chart, &value.as_text())
        } else {
            let Some(centimeters) = value.as_centimeters() else {
                debug!(parameter = %parameter, value = ?value, "Measurement is not a whole number, skipping");
                continue;
            };
            sheet.max_possible_score += 1;
            credit_numeric(chart, &boundaries, parameter, centimeters)
        };

        match credited {
            Some(row) => {
                trace!(parameter = %parameter, size = %chart.rows[row].size, "Parameter credited");
                sheet.credit(row, parameter);
            }
            None => trace!(parameter = %parameter, "No size covers the measurement"),
        }
    }

    sheet
}

fn credit_national_size(chart: &SizeChart, user_value: &str) -> Option<usize> {
    chart
        .rows
        .iter()
        .position(|row| row.national_size().is_some_and(|band| band.contains(user_value)))
}

fn credit_numeric(
    chart: &SizeChart,
    boundaries: &ChartBoundaries,
    parameter: Parameter,
    value: i64,
) -> Option<usize> {
    // Closed ranges never contain a value beyond the chart's extremes, so
    // checking containment first only matters for rows open on one side
    let containing = chart
        .rows
        .iter()
        .position(|row| row.range(parameter).is_some_and(|range| range.contains(value)));
    if containing.is_some() {
        return containing;
    }

    let boundary = boundaries.get(parameter)?;
    if let Some(highest) = boundary.highest.as_ref().filter(|extreme| value > extreme.value) {
        trace!(parameter = %parameter, value, max = highest.value, "Above chart range");
        return Some(highest.row);
    }
    if let Some(lowest) = boundary.lowest.as_ref().filter(|extreme| value < extreme.value) {
        trace!(parameter = %parameter, value, min = lowest.value, "Below chart range");
        return Some(lowest.row);
    }

    None
}

/// Size recommendation engine
#[derive(Debug, Clone, Default)]
pub struct SizeMatcher {
    config: MatcherConfig,
}

impl SizeMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Recommend a size for the user from a garment's size chart
    ///
    /// # Arguments
    ///
    /// * `user` - The user's known measurements
    /// * `size_table` - The garment's full size chart, in catalog order
    /// * `available_sizes` - Sizes the product is actually sold in
    pub fn recommend_size(
        &self,
        user: &UserMeasurements,
        size_table: &SizeChart,
        available_sizes: &[String],
    ) -> Recommendation {
        info!(
            table_id = %size_table.table_id,
            measurements = ?user.known_parameters(),
            available_sizes = ?available_sizes,
            rows = size_table.len(),
            "Starting size recommendation"
        );

        if user.is_empty() {
            warn!("No user measurements provided");
            return self.failure(FailureReason::NoMeasurements);
        }

        if size_table.is_empty() {
            warn!(table_id = %size_table.table_id, "Size table is empty");
            return self.failure(FailureReason::NoSizeTable);
        }

        let filtered = size_table.filter_available(available_sizes);
        if filtered.is_empty() {
            warn!(
                table_id = %size_table.table_id,
                chart_sizes = ?size_table.sizes(),
                "None of the available sizes appear in the size table"
            );
            return self.failure(FailureReason::NoAvailableSizes);
        }

        let sheet = score_sizes(user, &filtered);
        for entry in &sheet.scores {
            debug!(
                size = %entry.size,
                score = entry.score,
                matched = ?entry.matched_parameters,
                "Scored size"
            );
        }

        if sheet.max_possible_score == 0 {
            warn!("No common parameters between the user and the size table");
            return self.failure(FailureReason::NoCommonParams);
        }

        let ranked = sheet.ranked();
        let best = match ranked.first() {
            Some(best) if best.score > 0 => *best,
            _ => {
                warn!("No size got a score greater than 0");
                return self.failure(FailureReason::NoMatch);
            }
        };

        let alternative = self.pick_alternative(&ranked, best);
        let confidence = self.confidence_for(best.score, sheet.max_possible_score);
        let message = self.success_message(&best.size, alternative, confidence);

        info!(
            recommended = %best.size,
            alternative = ?alternative,
            score = best.score,
            max_possible_score = sheet.max_possible_score,
            confidence = %confidence,
            "Size recommendation complete"
        );

        Recommendation {
            success: true,
            recommended_size: Some(best.size.clone()),
            alternative_size: alternative.map(str::to_string),
            confidence,
            message,
            details: RecommendationDetails {
                reason: None,
                score: Some(best.score),
                max_possible_score: Some(sheet.max_possible_score),
                matched_parameters: Some(best.matched_parameters.clone()),
            },
        }
    }

    fn pick_alternative<'a>(&self, ranked: &[&'a SizeScore], best: &SizeScore) -> Option<&'a str> {
        let threshold = best
            .score
            .saturating_sub(self.config.alternative_score_margin)
            .max(1);

        ranked
            .get(1)
            .copied()
            .filter(|runner_up| runner_up.score >= threshold && runner_up.size != best.size)
            .map(|runner_up| runner_up.size.as_str())
    }

    /// Confidence tier for a score out of the attainable maximum
    pub fn confidence_for(&self, score: u32, max_possible_score: u32) -> Confidence {
        if max_possible_score == 0 || score == 0 {
            return Confidence::None;
        }
        if score >= max_possible_score {
            return Confidence::High;
        }

        let ratio = f64::from(score) / f64::from(max_possible_score);
        if ratio >= self.config.medium_confidence_ratio {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    fn success_message(&self, size: &str, alternative: Option<&str>, confidence: Confidence) -> String {
        let key = match (confidence, alternative.is_some()) {
            (Confidence::Low, false) => "size-possible",
            (Confidence::Low, true) => "size-possible-with-alternative",
            (_, false) => "size-recommended",
            (_, true) => "size-recommended-with-alternative",
        };

        let mut args = vec![("size", size)];
        if let Some(alternative) = alternative {
            args.push(("alternative", alternative));
        }

        t_args_lang(key, &args, Some(self.config.locale.as_str()))
    }

    fn failure(&self, reason: FailureReason) -> Recommendation {
        let message = t_lang(reason.message_key(), Some(self.config.locale.as_str()));
        Recommendation::failure(reason, message)
    }
}

/// Recommend a size with the default configuration
pub fn recommend_size(
    user: &UserMeasurements,
    size_table: &SizeChart,
    available_sizes: &[String],
) -> Recommendation {
    SizeMatcher::default().recommend_size(user, size_table, available_sizes)
}
