//! # Body Measurements Module
//!
//! This module defines the measurement parameters a garment size chart can be
//! expressed in and the user's (possibly partial) set of body measurements.
//!
//! ## Core Concepts
//!
//! - **Parameter**: One of twelve fixed measurements. Eleven are integer
//!   centimeters, one is the categorical national size band (e.g. `"42-44"`).
//! - **MeasurementValue**: Either a number or a piece of text, exactly as the
//!   user (or the API) supplied it.
//! - **UserMeasurements**: Typed record of the values the user knows. Unknown
//!   parameters are simply absent.
//!
//! ## Usage
//!
//! ```rust
//! use size_advisor::measurements::{MeasurementValue, Parameter, UserMeasurements};
//!
//! let mut measurements = UserMeasurements::new();
//! measurements.set(Parameter::Chest, MeasurementValue::Number(95.0));
//! measurements.set(Parameter::NationalSize, MeasurementValue::Text("44".to_string()));
//!
//! assert_eq!(measurements.known_parameters().len(), 2);
//! assert_eq!(measurements.get(Parameter::Chest).and_then(|v| v.as_centimeters()), Some(95));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::localization::t_lang;

/// Maximum length of a national size band typed by a user
pub const MAX_NATIONAL_SIZE_LENGTH: usize = 20;

/// A body measurement a size chart may define
///
/// The declaration order is the order parameters are scored and reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    /// National (Russian) size band, e.g. "44" or "42-44"
    #[serde(rename = "russian_size")]
    NationalSize,
    ShoulderLength,
    BackWidth,
    SleeveLength,
    /// Length of the garment measured along the back
    BackLength,
    Chest,
    Waist,
    Hips,
    PantsLength,
    WaistGirth,
    /// Front rise height
    RiseHeight,
    BackRiseHeight,
}

impl Parameter {
    /// Every parameter, in scoring order
    pub const ALL: [Parameter; 12] = [
        Parameter::NationalSize,
        Parameter::ShoulderLength,
        Parameter::BackWidth,
        Parameter::SleeveLength,
        Parameter::BackLength,
        Parameter::Chest,
        Parameter::Waist,
        Parameter::Hips,
        Parameter::PantsLength,
        Parameter::WaistGirth,
        Parameter::RiseHeight,
        Parameter::BackRiseHeight,
    ];

    /// The wire name of this parameter, as used in measurement records and size charts
    pub fn key(self) -> &'static str {
        match self {
            Parameter::NationalSize => "russian_size",
            Parameter::ShoulderLength => "shoulder_length",
            Parameter::BackWidth => "back_width",
            Parameter::SleeveLength => "sleeve_length",
            Parameter::BackLength => "back_length",
            Parameter::Chest => "chest",
            Parameter::Waist => "waist",
            Parameter::Hips => "hips",
            Parameter::PantsLength => "pants_length",
            Parameter::WaistGirth => "waist_girth",
            Parameter::RiseHeight => "rise_height",
            Parameter::BackRiseHeight => "back_rise_height",
        }
    }

    /// Look a parameter up by its wire name
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Whether the parameter is a categorical band rather than centimeters
    pub fn is_categorical(self) -> bool {
        matches!(self, Parameter::NationalSize)
    }

    /// Localized, human-readable parameter name
    pub fn display_name(self, language_code: Option<&str>) -> String {
        t_lang(&format!("param-{}", self.key().replace('_', "-")), language_code)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single measurement value as supplied by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasurementValue {
    Number(f64),
    Text(String),
}

impl MeasurementValue {
    /// Whether the value carries no information (blank text)
    pub fn is_blank(&self) -> bool {
        match self {
            MeasurementValue::Number(_) => false,
            MeasurementValue::Text(text) => text.trim().is_empty(),
        }
    }

    /// Convert to whole centimeters
    ///
    /// Fractional numbers are truncated toward zero. Text must hold an
    /// integer; anything else yields `None`.
    pub fn as_centimeters(&self) -> Option<i64> {
        match self {
            MeasurementValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            MeasurementValue::Number(_) => None,
            MeasurementValue::Text(text) => text.trim().parse::<i64>().ok(),
        }
    }

    /// Render the value as text, for categorical comparison
    pub fn as_text(&self) -> String {
        match self {
            MeasurementValue::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                format!("{}", *n as i64)
            }
            MeasurementValue::Number(n) => n.to_string(),
            MeasurementValue::Text(text) => text.trim().to_string(),
        }
    }
}

impl From<i64> for MeasurementValue {
    fn from(value: i64) -> Self {
        MeasurementValue::Number(value as f64)
    }
}

impl From<i32> for MeasurementValue {
    fn from(value: i32) -> Self {
        MeasurementValue::Number(f64::from(value))
    }
}

impl From<&str> for MeasurementValue {
    fn from(value: &str) -> Self {
        MeasurementValue::Text(value.to_string())
    }
}

/// The user's known body measurements
///
/// Deserializes from a JSON object keyed by parameter wire names. `null`,
/// blank strings and keys that are not parameters (e.g. `height`) are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Option<MeasurementValue>>",
    into = "BTreeMap<String, MeasurementValue>"
)]
pub struct UserMeasurements {
    values: BTreeMap<Parameter, MeasurementValue>,
}

impl UserMeasurements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value; blank values clear the parameter instead
    pub fn set(&mut self, parameter: Parameter, value: MeasurementValue) {
        if value.is_blank() {
            self.values.remove(&parameter);
        } else {
            self.values.insert(parameter, value);
        }
    }

    /// Builder-style variant of [`UserMeasurements::set`]
    pub fn with(mut self, parameter: Parameter, value: impl Into<MeasurementValue>) -> Self {
        self.set(parameter, value.into());
        self
    }

    pub fn get(&self, parameter: Parameter) -> Option<&MeasurementValue> {
        self.values.get(&parameter)
    }

    pub fn clear(&mut self, parameter: Parameter) {
        self.values.remove(&parameter);
    }

    /// Parameters the user supplied, in scoring order
    pub fn known_parameters(&self) -> Vec<Parameter> {
        self.values.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<BTreeMap<String, Option<MeasurementValue>>> for UserMeasurements {
    fn from(raw: BTreeMap<String, Option<MeasurementValue>>) -> Self {
        let mut measurements = UserMeasurements::new();
        for (key, value) in raw {
            match (Parameter::from_key(&key), value) {
                (Some(parameter), Some(value)) => measurements.set(parameter, value),
                (None, _) => debug!(key = %key, "Ignoring unknown measurement key"),
                (Some(_), None) => {}
            }
        }
        measurements
    }
}

impl From<UserMeasurements> for BTreeMap<String, MeasurementValue> {
    fn from(measurements: UserMeasurements) -> Self {
        measurements
            .values
            .into_iter()
            .map(|(parameter, value)| (parameter.key().to_string(), value))
            .collect()
    }
}

/// Validate a measurement typed into the chat
///
/// Returns a short reason code on rejection: `"empty"`, `"not_a_number"`,
/// `"negative"` or `"too_long"`.
pub fn parse_measurement_input(
    parameter: Parameter,
    text: &str,
) -> Result<MeasurementValue, &'static str> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if parameter.is_categorical() {
        if trimmed.chars().count() > MAX_NATIONAL_SIZE_LENGTH {
            return Err("too_long");
        }
        return Ok(MeasurementValue::Text(trimmed.to_string()));
    }

    let value = trimmed.parse::<i64>().map_err(|_| "not_a_number")?;
    if value < 0 {
        return Err("negative");
    }

    Ok(MeasurementValue::from(value))
}

/// Localized explanation of a [`parse_measurement_input`] rejection
pub fn validation_message(reason: &str, language_code: Option<&str>) -> String {
    t_lang(
        &format!("measurement-invalid-{}", reason.replace('_', "-")),
        language_code,
    )
}
