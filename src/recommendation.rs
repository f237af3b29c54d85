//! # Recommendation Result Module
//!
//! The immutable outcome of a size recommendation. It serializes to the JSON
//! shape the API returns:
//!
//! ```json
//! { "success": true, "recommended_size": "M", "alternative_size": null,
//!   "confidence": "high", "message": "...",
//!   "details": { "score": 2, "max_possible_score": 2,
//!                "matched_parameters": ["chest", "waist"] } }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::measurements::Parameter;

/// How much of the user's comparable data the recommended size satisfies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::None => "none",
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        };
        f.write_str(label)
    }
}

/// Why no size could be recommended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    NoMeasurements,
    NoSizeTable,
    NoAvailableSizes,
    NoCommonParams,
    NoMatch,
}

impl FailureReason {
    /// Localization key of the user-facing message for this reason
    pub fn message_key(self) -> &'static str {
        match self {
            FailureReason::NoMeasurements => "size-no-measurements",
            FailureReason::NoSizeTable => "size-no-size-table",
            FailureReason::NoAvailableSizes => "size-no-available-sizes",
            FailureReason::NoCommonParams => "size-no-common-params",
            FailureReason::NoMatch => "size-no-match",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            FailureReason::NoMeasurements => "no_measurements",
            FailureReason::NoSizeTable => "no_size_table",
            FailureReason::NoAvailableSizes => "no_available_sizes",
            FailureReason::NoCommonParams => "no_common_params",
            FailureReason::NoMatch => "no_match",
        };
        f.write_str(code)
    }
}

/// Diagnostic payload: a reason code on failure, scoring detail on success
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_possible_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_parameters: Option<Vec<Parameter>>,
}

/// Result of a size recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub success: bool,
    pub recommended_size: Option<String>,
    pub alternative_size: Option<String>,
    pub confidence: Confidence,
    pub message: String,
    pub details: RecommendationDetails,
}

impl Recommendation {
    /// A failed recommendation with the given reason and message
    pub fn failure(reason: FailureReason, message: String) -> Self {
        Self {
            success: false,
            recommended_size: None,
            alternative_size: None,
            confidence: Confidence::None,
            message,
            details: RecommendationDetails {
                reason: Some(reason),
                ..Default::default()
            },
        }
    }

    /// Failure reason, if the recommendation failed
    pub fn reason(&self) -> Option<FailureReason> {
        self.details.reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_serialization() {
        let result = Recommendation::failure(FailureReason::NoCommonParams, "msg".to_string());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "recommended_size": null,
                "alternative_size": null,
                "confidence": "none",
                "message": "msg",
                "details": { "reason": "no_common_params" }
            })
        );
    }

    #[test]
    fn test_success_details_serialization() {
        let details = RecommendationDetails {
            reason: None,
            score: Some(2),
            max_possible_score: Some(3),
            matched_parameters: Some(vec![Parameter::NationalSize, Parameter::Chest]),
        };
        assert_eq!(
            serde_json::to_value(&details).unwrap(),
            json!({
                "score": 2,
                "max_possible_score": 3,
                "matched_parameters": ["russian_size", "chest"]
            })
        );
    }

    #[test]
    fn test_reason_display_matches_wire_code() {
        for reason in [
            FailureReason::NoMeasurements,
            FailureReason::NoSizeTable,
            FailureReason::NoAvailableSizes,
            FailureReason::NoCommonParams,
            FailureReason::NoMatch,
        ] {
            assert_eq!(
                serde_json::to_value(reason).unwrap(),
                json!(reason.to_string())
            );
        }
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::High > Confidence::Medium);
        assert!(Confidence::Low > Confidence::None);
        assert_eq!(Confidence::Medium.to_string(), "medium");
    }
}
