//! # National Size Band Module
//!
//! Parsing and matching of the categorical national size descriptor. A band is
//! either a single value (`"44"`, `"S"`) or two values joined by a dash
//! (`"42-44"`).

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use tracing::trace;

// Exactly one dash, sides trimmed
lazy_static! {
    static ref RANGE_REGEX: Regex = Regex::new(r"^\s*(?P<lower>[^-]*?)\s*-\s*(?P<upper>[^-]*?)\s*$")
        .expect("National size range pattern should be valid");
}

/// A parsed national size band from a size chart row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NationalSizeBand {
    /// A single size, e.g. "44"
    Single(String),
    /// An inclusive range, e.g. "42-44", with the trimmed cell text
    Range {
        lower: String,
        upper: String,
        raw: String,
    },
    /// Text containing more than one separator, e.g. "40-42-44"
    Malformed(String),
}

impl NationalSizeBand {
    /// Parse the raw cell text of a size chart
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if !trimmed.contains('-') {
            return NationalSizeBand::Single(trimmed.to_string());
        }

        match RANGE_REGEX.captures(trimmed) {
            Some(caps) => NationalSizeBand::Range {
                lower: caps["lower"].to_string(),
                upper: caps["upper"].to_string(),
                raw: trimmed.to_string(),
            },
            None => NationalSizeBand::Malformed(trimmed.to_string()),
        }
    }

    /// Integer bounds of the band, when both sides are integers
    pub fn numeric_bounds(&self) -> Option<(i64, i64)> {
        match self {
            NationalSizeBand::Single(value) => {
                let value = value.parse::<i64>().ok()?;
                Some((value, value))
            }
            NationalSizeBand::Range { lower, upper, .. } => {
                Some((lower.parse::<i64>().ok()?, upper.parse::<i64>().ok()?))
            }
            NationalSizeBand::Malformed(_) => None,
        }
    }

    /// Whether a user's national size falls within this band
    ///
    /// Compares numerically (inclusive) when both the user value and the band
    /// are integers, otherwise falls back to case-insensitive equality with
    /// the band's text as written in the chart.
    pub fn contains(&self, user_value: &str) -> bool {
        let user_value = user_value.trim();

        if let (Ok(value), Some((lower, upper))) =
            (user_value.parse::<i64>(), self.numeric_bounds())
        {
            let hit = lower <= value && value <= upper;
            trace!(band = %self, value, hit, "Numeric national size comparison");
            return hit;
        }

        let hit = user_value.to_lowercase() == self.as_str().to_lowercase();
        trace!(band = %self, user_value, hit, "Textual national size comparison");
        hit
    }
}

impl NationalSizeBand {
    /// The band's trimmed cell text
    pub fn as_str(&self) -> &str {
        match self {
            NationalSizeBand::Single(raw)
            | NationalSizeBand::Malformed(raw)
            | NationalSizeBand::Range { raw, .. } => raw.as_str(),
        }
    }
}

impl fmt::Display for NationalSizeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_and_range() {
        assert_eq!(
            NationalSizeBand::parse(" 44 "),
            NationalSizeBand::Single("44".to_string())
        );
        assert_eq!(
            NationalSizeBand::parse("42 - 44"),
            NationalSizeBand::Range {
                lower: "42".to_string(),
                upper: "44".to_string(),
                raw: "42 - 44".to_string(),
            }
        );
        assert_eq!(
            NationalSizeBand::parse("40-42-44"),
            NationalSizeBand::Malformed("40-42-44".to_string())
        );
    }

    #[test]
    fn test_numeric_bounds() {
        assert_eq!(NationalSizeBand::parse("42-44").numeric_bounds(), Some((42, 44)));
        assert_eq!(NationalSizeBand::parse("46").numeric_bounds(), Some((46, 46)));
        assert_eq!(NationalSizeBand::parse("S-M").numeric_bounds(), None);
        assert_eq!(NationalSizeBand::parse("XL").numeric_bounds(), None);
    }

    #[test]
    fn test_range_contains() {
        let band = NationalSizeBand::parse("42-44");
        assert!(band.contains("42"));
        assert!(band.contains("43"));
        assert!(band.contains(" 44 "));
        assert!(!band.contains("45"));
        assert!(!band.contains("41"));
    }

    #[test]
    fn test_textual_fallback_is_case_insensitive() {
        assert!(NationalSizeBand::parse("XL").contains("xl"));
        assert!(NationalSizeBand::parse("s-m").contains("S-M"));
        assert!(!NationalSizeBand::parse("XL").contains("L"));
        assert!(!NationalSizeBand::parse("40-42-44").contains("42"));
    }

    #[test]
    fn test_spaced_textual_band_keeps_its_text() {
        let band = NationalSizeBand::parse("  S - M ");
        assert_eq!(band.to_string(), "S - M");
        assert!(band.contains("s - m"));
        assert!(band.contains(" S - M"));
        assert!(!band.contains("S-M"));
    }
}
