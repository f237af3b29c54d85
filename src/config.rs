//! # Configuration Module
//!
//! This module defines configuration structures for size matching and for the
//! size chart catalog, with defaults and environment overrides.

use std::env;
use std::str::FromStr;
use tracing::warn;

use crate::localization::DEFAULT_LANGUAGE;

// Constants for matcher configuration
pub const DEFAULT_MEDIUM_CONFIDENCE_RATIO: f64 = 0.7;
pub const DEFAULT_ALTERNATIVE_SCORE_MARGIN: u32 = 1;

// Constants for catalog configuration
pub const DEFAULT_SIZE_TABLE_TTL_SECS: u64 = 30 * 60; // 30 minutes
pub const DEFAULT_SIZE_TABLE_ID: &str = "outerwear_standard";

/// Configuration for the size matcher
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    /// Lowest score ratio still reported as medium confidence
    pub medium_confidence_ratio: f64,
    /// How far below the recommended score an alternative size may be
    pub alternative_score_margin: u32,
    /// Language of the recommendation message
    pub locale: String,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            medium_confidence_ratio: DEFAULT_MEDIUM_CONFIDENCE_RATIO,
            alternative_score_margin: DEFAULT_ALTERNATIVE_SCORE_MARGIN,
            locale: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl MatcherConfig {
    /// Read overrides from `SIZE_ADVISOR_LOCALE` and `SIZE_ADVISOR_MEDIUM_RATIO`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let medium_confidence_ratio = env_or(
            "SIZE_ADVISOR_MEDIUM_RATIO",
            defaults.medium_confidence_ratio,
        );

        Self {
            medium_confidence_ratio: if (0.0..=1.0).contains(&medium_confidence_ratio) {
                medium_confidence_ratio
            } else {
                warn!(
                    value = medium_confidence_ratio,
                    "SIZE_ADVISOR_MEDIUM_RATIO must be within 0..=1, using default"
                );
                defaults.medium_confidence_ratio
            },
            alternative_score_margin: defaults.alternative_score_margin,
            locale: env::var("SIZE_ADVISOR_LOCALE").unwrap_or(defaults.locale),
        }
    }
}

/// Configuration for size chart lookups
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// How long a fetched size chart stays cached, in seconds
    pub size_table_ttl_secs: u64,
    /// Size table used for products that do not name one
    pub default_size_table_id: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            size_table_ttl_secs: DEFAULT_SIZE_TABLE_TTL_SECS,
            default_size_table_id: DEFAULT_SIZE_TABLE_ID.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Read overrides from `SIZE_TABLE_CACHE_TTL_SECS` and `DEFAULT_SIZE_TABLE_ID`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            size_table_ttl_secs: env_or("SIZE_TABLE_CACHE_TTL_SECS", defaults.size_table_ttl_secs),
            default_size_table_id: env::var("DEFAULT_SIZE_TABLE_ID")
                .unwrap_or(defaults.default_size_table_id),
        }
    }
}

fn env_or<T: FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = %name, value = %raw, "Ignoring unparseable configuration value");
            default
        }),
        Err(_) => default,
    }
}
