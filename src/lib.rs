//! # Size Advisor
//!
//! Size recommendations for the shopping assistant bot: given a user's
//! (partial) body measurements and a garment's size chart, pick the best
//! fitting size, an alternative, and a confidence level.

pub mod boundaries;
pub mod catalog;
pub mod catalog_errors;
pub mod config;
pub mod localization;
pub mod measurements;
pub mod national_size;
pub mod recommendation;
pub mod request;
pub mod size_chart;
pub mod size_matcher;
