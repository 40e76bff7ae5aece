//! Core domain types and logic.

pub mod analysis;
pub mod config_validation;
pub mod error;
pub mod format;
pub mod indicator;
pub mod price_series;
pub mod quote;
pub mod signal;
