//! trendscope: technical-analysis indicators and trading signals for price series.
//!
//! Hexagonal architecture: the indicator and signal engine lives in [`domain`],
//! port traits in [`ports`], concrete implementations in [`adapters`], and
//! caching/fallback orchestration in [`services`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
pub mod services;
