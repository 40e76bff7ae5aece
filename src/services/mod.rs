//! Application services composing ports and the analysis engine.

pub mod analysis_service;
pub mod cache;
pub mod price_chain;
pub mod quote_service;

pub use analysis_service::AnalysisService;
pub use cache::Cache;
pub use price_chain::PriceSourceChain;
pub use quote_service::{QuoteOutcome, QuoteService};
