//! Price history port trait.

use crate::domain::error::TrendscopeError;
use crate::domain::price_series::PriceSeries;

/// A source of daily closing prices.
pub trait PriceHistoryPort: Send + Sync {
    /// Short name used in logs and failure reports.
    fn name(&self) -> &str;

    /// Up to `days` most recent closes for `symbol`, oldest first.
    ///
    /// Implementations return a complete series or an error, never a
    /// partially filled one.
    fn fetch_closes(&self, symbol: &str, days: usize) -> Result<PriceSeries, TrendscopeError>;
}
