//! Spot quote port trait.

use crate::domain::error::TrendscopeError;
use crate::domain::quote::{AssetType, Quote};

pub trait QuotePort: Send + Sync {
    fn name(&self) -> &str;

    fn supports(&self, asset_type: AssetType) -> bool;

    /// Latest quote in the provider's own currency.
    fn fetch_quote(&self, symbol: &str, asset_type: AssetType) -> Result<Quote, TrendscopeError>;
}
