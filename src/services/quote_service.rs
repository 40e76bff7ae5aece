//! Spot quotes with caching, provider fallback and currency conversion.

use crate::domain::error::TrendscopeError;
use crate::domain::quote::{AssetType, FxRates, Quote, fallback_quote};
use crate::ports::quote_port::QuotePort;
use crate::services::cache::Cache;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, warn};

/// Result of one lookup in a batch.
#[derive(Debug)]
pub struct QuoteOutcome {
    pub symbol: String,
    pub asset_type: AssetType,
    pub result: Result<Quote, TrendscopeError>,
}

pub struct QuoteService {
    providers: Vec<Box<dyn QuotePort>>,
    fx: FxRates,
    cache: Cache<Quote>,
    use_fallback: bool,
}

impl QuoteService {
    pub fn new(fx: FxRates, cache_ttl: Duration, use_fallback: bool) -> Self {
        Self {
            providers: Vec::new(),
            fx,
            cache: Cache::new(cache_ttl),
            use_fallback,
        }
    }

    pub fn with_provider(mut self, provider: Box<dyn QuotePort>) -> Self {
        self.providers.push(provider);
        self
    }

    fn cache_key(symbol: &str, asset_type: AssetType) -> String {
        format!("{}_{}", symbol.to_uppercase(), asset_type)
    }

    pub fn get_quote(&self, symbol: &str, asset_type: AssetType) -> Result<Quote, TrendscopeError> {
        self.get_quote_at(symbol, asset_type, Utc::now())
    }

    /// Cached quote if still fresh, otherwise the first provider that
    /// answers, converted to the base currency. Fallback quotes are served
    /// when enabled, converted like any other quote, but never cached.
    pub fn get_quote_at(
        &self,
        symbol: &str,
        asset_type: AssetType,
        now: DateTime<Utc>,
    ) -> Result<Quote, TrendscopeError> {
        if !asset_type.is_quotable() {
            return Err(TrendscopeError::UnsupportedAsset {
                symbol: symbol.to_string(),
                asset_type: asset_type.to_string(),
            });
        }

        let key = Self::cache_key(symbol, asset_type);
        if let Some(hit) = self.cache.get_at(&key, now) {
            debug!(symbol, %asset_type, "quote cache hit");
            return Ok(hit);
        }

        let mut failures = Vec::new();
        for provider in self.providers.iter().filter(|p| p.supports(asset_type)) {
            match provider.fetch_quote(symbol, asset_type) {
                Ok(quote) => {
                    let quote = self.fx.convert(quote);
                    self.cache.insert_at(key, quote.clone(), now);
                    return Ok(quote);
                }
                Err(e) => {
                    warn!(provider = provider.name(), symbol, error = %e, "quote provider failed");
                    failures.push(format!("{}: {}", provider.name(), e));
                }
            }
        }

        if self.use_fallback {
            warn!(symbol, %asset_type, "serving fallback quote");
            return Ok(self.fx.convert(fallback_quote(symbol, now)));
        }
        Err(TrendscopeError::AllSourcesFailed {
            symbol: symbol.to_string(),
            failures,
        })
    }

    pub fn get_multiple(&self, assets: &[(String, AssetType)]) -> Vec<QuoteOutcome> {
        let now = Utc::now();
        assets
            .iter()
            .map(|(symbol, asset_type)| QuoteOutcome {
                symbol: symbol.clone(),
                asset_type: *asset_type,
                result: self.get_quote_at(symbol, *asset_type, now),
            })
            .collect()
    }
}
