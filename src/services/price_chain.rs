//! Ordered price-history fallback.
//!
//! Providers are tried in order. Each one gets up to `retry_attempts` tries,
//! sleeping `backoff * attempt` between tries, but only while its error is
//! retryable. The first success wins.

use crate::domain::error::TrendscopeError;
use crate::domain::price_series::PriceSeries;
use crate::ports::price_port::PriceHistoryPort;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct PriceSourceChain {
    sources: Vec<Box<dyn PriceHistoryPort>>,
    retry_attempts: u32,
    backoff: Duration,
}

impl PriceSourceChain {
    pub fn new(retry_attempts: u32, backoff: Duration) -> Self {
        Self {
            sources: Vec::new(),
            retry_attempts: retry_attempts.max(1),
            backoff,
        }
    }

    pub fn with_source(mut self, source: Box<dyn PriceHistoryPort>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    fn fetch_from(
        &self,
        source: &dyn PriceHistoryPort,
        symbol: &str,
        days: usize,
    ) -> Result<PriceSeries, TrendscopeError> {
        let mut attempt = 1;
        loop {
            match source.fetch_closes(symbol, days) {
                Ok(series) => return Ok(series),
                Err(e) if e.is_retryable() && attempt < self.retry_attempts => {
                    let delay = self.backoff * attempt;
                    warn!(
                        source = source.name(),
                        symbol,
                        attempt,
                        error = %e,
                        "price fetch failed, retrying in {:?}",
                        delay
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl PriceHistoryPort for PriceSourceChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn fetch_closes(&self, symbol: &str, days: usize) -> Result<PriceSeries, TrendscopeError> {
        let mut failures = Vec::new();

        for source in &self.sources {
            debug!(source = source.name(), symbol, days, "fetching price history");
            match self.fetch_from(source.as_ref(), symbol, days) {
                Ok(series) => {
                    info!(source = source.name(), symbol, points = series.len(), "price history loaded");
                    return Ok(series);
                }
                Err(e) => {
                    warn!(source = source.name(), symbol, error = %e, "price source failed");
                    failures.push(format!("{}: {}", source.name(), e));
                }
            }
        }

        Err(TrendscopeError::AllSourcesFailed {
            symbol: symbol.to_string(),
            failures,
        })
    }
}
