//! Fetch, analyze, memoize.

use crate::domain::analysis::{Analysis, AnalysisParams, analyze, compute_indicators};
use crate::domain::error::TrendscopeError;
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::IndicatorSet;
use crate::ports::price_port::PriceHistoryPort;
use crate::services::cache::Cache;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info};

pub struct AnalysisService {
    source: Box<dyn PriceHistoryPort>,
    params: AnalysisParams,
    history_days: usize,
    ttl: Duration,
    cache: Cache<Analysis>,
}

impl AnalysisService {
    pub fn new(
        source: Box<dyn PriceHistoryPort>,
        params: AnalysisParams,
        history_days: usize,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            params,
            history_days,
            ttl,
            cache: Cache::new(ttl),
        }
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Remaining lifetime of the `ttl`-wide time bucket containing `now`;
    /// `None` when memoization is disabled.
    fn bucket_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        let ttl = self.ttl.as_secs() as i64;
        if ttl <= 0 {
            return None;
        }
        let bucket_end = (now.timestamp().div_euclid(ttl) + 1) * ttl;
        let end = DateTime::from_timestamp(bucket_end, 0)?;
        (end - now).to_std().ok()
    }

    pub fn analyze(&self, symbol: &str) -> Result<Analysis, TrendscopeError> {
        self.analyze_at(symbol, Utc::now())
    }

    /// Results are shared within one `ttl`-wide time bucket; a zero TTL
    /// disables memoization. One entry per symbol, expiring at the end of
    /// its bucket.
    pub fn analyze_at(&self, symbol: &str, now: DateTime<Utc>) -> Result<Analysis, TrendscopeError> {
        let key = symbol.to_uppercase();
        let remaining = self.bucket_remaining(now);
        if remaining.is_some() {
            if let Some(hit) = self.cache.get_at(&key, now) {
                debug!(symbol, "analysis cache hit");
                return Ok(hit);
            }
        }

        let prices = self.history(symbol)?;
        let analysis = analyze(symbol, &prices, &self.params)?;
        info!(
            symbol,
            score = analysis.score,
            trend = analysis.trend.label(),
            signals = analysis.signals.len(),
            "analysis complete"
        );

        if let Some(remaining) = remaining {
            self.cache.cleanup_at(now);
            self.cache.insert_with_ttl_at(key, analysis.clone(), remaining, now);
        }
        Ok(analysis)
    }

    /// Raw indicator series for `symbol`, without signal evaluation.
    pub fn indicators(&self, symbol: &str) -> Result<(PriceSeries, IndicatorSet), TrendscopeError> {
        self.params.validate()?;
        let prices = self.history(symbol)?;
        let set = compute_indicators(prices.closes(), &self.params);
        Ok((prices, set))
    }

    fn history(&self, symbol: &str) -> Result<PriceSeries, TrendscopeError> {
        self.source.fetch_closes(symbol, self.history_days)
    }
}
