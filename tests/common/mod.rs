#![allow(dead_code)]

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use trendscope::domain::error::TrendscopeError;
use trendscope::domain::price_series::PriceSeries;
use trendscope::domain::quote::{AssetType, Currency, Quote};
use trendscope::ports::price_port::PriceHistoryPort;
use trendscope::ports::quote_port::QuotePort;

/// In-memory price history keyed by symbol, with scripted failures.
pub struct MockPriceSource {
    pub name: String,
    pub data: HashMap<String, Vec<f64>>,
    pub errors: HashMap<String, String>,
    pub calls: Arc<AtomicUsize>,
}

impl MockPriceSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_closes(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        self.data.insert(symbol.to_string(), closes);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl PriceHistoryPort for MockPriceSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_closes(&self, symbol: &str, days: usize) -> Result<PriceSeries, TrendscopeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TrendscopeError::Source {
                source_name: self.name.clone(),
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(closes) => Ok(PriceSeries::new(closes.clone())?.tail(days)),
            None => Err(TrendscopeError::NoData {
                symbol: symbol.to_string(),
            }),
        }
    }
}

/// Quote provider answering every supported symbol with one fixed price.
pub struct MockQuoteSource {
    pub price: f64,
    pub currency: Currency,
    pub fail: bool,
    pub calls: Arc<AtomicUsize>,
}

impl MockQuoteSource {
    pub fn new(price: f64, currency: Currency) -> Self {
        Self {
            price,
            currency,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(0.0, Currency::Brl)
        }
    }
}

impl QuotePort for MockQuoteSource {
    fn name(&self) -> &str {
        "mock-quotes"
    }

    fn supports(&self, asset_type: AssetType) -> bool {
        asset_type.is_quotable()
    }

    fn fetch_quote(&self, symbol: &str, _asset_type: AssetType) -> Result<Quote, TrendscopeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TrendscopeError::Source {
                source_name: "mock-quotes".to_string(),
                reason: "rate limited".to_string(),
            });
        }
        Ok(Quote {
            symbol: symbol.to_string(),
            price: self.price,
            change: 0.0,
            change_percent: 0.0,
            currency: self.currency,
            original_price: None,
            original_currency: None,
            last_update: Utc::now(),
            source: "mock-quotes".to_string(),
            is_fallback: false,
        })
    }
}

/// 100, 101, ... for `n` points.
pub fn rising(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}

/// A long flat stretch, a crash, then a steady recovery: price above both
/// moving averages while RSI is still deeply oversold.
pub fn crash_then_recovery() -> Vec<f64> {
    let mut prices = vec![5000.0; 40];
    prices.push(10.0);
    prices.extend((11..=65).map(f64::from));
    prices
}
