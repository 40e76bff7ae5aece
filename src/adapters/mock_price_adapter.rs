//! Synthetic price adapter.
//!
//! Generates a random walk of up to +-2.5% per day from a per-symbol base
//! price. The walk is seeded from the symbol, so the same symbol always
//! yields the same series.

use crate::domain::error::TrendscopeError;
use crate::domain::price_series::PriceSeries;
use crate::domain::quote::{AssetType, Currency, Quote};
use crate::ports::price_port::PriceHistoryPort;
use crate::ports::quote_port::QuotePort;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

const SOURCE_NAME: &str = "mock";
const DAILY_STEP: f64 = 0.025;
const MIN_PRICE: f64 = 0.01;

pub fn base_price(symbol: &str) -> f64 {
    match symbol.to_uppercase().as_str() {
        "PETR4" => 38.45,
        "VALE3" => 62.15,
        "ITUB4" => 31.25,
        "BBDC4" => 14.85,
        "ABEV3" => 11.20,
        "BBAS3" => 26.80,
        "WEGE3" => 47.90,
        "MGLU3" => 5.45,
        "BTOW3" => 8.75,
        "LREN3" => 17.20,
        "BTC-USD" => 95000.0,
        "ETH-USD" => 3400.0,
        "ADA-USD" => 0.85,
        "DOT-USD" => 7.20,
        "SOL-USD" => 180.0,
        _ => 50.0,
    }
}

/// FNV-1a over the upper-cased symbol; stable across runs and platforms.
fn symbol_seed(symbol: &str) -> u64 {
    symbol
        .to_uppercase()
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
        })
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Default)]
pub struct MockPriceAdapter;

impl MockPriceAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, symbol: &str, days: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(symbol_seed(symbol));
        let mut price = base_price(symbol);

        (0..days)
            .map(|_| {
                let step: f64 = rng.gen_range(-DAILY_STEP..DAILY_STEP);
                price = (price * (1.0 + step)).max(MIN_PRICE);
                round_cents(price)
            })
            .collect()
    }
}

impl PriceHistoryPort for MockPriceAdapter {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn fetch_closes(&self, symbol: &str, days: usize) -> Result<PriceSeries, TrendscopeError> {
        debug!(symbol, days, "generating mock prices");
        let closes = self.generate(symbol, days);
        if closes.is_empty() {
            return Err(TrendscopeError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(PriceSeries::new(closes)?)
    }
}

impl QuotePort for MockPriceAdapter {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn supports(&self, asset_type: AssetType) -> bool {
        matches!(
            asset_type,
            AssetType::StockBr | AssetType::StockUs | AssetType::Crypto
        )
    }

    fn fetch_quote(&self, symbol: &str, asset_type: AssetType) -> Result<Quote, TrendscopeError> {
        let closes = self.generate(symbol, 2);
        let (previous, price) = (closes[0], closes[1]);
        let change = round_cents(price - previous);
        let currency = if asset_type == AssetType::StockUs || symbol.to_uppercase().ends_with("-USD")
        {
            Currency::Usd
        } else {
            Currency::Brl
        };

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            change,
            change_percent: change / previous * 100.0,
            currency,
            original_price: None,
            original_currency: None,
            last_update: Utc::now(),
            source: "Mock".to_string(),
            is_fallback: false,
        })
    }
}
