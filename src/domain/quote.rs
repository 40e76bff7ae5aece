//! Spot quotes, asset classes and currency conversion.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    StockBr,
    StockUs,
    Crypto,
    Currency,
    RealEstate,
    Fund,
    FixedIncome,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::StockBr => "stock_br",
            AssetType::StockUs => "stock_us",
            AssetType::Crypto => "crypto",
            AssetType::Currency => "currency",
            AssetType::RealEstate => "real_estate",
            AssetType::Fund => "fund",
            AssetType::FixedIncome => "fixed_income",
        }
    }

    /// Asset classes for which a market quote can be looked up at all.
    pub fn is_quotable(&self) -> bool {
        !matches!(self, AssetType::Fund | AssetType::FixedIncome)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stock_br" => Ok(AssetType::StockBr),
            "stock_us" => Ok(AssetType::StockUs),
            "crypto" => Ok(AssetType::Crypto),
            "currency" => Ok(AssetType::Currency),
            "real_estate" => Ok(AssetType::RealEstate),
            "fund" => Ok(AssetType::Fund),
            "fixed_income" => Ok(AssetType::FixedIncome),
            other => Err(format!("unknown asset type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Currency {
    #[serde(rename = "BRL")]
    Brl,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "JPY")]
    Jpy,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Brl => "BRL",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BRL" => Ok(Currency::Brl),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "JPY" => Ok(Currency::Jpy),
            other => Err(format!("unknown currency: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub currency: Currency,
    pub original_price: Option<f64>,
    pub original_currency: Option<Currency>,
    pub last_update: DateTime<Utc>,
    pub source: String,
    pub is_fallback: bool,
}

/// Exchange rates quoted in BRL per unit of each currency, restated
/// against a chosen base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct FxRates {
    base: Currency,
    brl_per_unit: HashMap<Currency, f64>,
}

impl FxRates {
    pub fn new(base: Currency) -> Self {
        Self {
            base,
            brl_per_unit: HashMap::new(),
        }
    }

    /// Register `currency` at `brl_per_unit` BRL per unit. BRL itself is
    /// always 1.
    pub fn with_rate(mut self, currency: Currency, brl_per_unit: f64) -> Self {
        if currency != Currency::Brl {
            self.brl_per_unit.insert(currency, brl_per_unit);
        }
        self
    }

    pub fn base(&self) -> Currency {
        self.base
    }

    fn in_brl(&self, currency: Currency) -> Option<f64> {
        match currency {
            Currency::Brl => Some(1.0),
            other => self.brl_per_unit.get(&other).copied(),
        }
    }

    /// Units of the base currency per unit of `currency`.
    pub fn rate(&self, currency: Currency) -> Option<f64> {
        if currency == self.base {
            return Some(1.0);
        }
        Some(self.in_brl(currency)? / self.in_brl(self.base)?)
    }

    /// Restate a quote in the base currency, keeping the original price.
    /// Quotes already in the base currency, or in a currency without a known
    /// rate, come back unchanged.
    pub fn convert(&self, quote: Quote) -> Quote {
        if quote.currency == self.base {
            return quote;
        }
        let Some(rate) = self.rate(quote.currency) else {
            return quote;
        };
        Quote {
            price: quote.price * rate,
            change: quote.change * rate,
            original_price: Some(quote.price),
            original_currency: Some(quote.currency),
            currency: self.base,
            ..quote
        }
    }
}

impl Default for FxRates {
    fn default() -> Self {
        FxRates::new(Currency::Brl).with_rate(Currency::Usd, 5.52)
    }
}

/// Last-known quotes served when every provider fails: (price, change, change %),
/// already in BRL.
pub fn fallback_quote(symbol: &str, now: DateTime<Utc>) -> Quote {
    let (price, change, change_percent) = match symbol.to_uppercase().as_str() {
        "PETR4" => (38.45, 1.25, 3.36),
        "VALE3" => (62.15, 3.25, 5.52),
        "ITUB4" => (33.25, 1.45, 4.56),
        "BBAS3" => (26.80, 2.30, 9.40),
        "BBDC4" => (13.85, -0.15, -1.07),
        "WEGE3" => (45.75, 3.45, 8.15),
        "AAPL" => (962.50, 82.50, 9.38),
        "MSFT" => (2475.00, 165.00, 7.14),
        "GOOGL" => (907.50, 82.50, 10.00),
        "BTC" => (525000.0, 45000.0, 9.38),
        "ETH" => (20350.0, 1650.0, 8.82),
        "BNB" => (4015.0, 215.0, 5.66),
        "USD" => (5.52, -0.28, -4.83),
        "EUR" => (5.75, -0.45, -7.26),
        "GBP" => (6.82, -0.23, -3.26),
        "HGLG11" => (108.90, 6.40, 6.24),
        "XPML11" => (98.75, 3.55, 3.73),
        "KNRI11" => (92.15, 3.75, 4.24),
        _ => (100.0, 0.0, 0.0),
    };

    Quote {
        symbol: symbol.to_string(),
        price,
        change,
        change_percent,
        currency: Currency::Brl,
        original_price: None,
        original_currency: None,
        last_update: now,
        source: "Fallback Data".to_string(),
        is_fallback: true,
    }
}
