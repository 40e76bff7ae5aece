//! CSV file price adapter.
//!
//! One file per symbol, `<dir>/<SYMBOL>.csv`, with a header row containing
//! at least `date` (YYYY-MM-DD) and `close` columns. Other columns are ignored.

use crate::domain::error::TrendscopeError;
use crate::domain::price_series::PriceSeries;
use crate::domain::quote::{AssetType, Currency, Quote};
use crate::ports::price_port::PriceHistoryPort;
use crate::ports::quote_port::QuotePort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

const SOURCE_NAME: &str = "csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol.to_uppercase()))
    }

    fn parse_error(&self, reason: String) -> TrendscopeError {
        TrendscopeError::Source {
            source_name: SOURCE_NAME.to_string(),
            reason,
        }
    }

    /// All rows of the symbol's file, sorted by date.
    fn read_rows(&self, symbol: &str) -> Result<Vec<(NaiveDate, f64)>, TrendscopeError> {
        let path = self.csv_path(symbol);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TrendscopeError::NoData {
                    symbol: symbol.to_string(),
                });
            }
            Err(e) => return Err(TrendscopeError::Io(e)),
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| self.parse_error(format!("CSV header error: {e}")))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| self.parse_error(format!("missing {name} column in {}", path.display())))
        };
        let date_col = column("date")?;
        let close_col = column("close")?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| self.parse_error(format!("CSV parse error: {e}")))?;

            let date_str = record
                .get(date_col)
                .ok_or_else(|| self.parse_error("missing date value".into()))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| self.parse_error(format!("invalid date format: {e}")))?;

            let close: f64 = record
                .get(close_col)
                .ok_or_else(|| self.parse_error("missing close value".into()))?
                .trim()
                .parse()
                .map_err(|e| self.parse_error(format!("invalid close value: {e}")))?;

            rows.push((date, close));
        }

        rows.sort_by_key(|(date, _)| *date);
        debug!(symbol, rows = rows.len(), path = %path.display(), "read CSV prices");
        Ok(rows)
    }
}

impl PriceHistoryPort for CsvAdapter {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn fetch_closes(&self, symbol: &str, days: usize) -> Result<PriceSeries, TrendscopeError> {
        let rows = self.read_rows(symbol)?;
        if rows.is_empty() {
            return Err(TrendscopeError::NoData {
                symbol: symbol.to_string(),
            });
        }
        let closes = rows.into_iter().map(|(_, close)| close).collect();
        Ok(PriceSeries::new(closes)?.tail(days))
    }
}

impl QuotePort for CsvAdapter {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn supports(&self, asset_type: AssetType) -> bool {
        asset_type.is_quotable()
    }

    /// Last close, with the change measured against the previous close.
    fn fetch_quote(&self, symbol: &str, asset_type: AssetType) -> Result<Quote, TrendscopeError> {
        let rows = self.read_rows(symbol)?;
        let Some(&(date, price)) = rows.last() else {
            return Err(TrendscopeError::NoData {
                symbol: symbol.to_string(),
            });
        };
        let previous = rows.len().checked_sub(2).map(|i| rows[i].1).unwrap_or(price);
        let change = price - previous;
        let change_percent = if previous != 0.0 {
            change / previous * 100.0
        } else {
            0.0
        };
        let currency = match asset_type {
            AssetType::StockUs => Currency::Usd,
            _ => Currency::Brl,
        };

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            change,
            change_percent,
            currency,
            original_price: None,
            original_currency: None,
            last_update: date.and_time(chrono::NaiveTime::MIN).and_utc(),
            source: "CSV".to_string(),
            is_fallback: false,
        })
    }
}
