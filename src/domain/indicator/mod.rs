//! Technical indicator implementations.
//!
//! Every indicator returns an `IndicatorSeries`: the computed values plus the
//! index in the input series at which the first value sits. Combining series
//! of different warmup lengths goes through absolute indices (`at`), never
//! through raw vector positions.
//!
//! - `IndicatorType`: indicator identity + parameters (used for labels)
//! - `IndicatorSeries`: offset-aligned values
//! - `MacdResult`, `BollingerBands`: multi-line indicators

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use bollinger::{calculate_bollinger, BollingerBands};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, calculate_macd_default, MacdResult};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use crate::domain::error::IndicatorError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub offset: usize,
    pub values: Vec<f64>,
}

impl IndicatorSeries {
    pub fn new(offset: usize, values: Vec<f64>) -> Self {
        Self { offset, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// One past the absolute index of the last value.
    pub fn end(&self) -> usize {
        self.offset + self.values.len()
    }

    /// Value at an absolute index of the input series, if defined there.
    pub fn at(&self, index: usize) -> Option<f64> {
        index
            .checked_sub(self.offset)
            .and_then(|i| self.values.get(i).copied())
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Drop the first `n` values, shifting the offset to match.
    pub fn skip(&self, n: usize) -> Self {
        let n = n.min(self.values.len());
        Self {
            offset: self.offset + n,
            values: self.values[n..].to_vec(),
        }
    }
}

pub(crate) fn require_period(period: usize, name: &str) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter {
            reason: format!("{name} period must be positive"),
        });
    }
    Ok(())
}

pub(crate) fn require_len(prices: &[f64], need: usize) -> Result<(), IndicatorError> {
    if prices.is_empty() {
        return Err(IndicatorError::Empty);
    }
    if prices.len() < need {
        return Err(IndicatorError::InsufficientHistory {
            have: prices.len(),
            need,
        });
    }
    Ok(())
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}
