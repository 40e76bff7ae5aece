//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow), defined once the slow EMA has warmed up
//! (absolute index slow-1 onwards).
//! Signal Line = EMA(signal) of the MACD line, warmed up (first signal-1 values
//! dropped) so that it shares its offset with the histogram.
//! Histogram = MACD Line - Signal Line at the same absolute index.
//!
//! Default parameters: fast=12, slow=26, signal=9.
//! Minimum history: slow + signal, which leaves at least two signal points.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{calculate_ema, require_len, require_period, IndicatorSeries};
use serde::Serialize;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdResult {
    pub macd: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

pub fn calculate_macd(
    prices: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<MacdResult, IndicatorError> {
    require_period(fast, "MACD fast")?;
    require_period(slow, "MACD slow")?;
    require_period(signal_period, "MACD signal")?;
    if fast >= slow {
        return Err(IndicatorError::InvalidParameter {
            reason: format!("MACD fast period {fast} must be below slow period {slow}"),
        });
    }
    require_len(prices, slow + signal_period)?;

    let ema_fast = calculate_ema(prices, fast)?;
    let ema_slow = calculate_ema(prices, slow)?;

    let macd_offset = slow - 1;
    let macd_values: Vec<f64> = ema_fast.values[macd_offset..]
        .iter()
        .zip(&ema_slow.values[macd_offset..])
        .map(|(f, s)| f - s)
        .collect();
    let macd = IndicatorSeries::new(macd_offset, macd_values);

    let signal_ema = calculate_ema(&macd.values, signal_period)?;
    let signal = IndicatorSeries::new(macd.offset, signal_ema.values).skip(signal_period - 1);

    let histogram_values = signal
        .values
        .iter()
        .enumerate()
        .map(|(i, s)| macd.values[i + signal_period - 1] - s)
        .collect();
    let histogram = IndicatorSeries::new(signal.offset, histogram_values);

    Ok(MacdResult {
        macd,
        signal,
        histogram,
    })
}

pub fn calculate_macd_default(prices: &[f64]) -> Result<MacdResult, IndicatorError> {
    calculate_macd(prices, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
