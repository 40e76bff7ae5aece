//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first close, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Output is as long as the input; callers wanting a warmed-up EMA skip the
//! leading values themselves.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{require_len, require_period, IndicatorSeries};

pub fn calculate_ema(prices: &[f64], period: usize) -> Result<IndicatorSeries, IndicatorError> {
    require_period(period, "EMA")?;
    require_len(prices, 1)?;

    let k = 2.0 / (period as f64 + 1.0);
    let mut values = Vec::with_capacity(prices.len());
    let mut ema = prices[0];
    values.push(ema);

    for &close in &prices[1..] {
        ema = close * k + ema * (1.0 - k);
        values.push(ema);
    }

    Ok(IndicatorSeries::new(0, values))
}
