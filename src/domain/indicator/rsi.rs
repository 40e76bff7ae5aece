//! RSI (Relative Strength Index) with Wilder's smoothing.
//!
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100, unless avg_gain is also 0 (flat window): RSI = 50.
//!
//! The first value sits at price index n (n changes are needed).

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{require_len, require_period, IndicatorSeries};

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(prices: &[f64], period: usize) -> Result<IndicatorSeries, IndicatorError> {
    require_period(period, "RSI")?;
    require_len(prices, period + 1)?;

    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let n = period as f64;
    let mut avg_gain = gains[..period].iter().sum::<f64>() / n;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / n;

    let mut values = Vec::with_capacity(gains.len() - period + 1);
    values.push(rsi_from_averages(avg_gain, avg_loss));

    for i in period..gains.len() {
        avg_gain = (avg_gain * (n - 1.0) + gains[i]) / n;
        avg_loss = (avg_loss * (n - 1.0) + losses[i]) / n;
        values.push(rsi_from_averages(avg_gain, avg_loss));
    }

    Ok(IndicatorSeries::new(period, values))
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn rsi_offset_and_length() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + (i % 5) as f64).collect();
        let series = calculate_rsi(&prices, 14).unwrap();
        assert_eq!(series.offset, 14);
        assert_eq!(series.len(), 6);
    }

    #[test]
    fn rsi_insufficient_history() {
        let prices = vec![100.0; 14];
        assert_eq!(
            calculate_rsi(&prices, 14),
            Err(IndicatorError::InsufficientHistory { have: 14, need: 15 })
        );
    }

    #[test]
    fn rsi_all_gains_saturates_at_100() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&prices, 14).unwrap();
        for v in series.values {
            assert_relative_eq!(v, 100.0);
        }
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&prices, 14).unwrap();
        assert_relative_eq!(series.values[0], 0.0);
    }

    #[test]
    fn rsi_flat_series_is_neutral() {
        let series = calculate_rsi(&[10.0; 30], 14).unwrap();
        for v in series.values {
            assert_relative_eq!(v, 50.0);
        }
    }

    #[test]
    fn rsi_wilder_smoothing_carries_forward() {
        // period 2: changes +2, -1, +1
        let series = calculate_rsi(&[10.0, 12.0, 11.0, 12.0], 2).unwrap();
        let (g0, l0) = (1.0, 0.5);
        assert_relative_eq!(series.values[0], 100.0 - 100.0 / (1.0 + g0 / l0));

        let g1 = (g0 * 1.0 + 1.0) / 2.0;
        let l1 = (l0 * 1.0 + 0.0) / 2.0;
        assert_relative_eq!(series.values[1], 100.0 - 100.0 / (1.0 + g1 / l1));
    }

    #[test]
    fn rsi_known_calculation() {
        let prices = [
            44.0, 44.25, 44.50, 43.75, 44.50, 44.25, 44.75, 45.25, 45.50, 45.25, 45.50, 46.0,
            46.25, 46.0, 46.50,
        ];
        let series = calculate_rsi(&prices, 14).unwrap();
        let rsi = series.values[0];
        assert!(rsi > 50.0 && rsi < 100.0, "RSI should be in bullish territory");
    }

    proptest! {
        #[test]
        fn rsi_in_range(prices in prop::collection::vec(1.0f64..1000.0, 15..120)) {
            let series = calculate_rsi(&prices, 14).unwrap();
            prop_assert_eq!(series.end(), prices.len());
            for v in series.values {
                prop_assert!((0.0..=100.0).contains(&v), "RSI {} out of range", v);
            }
        }
    }
}
