//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]). First value at index n-1.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{require_len, require_period, IndicatorSeries};

pub fn calculate_sma(prices: &[f64], period: usize) -> Result<IndicatorSeries, IndicatorError> {
    require_period(period, "SMA")?;
    require_len(prices, period)?;

    let values = prices
        .windows(period)
        .map(|window| window.iter().sum::<f64>() / period as f64)
        .collect();

    Ok(IndicatorSeries::new(period - 1, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn sma_basic() {
        let series = calculate_sma(&[10.0, 20.0, 30.0, 40.0, 50.0], 3).unwrap();
        assert_eq!(series.offset, 2);
        assert_eq!(series.len(), 3);
        assert_relative_eq!(series.values[0], 20.0);
        assert_relative_eq!(series.values[1], 30.0);
        assert_relative_eq!(series.values[2], 40.0);
    }

    #[test]
    fn sma_exact_length() {
        let series = calculate_sma(&[1.0, 2.0, 3.0], 3).unwrap();
        assert_eq!(series.values, vec![2.0]);
        assert_eq!(series.at(2), Some(2.0));
    }

    #[test]
    fn sma_insufficient_history() {
        let prices = vec![100.0; 10];
        assert_eq!(
            calculate_sma(&prices, 20),
            Err(IndicatorError::InsufficientHistory { have: 10, need: 20 })
        );
    }

    #[test]
    fn sma_empty() {
        assert_eq!(calculate_sma(&[], 5), Err(IndicatorError::Empty));
    }

    #[test]
    fn sma_period_0() {
        assert!(matches!(
            calculate_sma(&[1.0], 0),
            Err(IndicatorError::InvalidParameter { .. })
        ));
    }

    proptest! {
        #[test]
        fn sma_length_and_window_mean(
            prices in prop::collection::vec(0.0f64..1000.0, 1..120),
            period in 1usize..40,
        ) {
            prop_assume!(prices.len() >= period);
            let series = calculate_sma(&prices, period).unwrap();
            prop_assert_eq!(series.len(), prices.len() - period + 1);
            prop_assert_eq!(series.offset, period - 1);
            for (i, value) in series.values.iter().enumerate() {
                let window = &prices[i..i + period];
                let mean = window.iter().sum::<f64>() / period as f64;
                prop_assert!((value - mean).abs() < 1e-9);
            }
        }

        #[test]
        fn sma_period_1_is_identity(prices in prop::collection::vec(0.0f64..1000.0, 1..60)) {
            let series = calculate_sma(&prices, 1).unwrap();
            prop_assert_eq!(series.values, prices);
        }
    }
}
