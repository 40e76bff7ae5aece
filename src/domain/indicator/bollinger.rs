//! Bollinger Bands.
//!
//! - Middle: SMA over n periods
//! - Upper: Middle + (multiplier x StdDev)
//! - Lower: Middle - (multiplier x StdDev)
//!
//! StdDev is the population standard deviation (divides by N, not N-1).
//! Default parameters: period=20, multiplier=2.0. All three bands start at n-1.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::stddev::population_stddev;
use crate::domain::indicator::{calculate_sma, IndicatorSeries};
use serde::Serialize;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerBands {
    pub middle: IndicatorSeries,
    pub upper: IndicatorSeries,
    pub lower: IndicatorSeries,
}

pub fn calculate_bollinger(
    prices: &[f64],
    period: usize,
    multiplier: f64,
) -> Result<BollingerBands, IndicatorError> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(IndicatorError::InvalidParameter {
            reason: format!("Bollinger multiplier must be non-negative, got {multiplier}"),
        });
    }
    let middle = calculate_sma(prices, period)?;

    let (upper, lower): (Vec<f64>, Vec<f64>) = prices
        .windows(period)
        .zip(&middle.values)
        .map(|(window, &mean)| {
            let width = multiplier * population_stddev(window, mean);
            (mean + width, mean - width)
        })
        .unzip();

    Ok(BollingerBands {
        upper: IndicatorSeries::new(middle.offset, upper),
        lower: IndicatorSeries::new(middle.offset, lower),
        middle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn bollinger_offsets() {
        let bands = calculate_bollinger(&[10.0, 20.0, 30.0, 40.0, 50.0], 3, 2.0).unwrap();
        assert_eq!(bands.middle.offset, 2);
        assert_eq!(bands.upper.offset, 2);
        assert_eq!(bands.lower.offset, 2);
        assert_eq!(bands.upper.len(), 3);
    }

    #[test]
    fn bollinger_constant_values_collapse() {
        let bands = calculate_bollinger(&[10.0; 30], 20, 2.0).unwrap();
        for i in 0..bands.middle.len() {
            assert_relative_eq!(bands.middle.values[i], 10.0);
            assert_relative_eq!(bands.upper.values[i], 10.0);
            assert_relative_eq!(bands.lower.values[i], 10.0);
        }
    }

    #[test]
    fn bollinger_basic_calculation() {
        let bands = calculate_bollinger(&[10.0, 20.0, 30.0], 3, 2.0).unwrap();
        let mean: f64 = 20.0;
        let stddev = ((100.0 + 0.0 + 100.0) / 3.0f64).sqrt();

        assert_relative_eq!(bands.middle.values[0], mean, epsilon = 1e-10);
        assert_relative_eq!(bands.upper.values[0], mean + 2.0 * stddev, epsilon = 1e-10);
        assert_relative_eq!(bands.lower.values[0], mean - 2.0 * stddev, epsilon = 1e-10);
    }

    #[test]
    fn bollinger_multiplier_variations() {
        let bands = calculate_bollinger(&[10.0, 20.0, 30.0], 3, 1.0).unwrap();
        let stddev = (200.0 / 3.0f64).sqrt();
        assert_relative_eq!(bands.upper.values[0], 20.0 + stddev, epsilon = 1e-10);
    }

    #[test]
    fn bollinger_unavailable_when_sma_is() {
        assert_eq!(
            calculate_bollinger(&[1.0; 10], 20, 2.0),
            Err(IndicatorError::InsufficientHistory { have: 10, need: 20 })
        );
    }

    #[test]
    fn bollinger_rejects_negative_multiplier() {
        assert!(calculate_bollinger(&[1.0; 5], 3, -1.0).is_err());
    }

    proptest! {
        #[test]
        fn bollinger_symmetry(
            prices in prop::collection::vec(1.0f64..500.0, 20..80),
            mult in 0.5f64..3.0,
        ) {
            let bands = calculate_bollinger(&prices, 20, mult).unwrap();
            for i in 0..bands.middle.len() {
                let up = bands.upper.values[i] - bands.middle.values[i];
                let down = bands.middle.values[i] - bands.lower.values[i];
                prop_assert!((up - down).abs() < 1e-9);
                prop_assert!(up >= 0.0);
            }
        }
    }
}
