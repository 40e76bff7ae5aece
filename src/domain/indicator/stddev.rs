//! Population standard deviation, as used by the Bollinger bands.
//!
//! STDDEV = sqrt(sum((C[j] - mean)^2) / n) over an n-wide window.

/// Population standard deviation of a window around a known mean.
pub fn population_stddev(window: &[f64], mean: f64) -> f64 {
    let variance = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / window.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn stddev_constant_window_is_zero() {
        assert_relative_eq!(population_stddev(&[100.0; 5], 100.0), 0.0);
    }

    #[test]
    fn stddev_known_values() {
        let window = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(population_stddev(&window, 5.0), 2.0, epsilon = 1e-10);
    }

    #[test]
    fn stddev_divides_by_n() {
        let mean = 20.0;
        let expected = (((10.0f64 - mean).powi(2) + 0.0 + (30.0f64 - mean).powi(2)) / 3.0).sqrt();
        assert_relative_eq!(
            population_stddev(&[10.0, 20.0, 30.0], mean),
            expected,
            epsilon = 1e-10
        );
    }
}
