//! Closing-price series fed into the indicator engine.

use crate::domain::error::AnalysisError;

/// Ordered closing prices, oldest first. Never empty, every value finite and
/// non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    closes: Vec<f64>,
}

impl PriceSeries {
    pub fn new(closes: Vec<f64>) -> Result<Self, AnalysisError> {
        if closes.is_empty() {
            return Err(AnalysisError::NoData);
        }
        if let Some((index, &value)) = closes
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(AnalysisError::InvalidPrice { index, value });
        }
        Ok(Self { closes })
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// Always false for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Most recent close.
    pub fn last(&self) -> f64 {
        self.closes[self.closes.len() - 1]
    }

    /// Keep only the most recent `n` closes.
    pub fn tail(mut self, n: usize) -> Self {
        if n > 0 && n < self.closes.len() {
            self.closes.drain(..self.closes.len() - n);
        }
        self
    }
}
