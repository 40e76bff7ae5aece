//! One analysis run: indicators, signals and summary for a single symbol.

use crate::domain::error::AnalysisError;
use crate::domain::indicator::{
    bollinger, calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi, calculate_sma,
    macd, rsi, IndicatorType,
};
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::{
    generate_signals, summarize, IndicatorSet, Recommendation, Signal, SignalThresholds, Trend,
};
use serde::Serialize;

pub const DEFAULT_MIN_HISTORY: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParams {
    pub sma_short: usize,
    pub sma_long: usize,
    pub ema_period: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_mult: f64,
    pub thresholds: SignalThresholds,
    pub min_history: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            sma_short: 20,
            sma_long: 50,
            ema_period: 12,
            rsi_period: rsi::DEFAULT_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            bollinger_period: bollinger::DEFAULT_PERIOD,
            bollinger_mult: bollinger::DEFAULT_MULTIPLIER,
            thresholds: SignalThresholds::default(),
            min_history: DEFAULT_MIN_HISTORY,
        }
    }
}

impl AnalysisParams {
    /// Reject parameter sets no indicator can run with. Length shortfalls
    /// are not errors here; they only make an indicator unavailable.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let fail = |reason: String| Err(AnalysisError::InvalidParams { reason });
        let periods = [
            ("sma_short", self.sma_short),
            ("sma_long", self.sma_long),
            ("ema_period", self.ema_period),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_period", self.bollinger_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return fail(format!("{name} must be positive"));
        }
        if self.sma_short >= self.sma_long {
            return fail(format!(
                "sma_short {} must be below sma_long {}",
                self.sma_short, self.sma_long
            ));
        }
        if self.macd_fast >= self.macd_slow {
            return fail(format!(
                "macd_fast {} must be below macd_slow {}",
                self.macd_fast, self.macd_slow
            ));
        }
        if !(self.bollinger_mult.is_finite() && self.bollinger_mult > 0.0) {
            return fail(format!("bollinger_mult {} must be positive", self.bollinger_mult));
        }
        let SignalThresholds {
            rsi_overbought,
            rsi_oversold,
        } = self.thresholds;
        if !(0.0 <= rsi_oversold && rsi_oversold < rsi_overbought && rsi_overbought <= 100.0) {
            return fail(format!(
                "RSI thresholds need 0 <= oversold ({rsi_oversold}) < overbought ({rsi_overbought}) <= 100"
            ));
        }
        Ok(())
    }

    /// Indicators computed for every analysis, in display order.
    pub fn indicator_types(&self) -> Vec<IndicatorType> {
        vec![
            IndicatorType::Sma(self.sma_short),
            IndicatorType::Sma(self.sma_long),
            IndicatorType::Ema(self.ema_period),
            IndicatorType::Rsi(self.rsi_period),
            IndicatorType::Macd {
                fast: self.macd_fast,
                slow: self.macd_slow,
                signal: self.macd_signal,
            },
            IndicatorType::Bollinger {
                period: self.bollinger_period,
                stddev_mult_x100: (self.bollinger_mult * 100.0).round() as u32,
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdSnapshot {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerSnapshot {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Last value of every indicator series; `None` where unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub ema: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<MacdSnapshot>,
    pub bollinger: Option<BollingerSnapshot>,
}

impl IndicatorSnapshot {
    pub fn from_set(set: &IndicatorSet) -> Self {
        Self {
            sma_short: set.sma_short.as_ref().and_then(|s| s.last()),
            sma_long: set.sma_long.as_ref().and_then(|s| s.last()),
            ema: set.ema.as_ref().and_then(|s| s.last()),
            rsi: set.rsi.as_ref().and_then(|s| s.last()),
            macd: set.macd.as_ref().and_then(|m| {
                Some(MacdSnapshot {
                    macd: m.macd.last()?,
                    signal: m.signal.last()?,
                    histogram: m.histogram.last()?,
                })
            }),
            bollinger: set.bollinger.as_ref().and_then(|b| {
                Some(BollingerSnapshot {
                    upper: b.upper.last()?,
                    middle: b.middle.last()?,
                    lower: b.lower.last()?,
                })
            }),
        }
    }

    fn named_values(&self) -> Vec<(&'static str, f64)> {
        let mut values = Vec::new();
        let scalars = [
            ("SMA short", self.sma_short),
            ("SMA long", self.sma_long),
            ("EMA", self.ema),
            ("RSI", self.rsi),
        ];
        values.extend(scalars.into_iter().filter_map(|(n, v)| v.map(|v| (n, v))));
        if let Some(m) = self.macd {
            values.extend([
                ("MACD", m.macd),
                ("MACD signal", m.signal),
                ("MACD histogram", m.histogram),
            ]);
        }
        if let Some(b) = self.bollinger {
            values.extend([
                ("Bollinger upper", b.upper),
                ("Bollinger middle", b.middle),
                ("Bollinger lower", b.lower),
            ]);
        }
        values
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub symbol: String,
    pub current_price: f64,
    pub indicators: IndicatorSnapshot,
    pub signals: Vec<Signal>,
    pub trend: Trend,
    pub score: i32,
    pub recommendation: Recommendation,
}

/// Run every indicator, treating "unavailable" as `None`. `params` must
/// already pass [`AnalysisParams::validate`].
pub fn compute_indicators(prices: &[f64], params: &AnalysisParams) -> IndicatorSet {
    IndicatorSet {
        sma_short: calculate_sma(prices, params.sma_short).ok(),
        sma_long: calculate_sma(prices, params.sma_long).ok(),
        ema: calculate_ema(prices, params.ema_period).ok(),
        rsi: calculate_rsi(prices, params.rsi_period).ok(),
        macd: calculate_macd(
            prices,
            params.macd_fast,
            params.macd_slow,
            params.macd_signal,
        )
        .ok(),
        bollinger: calculate_bollinger(prices, params.bollinger_period, params.bollinger_mult).ok(),
    }
}

pub fn analyze(
    symbol: &str,
    prices: &PriceSeries,
    params: &AnalysisParams,
) -> Result<Analysis, AnalysisError> {
    params.validate()?;
    if prices.len() < params.min_history {
        return Err(AnalysisError::InsufficientHistory {
            have: prices.len(),
            need: params.min_history,
        });
    }

    let current_price = prices.last();
    let set = compute_indicators(prices.closes(), params);
    let indicators = IndicatorSnapshot::from_set(&set);

    if let Some((name, value)) = indicators
        .named_values()
        .into_iter()
        .find(|(_, v)| !v.is_finite())
    {
        return Err(AnalysisError::ComputationDegenerate {
            indicator: name.to_string(),
            reason: format!("non-finite value {value}"),
        });
    }

    let signals = generate_signals(current_price, &set, &params.thresholds);
    let summary = summarize(&signals);

    Ok(Analysis {
        symbol: symbol.to_string(),
        current_price,
        indicators,
        signals,
        trend: summary.trend,
        score: summary.score,
        recommendation: summary.recommendation,
    })
}

/// Convenience entry point for raw closes; distinguishes empty input
/// (`NoData`) from short input (`InsufficientHistory`).
pub fn analyze_prices(
    symbol: &str,
    closes: &[f64],
    params: &AnalysisParams,
) -> Result<Analysis, AnalysisError> {
    let series = PriceSeries::new(closes.to_vec())?;
    analyze(symbol, &series, params)
}
