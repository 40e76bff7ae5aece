//! Signal engine: turns the latest indicator readings into discrete
//! bullish/bearish signals and aggregates them into a score.
//!
//! Each rule fires at most one signal. A rule whose indicator is unavailable
//! is skipped.

use crate::domain::indicator::{BollingerBands, IndicatorSeries, MacdResult};
use serde::Serialize;
use std::fmt;

pub const DEFAULT_RSI_OVERBOUGHT: f64 = 70.0;
pub const DEFAULT_RSI_OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignalSource {
    #[serde(rename = "SMA")]
    Sma,
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "MACD")]
    Macd,
    Bollinger,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub source: SignalSource,
    pub message: String,
}

impl Signal {
    fn bullish(source: SignalSource, message: impl Into<String>) -> Self {
        Self {
            kind: SignalKind::Bullish,
            source,
            message: message.into(),
        }
    }

    fn bearish(source: SignalSource, message: impl Into<String>) -> Self {
        Self {
            kind: SignalKind::Bearish,
            source,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    #[serde(rename = "alta")]
    Up,
    #[serde(rename = "baixa")]
    Down,
    #[serde(rename = "neutro")]
    Neutral,
}

impl Trend {
    pub fn from_score(score: i32) -> Self {
        if score > 30 {
            Trend::Up
        } else if score < -30 {
            Trend::Down
        } else {
            Trend::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trend::Up => "alta",
            Trend::Down => "baixa",
            Trend::Neutral => "neutro",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl Recommendation {
    pub fn from_score(score: i32) -> Self {
        if score > 50 {
            Recommendation::StrongBuy
        } else if score > 20 {
            Recommendation::Buy
        } else if score > -20 {
            Recommendation::Neutral
        } else if score > -50 {
            Recommendation::Sell
        } else {
            Recommendation::StrongSell
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "strong buy",
            Recommendation::Buy => "buy",
            Recommendation::Neutral => "neutral",
            Recommendation::Sell => "sell",
            Recommendation::StrongSell => "strong sell",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalThresholds {
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            rsi_overbought: DEFAULT_RSI_OVERBOUGHT,
            rsi_oversold: DEFAULT_RSI_OVERSOLD,
        }
    }
}

/// Indicator outputs the rules read from. `None` means unavailable.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    pub sma_short: Option<IndicatorSeries>,
    pub sma_long: Option<IndicatorSeries>,
    pub ema: Option<IndicatorSeries>,
    pub rsi: Option<IndicatorSeries>,
    pub macd: Option<MacdResult>,
    pub bollinger: Option<BollingerBands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignalSummary {
    pub bullish: usize,
    pub bearish: usize,
    pub score: i32,
    pub trend: Trend,
    pub recommendation: Recommendation,
}

pub fn generate_signals(
    current_price: f64,
    indicators: &IndicatorSet,
    thresholds: &SignalThresholds,
) -> Vec<Signal> {
    [
        trend_signal(
            current_price,
            indicators.sma_short.as_ref(),
            indicators.sma_long.as_ref(),
        ),
        indicators
            .rsi
            .as_ref()
            .and_then(|rsi| rsi_signal(rsi, thresholds)),
        indicators.macd.as_ref().and_then(macd_crossover_signal),
        indicators
            .bollinger
            .as_ref()
            .and_then(|bands| bollinger_signal(current_price, bands)),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn trend_signal(
    current_price: f64,
    sma_short: Option<&IndicatorSeries>,
    sma_long: Option<&IndicatorSeries>,
) -> Option<Signal> {
    let short = sma_short?.last()?;
    let long = sma_long?.last()?;

    if current_price > short && short > long {
        Some(Signal::bullish(
            SignalSource::Sma,
            "price above moving averages (uptrend)",
        ))
    } else if current_price < short && short < long {
        Some(Signal::bearish(
            SignalSource::Sma,
            "price below moving averages (downtrend)",
        ))
    } else {
        None
    }
}

pub fn rsi_signal(rsi: &IndicatorSeries, thresholds: &SignalThresholds) -> Option<Signal> {
    let current = rsi.last()?;

    if current > thresholds.rsi_overbought {
        Some(Signal::bearish(
            SignalSource::Rsi,
            format!("RSI overbought ({current:.1})"),
        ))
    } else if current < thresholds.rsi_oversold {
        Some(Signal::bullish(
            SignalSource::Rsi,
            format!("RSI oversold ({current:.1})"),
        ))
    } else {
        None
    }
}

/// Compares the last two aligned points of the MACD and signal lines.
pub fn macd_crossover_signal(macd: &MacdResult) -> Option<Signal> {
    if macd.signal.len() < 2 {
        return None;
    }
    let current = macd.signal.end() - 1;
    let previous = current - 1;

    let current_macd = macd.macd.at(current)?;
    let previous_macd = macd.macd.at(previous)?;
    let current_signal = macd.signal.at(current)?;
    let previous_signal = macd.signal.at(previous)?;

    if previous_macd < previous_signal && current_macd > current_signal {
        Some(Signal::bullish(
            SignalSource::Macd,
            "MACD crossed above signal line",
        ))
    } else if previous_macd > previous_signal && current_macd < current_signal {
        Some(Signal::bearish(
            SignalSource::Macd,
            "MACD crossed below signal line",
        ))
    } else {
        None
    }
}

pub fn bollinger_signal(current_price: f64, bands: &BollingerBands) -> Option<Signal> {
    let upper = bands.upper.last()?;
    let lower = bands.lower.last()?;

    if current_price > upper {
        Some(Signal::bearish(
            SignalSource::Bollinger,
            "price above upper band (possible reversal)",
        ))
    } else if current_price < lower {
        Some(Signal::bullish(
            SignalSource::Bollinger,
            "price below lower band (possible reversal)",
        ))
    } else {
        None
    }
}

/// Net bullish share of all signals, scaled to [-100, 100].
pub fn summarize(signals: &[Signal]) -> SignalSummary {
    let bullish = signals
        .iter()
        .filter(|s| s.kind == SignalKind::Bullish)
        .count();
    let bearish = signals.len() - bullish;
    let total = bullish + bearish;

    let score = if total == 0 {
        0
    } else {
        ((bullish as f64 - bearish as f64) / total as f64 * 100.0).round() as i32
    };

    SignalSummary {
        bullish,
        bearish,
        score,
        trend: Trend::from_score(score),
        recommendation: Recommendation::from_score(score),
    }
}
