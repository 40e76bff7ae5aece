//! Display formatting for analyses.
//!
//! Fixed precision: RSI 1 decimal, price-scale values 2 decimals, MACD 4
//! decimals. Signal styling is derived from `kind` alone.

use crate::domain::analysis::Analysis;
use crate::domain::signal::{Signal, SignalKind, SignalSource, SignalThresholds};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryDisplay {
    pub symbol: String,
    pub price: String,
    pub trend: String,
    pub score: i32,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsiDisplay {
    pub value: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdDisplay {
    pub value: String,
    pub signal: String,
    pub histogram: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerDisplay {
    pub upper: String,
    pub middle: String,
    pub lower: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorsDisplay {
    pub rsi: Option<RsiDisplay>,
    pub sma_short: Option<String>,
    pub sma_long: Option<String>,
    pub ema: Option<String>,
    pub macd: Option<MacdDisplay>,
    pub bollinger: Option<BollingerDisplay>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalDisplay {
    pub kind: SignalKind,
    pub indicator: SignalSource,
    pub message: String,
    pub color: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisDisplay {
    pub summary: SummaryDisplay,
    pub indicators: IndicatorsDisplay,
    pub signals: Vec<SignalDisplay>,
}

pub fn price(value: f64) -> String {
    format!("{value:.2}")
}

pub fn format_analysis(analysis: &Analysis, thresholds: &SignalThresholds) -> AnalysisDisplay {
    let ind = &analysis.indicators;

    AnalysisDisplay {
        summary: SummaryDisplay {
            symbol: analysis.symbol.clone(),
            price: price(analysis.current_price),
            trend: analysis.trend.label().to_string(),
            score: analysis.score,
            recommendation: analysis.recommendation.label().to_string(),
        },
        indicators: IndicatorsDisplay {
            rsi: ind.rsi.map(|v| RsiDisplay {
                value: format!("{v:.1}"),
                status: rsi_status(v, thresholds).to_string(),
            }),
            sma_short: ind.sma_short.map(price),
            sma_long: ind.sma_long.map(price),
            ema: ind.ema.map(price),
            macd: ind.macd.map(|m| MacdDisplay {
                value: format!("{:.4}", m.macd),
                signal: format!("{:.4}", m.signal),
                histogram: format!("{:.4}", m.histogram),
            }),
            bollinger: ind.bollinger.map(|b| BollingerDisplay {
                upper: price(b.upper),
                middle: price(b.middle),
                lower: price(b.lower),
            }),
        },
        signals: analysis.signals.iter().map(format_signal).collect(),
    }
}

pub fn rsi_status(value: f64, thresholds: &SignalThresholds) -> &'static str {
    if value > thresholds.rsi_overbought {
        "overbought"
    } else if value < thresholds.rsi_oversold {
        "oversold"
    } else {
        "normal"
    }
}

pub fn format_signal(signal: &Signal) -> SignalDisplay {
    let (color, icon) = match signal.kind {
        SignalKind::Bullish => ("green", "\u{1F4C8}"),
        SignalKind::Bearish => ("red", "\u{1F4C9}"),
    };
    SignalDisplay {
        kind: signal.kind,
        indicator: signal.source,
        message: signal.message.clone(),
        color,
        icon,
    }
}

/// Plain-text rendering used by the CLI.
pub fn render_text(display: &AnalysisDisplay) -> String {
    let s = &display.summary;
    let i = &display.indicators;
    let na = || "n/a".to_string();

    let mut out = format!(
        "{} @ {}\n  trend: {}  score: {}  recommendation: {}\n",
        s.symbol, s.price, s.trend, s.score, s.recommendation
    );
    out.push_str(&format!(
        "  RSI: {}\n",
        i.rsi
            .as_ref()
            .map(|r| format!("{} ({})", r.value, r.status))
            .unwrap_or_else(na)
    ));
    out.push_str(&format!(
        "  SMA short: {}  SMA long: {}  EMA: {}\n",
        i.sma_short.clone().unwrap_or_else(na),
        i.sma_long.clone().unwrap_or_else(na),
        i.ema.clone().unwrap_or_else(na)
    ));
    if let Some(m) = &i.macd {
        out.push_str(&format!(
            "  MACD: {}  signal: {}  histogram: {}\n",
            m.value, m.signal, m.histogram
        ));
    }
    if let Some(b) = &i.bollinger {
        out.push_str(&format!(
            "  Bollinger: {} / {} / {}\n",
            b.upper, b.middle, b.lower
        ));
    }
    for sig in &display.signals {
        out.push_str(&format!("  {} {}\n", sig.icon, sig.message));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{BollingerSnapshot, IndicatorSnapshot, MacdSnapshot};
    use crate::domain::signal::{Recommendation, Trend};

    fn sample() -> Analysis {
        Analysis {
            symbol: "PETR4".into(),
            current_price: 38.4567,
            indicators: IndicatorSnapshot {
                sma_short: Some(37.1234),
                sma_long: None,
                ema: Some(38.0),
                rsi: Some(72.34),
                macd: Some(MacdSnapshot {
                    macd: 0.123456,
                    signal: 0.1,
                    histogram: 0.023456,
                }),
                bollinger: Some(BollingerSnapshot {
                    upper: 40.0,
                    middle: 37.1234,
                    lower: 34.2468,
                }),
            },
            signals: vec![Signal {
                kind: SignalKind::Bearish,
                source: SignalSource::Rsi,
                message: "RSI overbought (72.3)".into(),
            }],
            trend: Trend::Down,
            score: -100,
            recommendation: Recommendation::StrongSell,
        }
    }

    #[test]
    fn formats_fixed_precision() {
        let display = format_analysis(&sample(), &SignalThresholds::default());
        assert_eq!(display.summary.price, "38.46");
        assert_eq!(display.summary.trend, "baixa");
        assert_eq!(display.summary.recommendation, "strong sell");

        let rsi = display.indicators.rsi.unwrap();
        assert_eq!(rsi.value, "72.3");
        assert_eq!(rsi.status, "overbought");

        assert_eq!(display.indicators.sma_short.as_deref(), Some("37.12"));
        assert_eq!(display.indicators.sma_long, None);

        let macd = display.indicators.macd.unwrap();
        assert_eq!(macd.value, "0.1235");
        assert_eq!(macd.histogram, "0.0235");
    }

    #[test]
    fn signal_styling_follows_kind() {
        let display = format_analysis(&sample(), &SignalThresholds::default());
        assert_eq!(display.signals[0].color, "red");
        assert_eq!(display.signals[0].message, "RSI overbought (72.3)");

        let bullish = format_signal(&Signal {
            kind: SignalKind::Bullish,
            source: SignalSource::Sma,
            message: "up".into(),
        });
        assert_eq!(bullish.color, "green");
    }

    #[test]
    fn rsi_status_bands() {
        let t = SignalThresholds::default();
        assert_eq!(rsi_status(25.0, &t), "oversold");
        assert_eq!(rsi_status(50.0, &t), "normal");
        assert_eq!(rsi_status(70.0, &t), "normal");
    }

    #[test]
    fn render_text_includes_summary() {
        let text = render_text(&format_analysis(&sample(), &SignalThresholds::default()));
        assert!(text.starts_with("PETR4 @ 38.46"));
        assert!(text.contains("SMA long: n/a"));
        assert!(text.contains("RSI overbought (72.3)"));
    }
}
