//! Configuration validation and settings assembly.
//!
//! Every key is optional and falls back to its default; values that are
//! present must be in range.

use crate::domain::analysis::{AnalysisParams, DEFAULT_MIN_HISTORY};
use crate::domain::error::TrendscopeError;
use crate::domain::indicator::{bollinger, macd, rsi};
use crate::domain::quote::{Currency, FxRates};
use crate::domain::signal::{DEFAULT_RSI_OVERBOUGHT, DEFAULT_RSI_OVERSOLD, SignalThresholds};
use crate::ports::config_port::ConfigPort;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SMA_SHORT: i64 = 20;
pub const DEFAULT_SMA_LONG: i64 = 50;
pub const DEFAULT_EMA_PERIOD: i64 = 12;
pub const DEFAULT_HISTORY_DAYS: i64 = 90;
pub const DEFAULT_ANALYSIS_TTL_SECS: i64 = 300;
pub const DEFAULT_RETRY_ATTEMPTS: i64 = 3;
pub const DEFAULT_RETRY_BACKOFF_MS: i64 = 1000;
pub const DEFAULT_QUOTE_TTL_SECS: i64 = 60;
pub const DEFAULT_USD_RATE: f64 = 5.52;

/// Where and how price history is fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    pub csv_dir: Option<PathBuf>,
    pub mock: bool,
    pub retry_attempts: u32,
    pub retry_backoff: Duration,
    pub history_days: usize,
    pub analysis_ttl: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSettings {
    pub fx: FxRates,
    pub cache_ttl: Duration,
    pub use_fallback: bool,
}

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TrendscopeError> {
    validate_analysis_config(config)?;
    validate_sources_config(config)?;
    validate_quotes_config(config)?;
    Ok(())
}

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), TrendscopeError> {
    let periods = [
        ("sma_short", DEFAULT_SMA_SHORT),
        ("sma_long", DEFAULT_SMA_LONG),
        ("ema_period", DEFAULT_EMA_PERIOD),
        ("rsi_period", rsi::DEFAULT_PERIOD as i64),
        ("macd_fast", macd::DEFAULT_FAST as i64),
        ("macd_slow", macd::DEFAULT_SLOW as i64),
        ("macd_signal", macd::DEFAULT_SIGNAL as i64),
        ("bollinger_period", bollinger::DEFAULT_PERIOD as i64),
        ("min_history", DEFAULT_MIN_HISTORY as i64),
        ("history_days", DEFAULT_HISTORY_DAYS),
    ];
    for (key, default) in periods {
        if config.get_int("analysis", key, default) < 1 {
            return Err(invalid("analysis", key, format!("{key} must be at least 1")));
        }
    }

    let sma_short = config.get_int("analysis", "sma_short", DEFAULT_SMA_SHORT);
    let sma_long = config.get_int("analysis", "sma_long", DEFAULT_SMA_LONG);
    if sma_short >= sma_long {
        return Err(invalid(
            "analysis",
            "sma_short",
            "sma_short must be below sma_long".to_string(),
        ));
    }

    let fast = config.get_int("analysis", "macd_fast", macd::DEFAULT_FAST as i64);
    let slow = config.get_int("analysis", "macd_slow", macd::DEFAULT_SLOW as i64);
    if fast >= slow {
        return Err(invalid(
            "analysis",
            "macd_fast",
            "macd_fast must be below macd_slow".to_string(),
        ));
    }

    let overbought = config.get_double("analysis", "rsi_overbought", DEFAULT_RSI_OVERBOUGHT);
    let oversold = config.get_double("analysis", "rsi_oversold", DEFAULT_RSI_OVERSOLD);
    if !(0.0..=100.0).contains(&overbought) {
        return Err(invalid(
            "analysis",
            "rsi_overbought",
            "rsi_overbought must be between 0 and 100".to_string(),
        ));
    }
    if oversold < 0.0 || oversold >= overbought {
        return Err(invalid(
            "analysis",
            "rsi_oversold",
            "rsi_oversold must be non-negative and below rsi_overbought".to_string(),
        ));
    }

    let mult = config.get_double("analysis", "bollinger_mult", bollinger::DEFAULT_MULTIPLIER);
    if !(mult.is_finite() && mult > 0.0) {
        return Err(invalid(
            "analysis",
            "bollinger_mult",
            "bollinger_mult must be positive".to_string(),
        ));
    }

    if config.get_int("analysis", "cache_ttl_secs", DEFAULT_ANALYSIS_TTL_SECS) < 0 {
        return Err(invalid(
            "analysis",
            "cache_ttl_secs",
            "cache_ttl_secs must be non-negative".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_sources_config(config: &dyn ConfigPort) -> Result<(), TrendscopeError> {
    if config.get_int("sources", "retry_attempts", DEFAULT_RETRY_ATTEMPTS) < 1 {
        return Err(invalid(
            "sources",
            "retry_attempts",
            "retry_attempts must be at least 1".to_string(),
        ));
    }
    if config.get_int("sources", "retry_backoff_ms", DEFAULT_RETRY_BACKOFF_MS) < 0 {
        return Err(invalid(
            "sources",
            "retry_backoff_ms",
            "retry_backoff_ms must be non-negative".to_string(),
        ));
    }
    if let Some(dir) = config.get_string("sources", "csv_dir") {
        if dir.trim().is_empty() {
            return Err(invalid(
                "sources",
                "csv_dir",
                "csv_dir must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

/// `[quotes]` key holding the BRL price of one unit of `currency`.
fn rate_key(currency: Currency) -> String {
    format!("{}_rate", currency.code().to_lowercase())
}

const RATED_CURRENCIES: [Currency; 4] = [Currency::Usd, Currency::Eur, Currency::Gbp, Currency::Jpy];

fn configured_rate(config: &dyn ConfigPort, currency: Currency) -> Option<f64> {
    let key = rate_key(currency);
    match currency {
        Currency::Usd => Some(config.get_double("quotes", &key, DEFAULT_USD_RATE)),
        _ => config
            .get_string("quotes", &key)
            .map(|_| config.get_double("quotes", &key, f64::NAN)),
    }
}

pub fn validate_quotes_config(config: &dyn ConfigPort) -> Result<(), TrendscopeError> {
    let base = match config.get_string("quotes", "base_currency") {
        Some(code) => code
            .parse::<Currency>()
            .map_err(|reason| invalid("quotes", "base_currency", reason))?,
        None => Currency::Brl,
    };
    for currency in RATED_CURRENCIES {
        if let Some(rate) = configured_rate(config, currency) {
            if !(rate.is_finite() && rate > 0.0) {
                let key = rate_key(currency);
                let reason = format!("{key} must be positive");
                return Err(invalid("quotes", &key, reason));
            }
        }
    }
    if base != Currency::Brl && configured_rate(config, base).is_none() {
        return Err(invalid(
            "quotes",
            "base_currency",
            format!("base currency {base} needs {}", rate_key(base)),
        ));
    }
    if config.get_int("quotes", "cache_ttl_secs", DEFAULT_QUOTE_TTL_SECS) < 0 {
        return Err(invalid(
            "quotes",
            "cache_ttl_secs",
            "cache_ttl_secs must be non-negative".to_string(),
        ));
    }
    Ok(())
}

/// Validate `[analysis]` and assemble engine parameters from it.
pub fn build_analysis_params(config: &dyn ConfigPort) -> Result<AnalysisParams, TrendscopeError> {
    validate_analysis_config(config)?;
    let int = |key: &str, default: i64| config.get_int("analysis", key, default) as usize;

    Ok(AnalysisParams {
        sma_short: int("sma_short", DEFAULT_SMA_SHORT),
        sma_long: int("sma_long", DEFAULT_SMA_LONG),
        ema_period: int("ema_period", DEFAULT_EMA_PERIOD),
        rsi_period: int("rsi_period", rsi::DEFAULT_PERIOD as i64),
        macd_fast: int("macd_fast", macd::DEFAULT_FAST as i64),
        macd_slow: int("macd_slow", macd::DEFAULT_SLOW as i64),
        macd_signal: int("macd_signal", macd::DEFAULT_SIGNAL as i64),
        bollinger_period: int("bollinger_period", bollinger::DEFAULT_PERIOD as i64),
        bollinger_mult: config.get_double(
            "analysis",
            "bollinger_mult",
            bollinger::DEFAULT_MULTIPLIER,
        ),
        thresholds: SignalThresholds {
            rsi_overbought: config.get_double("analysis", "rsi_overbought", DEFAULT_RSI_OVERBOUGHT),
            rsi_oversold: config.get_double("analysis", "rsi_oversold", DEFAULT_RSI_OVERSOLD),
        },
        min_history: int("min_history", DEFAULT_MIN_HISTORY as i64),
    })
}

pub fn build_source_settings(config: &dyn ConfigPort) -> Result<SourceSettings, TrendscopeError> {
    validate_analysis_config(config)?;
    validate_sources_config(config)?;

    Ok(SourceSettings {
        csv_dir: config
            .get_string("sources", "csv_dir")
            .map(|d| PathBuf::from(d.trim())),
        mock: config.get_bool("sources", "mock", true),
        retry_attempts: config.get_int("sources", "retry_attempts", DEFAULT_RETRY_ATTEMPTS) as u32,
        retry_backoff: Duration::from_millis(
            config.get_int("sources", "retry_backoff_ms", DEFAULT_RETRY_BACKOFF_MS) as u64,
        ),
        history_days: config.get_int("analysis", "history_days", DEFAULT_HISTORY_DAYS) as usize,
        analysis_ttl: Duration::from_secs(
            config.get_int("analysis", "cache_ttl_secs", DEFAULT_ANALYSIS_TTL_SECS) as u64,
        ),
    })
}

pub fn build_quote_settings(config: &dyn ConfigPort) -> Result<QuoteSettings, TrendscopeError> {
    validate_quotes_config(config)?;

    let base = match config.get_string("quotes", "base_currency") {
        Some(code) => code
            .parse::<Currency>()
            .map_err(|reason| invalid("quotes", "base_currency", reason))?,
        None => Currency::Brl,
    };
    let fx = RATED_CURRENCIES
        .into_iter()
        .filter_map(|currency| configured_rate(config, currency).map(|rate| (currency, rate)))
        .fold(FxRates::new(base), |fx, (currency, rate)| fx.with_rate(currency, rate));

    Ok(QuoteSettings {
        fx,
        cache_ttl: Duration::from_secs(
            config.get_int("quotes", "cache_ttl_secs", DEFAULT_QUOTE_TTL_SECS) as u64,
        ),
        use_fallback: config.get_bool("quotes", "use_fallback", true),
    })
}

fn invalid(section: &str, key: &str, reason: String) -> TrendscopeError {
    TrendscopeError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn invalid_key(err: TrendscopeError) -> String {
        match err {
            TrendscopeError::ConfigInvalid { key, .. } => key,
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = make_config("");
        assert!(validate_config(&config).is_ok());
        assert_eq!(
            build_analysis_params(&config).unwrap(),
            AnalysisParams::default()
        );

        let sources = build_source_settings(&config).unwrap();
        assert_eq!(sources.csv_dir, None);
        assert!(sources.mock);
        assert_eq!(sources.retry_attempts, 3);
        assert_eq!(sources.retry_backoff, Duration::from_millis(1000));
        assert_eq!(sources.history_days, 90);
        assert_eq!(sources.analysis_ttl, Duration::from_secs(300));

        let quotes = build_quote_settings(&config).unwrap();
        assert_eq!(quotes.fx, FxRates::default());
        assert_eq!(quotes.cache_ttl, Duration::from_secs(60));
        assert!(quotes.use_fallback);
    }

    #[test]
    fn full_config_is_read() {
        let config = make_config(
            r#"
[analysis]
sma_short = 10
sma_long = 30
ema_period = 9
rsi_period = 7
rsi_overbought = 80
rsi_oversold = 20
macd_fast = 5
macd_slow = 35
macd_signal = 5
bollinger_period = 15
bollinger_mult = 2.5
min_history = 40
history_days = 120

[sources]
csv_dir = /var/prices
mock = false
retry_attempts = 2
retry_backoff_ms = 0

[quotes]
base_currency = USD
cache_ttl_secs = 0
use_fallback = no
"#,
        );
        let params = build_analysis_params(&config).unwrap();
        assert_eq!(params.sma_short, 10);
        assert_eq!(params.sma_long, 30);
        assert_eq!(params.rsi_period, 7);
        assert_eq!(params.macd_slow, 35);
        assert_eq!(params.bollinger_mult, 2.5);
        assert_eq!(params.thresholds.rsi_overbought, 80.0);
        assert_eq!(params.min_history, 40);

        let sources = build_source_settings(&config).unwrap();
        assert_eq!(sources.csv_dir, Some(PathBuf::from("/var/prices")));
        assert!(!sources.mock);
        assert_eq!(sources.retry_attempts, 2);
        assert_eq!(sources.retry_backoff, Duration::ZERO);
        assert_eq!(sources.history_days, 120);

        let quotes = build_quote_settings(&config).unwrap();
        assert_eq!(quotes.fx.base(), Currency::Usd);
        assert_eq!(quotes.cache_ttl, Duration::ZERO);
        assert!(!quotes.use_fallback);
    }

    #[test]
    fn zero_period_fails() {
        let config = make_config("[analysis]\nrsi_period = 0\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "rsi_period");
    }

    #[test]
    fn sma_short_must_be_below_long() {
        let config = make_config("[analysis]\nsma_short = 50\nsma_long = 50\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "sma_short");
    }

    #[test]
    fn macd_fast_must_be_below_slow() {
        let config = make_config("[analysis]\nmacd_fast = 30\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "macd_fast");
    }

    #[test]
    fn rsi_thresholds_must_be_ordered() {
        let config = make_config("[analysis]\nrsi_oversold = 75\n");
        assert_eq!(
            invalid_key(validate_config(&config).unwrap_err()),
            "rsi_oversold"
        );

        let config = make_config("[analysis]\nrsi_overbought = 120\n");
        assert_eq!(
            invalid_key(validate_config(&config).unwrap_err()),
            "rsi_overbought"
        );
    }

    #[test]
    fn bollinger_mult_must_be_positive() {
        let config = make_config("[analysis]\nbollinger_mult = 0\n");
        assert_eq!(
            invalid_key(validate_config(&config).unwrap_err()),
            "bollinger_mult"
        );
    }

    #[test]
    fn retry_attempts_at_least_one() {
        let config = make_config("[sources]\nretry_attempts = 0\n");
        assert_eq!(
            invalid_key(validate_config(&config).unwrap_err()),
            "retry_attempts"
        );
    }

    #[test]
    fn unknown_base_currency_fails() {
        let config = make_config("[quotes]\nbase_currency = XYZ\n");
        assert_eq!(
            invalid_key(build_quote_settings(&config).unwrap_err()),
            "base_currency"
        );
    }

    #[test]
    fn usd_rate_must_be_positive() {
        let config = make_config("[quotes]\nusd_rate = -1\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "usd_rate");
    }

    #[test]
    fn usd_base_rates_brl_by_inverse() {
        let config = make_config("[quotes]\nbase_currency = USD\nusd_rate = 5.0\n");
        let fx = build_quote_settings(&config).unwrap().fx;
        assert_eq!(fx.base(), Currency::Usd);
        assert_eq!(fx.rate(Currency::Brl), Some(0.2));
    }

    #[test]
    fn eur_base_needs_eur_rate() {
        let config = make_config("[quotes]\nbase_currency = EUR\n");
        assert_eq!(
            invalid_key(validate_config(&config).unwrap_err()),
            "base_currency"
        );

        let config = make_config("[quotes]\nbase_currency = EUR\neur_rate = 6.0\n");
        let fx = build_quote_settings(&config).unwrap().fx;
        assert_eq!(fx.rate(Currency::Eur), Some(1.0));
        assert!(fx.rate(Currency::Brl).is_some());
    }

    #[test]
    fn extra_rates_must_be_positive() {
        let config = make_config("[quotes]\ngbp_rate = 0\n");
        assert_eq!(invalid_key(validate_config(&config).unwrap_err()), "gbp_rate");
    }
}
