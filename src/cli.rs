//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::mock_price_adapter::MockPriceAdapter;
use crate::domain::analysis::AnalysisParams;
use crate::domain::config_validation::{
    SourceSettings, build_analysis_params, build_quote_settings, build_source_settings,
    validate_config,
};
use crate::domain::error::TrendscopeError;
use crate::domain::format::{format_analysis, render_text};
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::quote::AssetType;
use crate::domain::signal::IndicatorSet;
use crate::services::{AnalysisService, PriceSourceChain, QuoteService};

#[derive(Parser, Debug)]
#[command(name = "trendscope", about = "Technical analysis for stock and crypto closes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command that fetches price history.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SourceArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Directory of <SYMBOL>.csv files; tried before the mock source
    #[arg(long)]
    pub csv_dir: Option<PathBuf>,
    /// Number of most recent closes to analyze
    #[arg(long)]
    pub days: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a symbol and print signals and recommendation
    Analyze {
        #[arg(short, long)]
        symbol: String,
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        json: bool,
    },
    /// Print the latest value of every indicator series
    Indicators {
        #[arg(short, long)]
        symbol: String,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Look up spot quotes in the base currency
    Quote {
        #[arg(short, long, required = true)]
        symbol: Vec<String>,
        #[arg(short, long, default_value = "stock_br")]
        asset_type: AssetType,
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        json: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            symbol,
            source,
            json,
        } => run_analyze(&symbol, &source, json),
        Command::Indicators { symbol, source } => run_indicators(&symbol, &source),
        Command::Quote {
            symbol,
            asset_type,
            source,
            json,
        } => run_quote(&symbol, asset_type, &source, json),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// The named config file, or an empty one so that every key takes its default.
fn load_optional_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    match path {
        Some(path) => load_config(path),
        None => FileConfigAdapter::from_string("").map_err(|reason| {
            let err = TrendscopeError::ConfigParse {
                file: "<default>".to_string(),
                reason,
            };
            eprintln!("error: {err}");
            ExitCode::from(&err)
        }),
    }
}

fn fail(err: TrendscopeError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

/// Command-line flags win over the config file.
pub fn apply_overrides(mut settings: SourceSettings, args: &SourceArgs) -> SourceSettings {
    if let Some(dir) = &args.csv_dir {
        settings.csv_dir = Some(dir.clone());
    }
    if let Some(days) = args.days {
        settings.history_days = days;
    }
    settings
}

/// CSV first when a directory is configured, then the mock generator.
pub fn build_price_chain(settings: &SourceSettings) -> PriceSourceChain {
    let mut chain = PriceSourceChain::new(settings.retry_attempts, settings.retry_backoff);
    if let Some(dir) = &settings.csv_dir {
        chain = chain.with_source(Box::new(CsvAdapter::new(dir.clone())));
    }
    if settings.mock {
        chain = chain.with_source(Box::new(MockPriceAdapter::new()));
    }
    chain
}

pub fn build_analysis_service(
    config: &FileConfigAdapter,
    args: &SourceArgs,
) -> Result<AnalysisService, TrendscopeError> {
    let params = build_analysis_params(config)?;
    let settings = apply_overrides(build_source_settings(config)?, args);
    let chain = build_price_chain(&settings);
    Ok(AnalysisService::new(
        Box::new(chain),
        params,
        settings.history_days,
        settings.analysis_ttl,
    ))
}

pub fn build_quote_service(
    config: &FileConfigAdapter,
    args: &SourceArgs,
) -> Result<QuoteService, TrendscopeError> {
    let quotes = build_quote_settings(config)?;
    let sources = apply_overrides(build_source_settings(config)?, args);

    let mut service = QuoteService::new(quotes.fx, quotes.cache_ttl, quotes.use_fallback);
    if let Some(dir) = &sources.csv_dir {
        service = service.with_provider(Box::new(CsvAdapter::new(dir.clone())));
    }
    if sources.mock {
        service = service.with_provider(Box::new(MockPriceAdapter::new()));
    }
    Ok(service)
}

fn run_analyze(symbol: &str, args: &SourceArgs, json: bool) -> ExitCode {
    let config = match load_optional_config(args.config.as_ref()) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let service = match build_analysis_service(&config, args) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    let analysis = match service.analyze(symbol) {
        Ok(a) => a,
        Err(e) => return fail(e),
    };
    let display = format_analysis(&analysis, &service.params().thresholds);

    if json {
        let body = serde_json::json!({ "analysis": analysis, "display": display });
        match serde_json::to_string_pretty(&body) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: failed to serialize analysis: {e}");
                return ExitCode::from(1);
            }
        }
    } else {
        print!("{}", render_text(&display));
    }
    ExitCode::SUCCESS
}

fn series_line(label: &str, series: Option<&IndicatorSeries>) -> String {
    match series.and_then(|s| s.last().map(|v| (s.offset, s.len(), v))) {
        Some((offset, len, value)) => {
            format!("{label:<18} {value:>14.4}  (offset {offset}, {len} values)")
        }
        None => format!("{label:<18} {:>14}", "n/a"),
    }
}

/// One line per indicator series, labelled with its parameters.
pub fn indicator_lines(set: &IndicatorSet, params: &AnalysisParams) -> Vec<String> {
    let mut lines = Vec::new();
    for kind in params.indicator_types() {
        let label = kind.to_string();
        match kind {
            IndicatorType::Sma(period) if period == params.sma_short => {
                lines.push(series_line(&label, set.sma_short.as_ref()))
            }
            IndicatorType::Sma(_) => lines.push(series_line(&label, set.sma_long.as_ref())),
            IndicatorType::Ema(_) => lines.push(series_line(&label, set.ema.as_ref())),
            IndicatorType::Rsi(_) => lines.push(series_line(&label, set.rsi.as_ref())),
            IndicatorType::Macd { .. } => {
                let macd = set.macd.as_ref();
                lines.push(series_line(&label, macd.map(|m| &m.macd)));
                lines.push(series_line("  signal", macd.map(|m| &m.signal)));
                lines.push(series_line("  histogram", macd.map(|m| &m.histogram)));
            }
            IndicatorType::Bollinger { .. } => {
                let bands = set.bollinger.as_ref();
                lines.push(series_line(&format!("{label} upper"), bands.map(|b| &b.upper)));
                lines.push(series_line("  middle", bands.map(|b| &b.middle)));
                lines.push(series_line("  lower", bands.map(|b| &b.lower)));
            }
        }
    }
    lines
}

fn run_indicators(symbol: &str, args: &SourceArgs) -> ExitCode {
    let config = match load_optional_config(args.config.as_ref()) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let service = match build_analysis_service(&config, args) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let (prices, set) = match service.indicators(symbol) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    println!("{} ({} closes, last {:.2})", symbol, prices.len(), prices.last());
    for line in indicator_lines(&set, service.params()) {
        println!("  {line}");
    }
    ExitCode::SUCCESS
}

fn run_quote(symbols: &[String], asset_type: AssetType, args: &SourceArgs, json: bool) -> ExitCode {
    let config = match load_optional_config(args.config.as_ref()) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let service = match build_quote_service(&config, args) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    let assets: Vec<(String, AssetType)> = symbols.iter().map(|s| (s.clone(), asset_type)).collect();
    let mut exit = ExitCode::SUCCESS;

    for outcome in service.get_multiple(&assets) {
        match outcome.result {
            Ok(quote) if json => match serde_json::to_string(&quote) {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    eprintln!("error: failed to serialize quote: {e}");
                    exit = ExitCode::from(1);
                }
            },
            Ok(quote) => {
                let fallback = if quote.is_fallback { " [fallback]" } else { "" };
                println!(
                    "{:<10} {:>14.2} {}  {:+.2} ({:+.2}%)  {}{}",
                    quote.symbol,
                    quote.price,
                    quote.currency,
                    quote.change,
                    quote.change_percent,
                    quote.source,
                    fallback
                );
            }
            Err(e) => {
                eprintln!("error: {}: {e}", outcome.symbol);
                exit = (&e).into();
            }
        }
    }
    exit
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&config) {
        return fail(e);
    }
    let params = match build_analysis_params(&config) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    eprintln!("\nIndicators:");
    for kind in params.indicator_types() {
        eprintln!("  {kind}");
    }
    eprintln!(
        "RSI thresholds: oversold {} / overbought {}",
        params.thresholds.rsi_oversold, params.thresholds.rsi_overbought
    );
    eprintln!("Minimum history: {} closes", params.min_history);
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
