//! Domain error types.

/// Why a single indicator could not be computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("empty price series")]
    Empty,

    #[error("insufficient history: have {have} points, need {need}")]
    InsufficientHistory { have: usize, need: usize },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}

/// Failure of a full analysis run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("no price data")]
    NoData,

    #[error("insufficient history: have {have} points, need {need}")]
    InsufficientHistory { have: usize, need: usize },

    #[error("invalid price {value} at index {index}")]
    InvalidPrice { index: usize, value: f64 },

    #[error("{indicator} is degenerate: {reason}")]
    ComputationDegenerate { indicator: String, reason: String },

    #[error("invalid analysis parameters: {reason}")]
    InvalidParams { reason: String },
}

/// Top-level error type for trendscope.
#[derive(Debug, thiserror::Error)]
pub enum TrendscopeError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("{source_name} failed: {reason}")]
    Source { source_name: String, reason: String },

    #[error("all sources failed for {symbol}: {}", failures.join("; "))]
    AllSourcesFailed {
        symbol: String,
        failures: Vec<String>,
    },

    #[error("unsupported asset {symbol} ({asset_type})")]
    UnsupportedAsset { symbol: String, asset_type: String },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TrendscopeError {
    /// Whether retrying the same source could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TrendscopeError::Source { .. } | TrendscopeError::Io(_))
    }
}

impl From<&TrendscopeError> for std::process::ExitCode {
    fn from(err: &TrendscopeError) -> Self {
        let code: u8 = match err {
            TrendscopeError::Io(_) => 1,
            TrendscopeError::ConfigParse { .. } | TrendscopeError::ConfigInvalid { .. } => 2,
            TrendscopeError::Source { .. } | TrendscopeError::AllSourcesFailed { .. } => 3,
            TrendscopeError::Analysis(_) => 4,
            TrendscopeError::NoData { .. } | TrendscopeError::UnsupportedAsset { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
