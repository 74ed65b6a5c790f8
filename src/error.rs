use thiserror::Error;

/// Why a symbol's series could not be used. Every variant is recovered by
/// the scanner: the symbol is warned about and skipped.
#[derive(Debug, Error)]
pub enum DataUnavailable {
    #[error("no price data returned")]
    EmptySeries,

    #[error("price data has no close field")]
    MissingClose,

    #[error("{0}")]
    Source(String),

    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid data source URL: {0}")]
    BaseUrl(String),

    #[error("cannot build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot read registry {path}: {source}")]
    Read { path: String, source: csv::Error },

    #[error("registry row {row}: empty symbol")]
    EmptySymbol { row: usize },

    #[error("registry is empty")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("RSI window must be at least 1")]
    ZeroWindow,

    #[error("threshold must be a finite number, got {0}")]
    Threshold(f64),

    #[error("lookback must be at least one month")]
    ZeroLookback,

    #[error("fetch timeout must be at least one second")]
    ZeroTimeout,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
