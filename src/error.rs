use thiserror::Error;

/// Why a single fetch produced no usable update.
///
/// All variants are logged by the widget and otherwise swallowed; the model
/// keeps its last good values.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Transport(String),
    #[error("bad request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unusable data: {0}")]
    InvalidData(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("too many ticker symbols: {found} configured, at most {max} supported")]
    TooManySymbols { max: usize, found: usize },
    #[error("unknown units {0:?} (expected metric or imperial)")]
    UnknownUnits(String),
}
