//! Error types for apiscout

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Probe-related errors
    #[error("probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Cache read/write errors
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// Configuration errors
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// URL builder errors
    #[error("url error: {0}")]
    Url(#[from] UrlError),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Errors from a single health probe.
///
/// All of these are absorbed by the resolver: a failed probe advances to the
/// next candidate/path and is only surfaced through logging.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("probe timed out after {0}ms")]
    Timeout(u64),

    #[error("network error: {0}")]
    Network(String),

    #[error("server responded with status {0}")]
    ServerStatus(u16),

    #[error("invalid probe URL: {0}")]
    InvalidUrl(String),
}

/// Cache store errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("failed to read cache entry: {0}")]
    Read(String),

    #[error("failed to write cache entry: {0}")]
    Write(String),

    #[error("malformed cache entry: {0}")]
    Malformed(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config file: {0}")]
    InvalidFile(String),

    #[error("invalid platform: {0}")]
    InvalidPlatform(String),

    #[error("invalid probe strategy: {0}")]
    InvalidStrategy(String),

    #[error("config file parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// URL builder errors
#[derive(Error, Debug)]
pub enum UrlError {
    #[error("base URL must not be empty")]
    EmptyBase,
}

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
