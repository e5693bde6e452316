//! HTTP error types

/// Error type for HTTP operations
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl HttpError {
    /// Short label used to group failures in reports
    pub fn kind(&self) -> &'static str {
        match self {
            HttpError::NetworkError(e) if e.is_timeout() => "timeout",
            HttpError::NetworkError(e) if e.is_connect() => "connect",
            HttpError::NetworkError(_) => "network",
            HttpError::InvalidUrl(_) => "url",
            HttpError::ConfigError(_) => "config",
        }
    }
}
