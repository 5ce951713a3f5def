//! Structured error types for marquee
//!
//! Uses thiserror for ergonomic error definitions with automatic Display
//! and Error trait implementations.

use thiserror::Error;

/// All possible errors in marquee
#[derive(Error, Debug)]
pub enum MarqueeError {
    /// Transport failure (connection refused, timeout, TLS, ...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Response body could not be decoded into the expected shape
    #[error("Unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// Configured server base URL is unusable
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Configuration could not be read or written
    #[error("Config error: {0}")]
    Config(String),

    /// File or terminal I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type using MarqueeError
pub type Result<T> = std::result::Result<T, MarqueeError>;

impl MarqueeError {
    /// Whether the error came from talking to the server rather than local state
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Status { .. } | Self::Decode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = MarqueeError::Status {
            status: 503,
            url: "http://localhost/discussions/api/notifications".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 503 from http://localhost/discussions/api/notifications"
        );
        assert!(err.is_remote());
    }

    #[test]
    fn test_config_is_local() {
        let err = MarqueeError::Config("bad toml".to_string());
        assert!(!err.is_remote());
    }
}
