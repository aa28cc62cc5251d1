//! Unified error handling for the protogen control panel
//!
//! Every fallible operation in the client, the config layer and the panel
//! controllers reports a [`PanelError`]. Network and backend failures are
//! meant to be caught by the caller and shown as a non-fatal
//! "unavailable" state; none of them should take the panel down.

use thiserror::Error;

/// Main error type for panel operations
#[derive(Debug, Error)]
pub enum PanelError {
    /// The request could not complete (connection refused, reset, DNS...)
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not finish within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The backend answered with a non-success status
    #[error("Backend returned {status} for {path}")]
    Backend { status: u16, path: String },

    /// The response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration parsing or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A rendered element could not be found by its identifier
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Invalid input/argument errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for Results using PanelError
pub type PanelResult<T> = Result<T, PanelError>;

impl PanelError {
    /// True when the backend reported the resource as missing (HTTP 404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, PanelError::Backend { status: 404, .. })
    }

    /// True for failures worth retrying on the next poll
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PanelError::Network(_) | PanelError::Timeout(_) | PanelError::Backend { .. }
        )
    }
}

impl From<reqwest::Error> for PanelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PanelError::Timeout(err.to_string())
        } else if err.is_decode() {
            PanelError::Decode(err.to_string())
        } else if err.is_builder() {
            PanelError::InvalidInput(err.to_string())
        } else {
            PanelError::Network(err.to_string())
        }
    }
}

impl From<toml::de::Error> for PanelError {
    fn from(err: toml::de::Error) -> Self {
        PanelError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<toml::ser::Error> for PanelError {
    fn from(err: toml::ser::Error) -> Self {
        PanelError::Config(format!("TOML serialization error: {}", err))
    }
}

impl From<std::num::ParseFloatError> for PanelError {
    fn from(err: std::num::ParseFloatError) -> Self {
        PanelError::Decode(format!("Float parse error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = PanelError::Backend {
            status: 404,
            path: "/protogen/apps/active".to_string(),
        };
        assert!(err.is_not_found());
        assert!(err.is_transient());

        let err = PanelError::Backend {
            status: 500,
            path: "/protogen/head/emotion".to_string(),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_decode_is_not_transient() {
        assert!(!PanelError::Decode("bad".into()).is_transient());
        assert!(PanelError::Timeout("slow".into()).is_transient());
    }

    #[test]
    fn test_display_includes_path() {
        let err = PanelError::Backend {
            status: 503,
            path: "/protogen/minecraft/players".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Backend returned 503 for /protogen/minecraft/players"
        );
    }

    #[test]
    fn test_parse_float_maps_to_decode() {
        let err: PanelError = "abc".parse::<f64>().unwrap_err().into();
        assert!(matches!(err, PanelError::Decode(_)));
    }
}
