//! Backend client error types.

use thiserror::Error;

pub type BackendResult<T> = Result<T, BackendError>;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No PKCE code verifier stored for this sign-in")]
    MissingCodeVerifier,

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl BackendError {
    pub fn api<S: Into<String>>(status: u16, code: Option<String>, message: S) -> Self {
        Self::Api {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn unexpected<S: Into<String>>(msg: S) -> Self {
        Self::UnexpectedResponse(msg.into())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The credentials were rejected, as opposed to the request failing in transit.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::MissingCodeVerifier)
            || matches!(self.status(), Some(400 | 401 | 403))
    }
}

/// Errors raised while reading the startup configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = BackendError::api(406, Some("PGRST116".to_string()), "no rows");
        assert_eq!(err.to_string(), "Backend returned 406: no rows");
        assert_eq!(err.status(), Some(406));
        assert!(!err.is_auth_error());
    }

    #[test]
    fn test_auth_error_classification() {
        assert!(BackendError::api(401, None, "expired").is_auth_error());
        assert!(BackendError::api(400, None, "invalid grant").is_auth_error());
        assert!(BackendError::MissingCodeVerifier.is_auth_error());
        assert!(!BackendError::api(500, None, "boom").is_auth_error());
        assert!(!BackendError::config("bad url").is_auth_error());
    }
}
