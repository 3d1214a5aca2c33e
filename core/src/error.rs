//! Error types for the content API client.
//!
//! # Design
//! Every failure a client call can hit surfaces as one `ApiError`. A
//! non-2xx reply keeps the raw status code and reason phrase so callers can
//! pick an empty/error state; nothing is retried here. A reply whose JSON
//! has an unexpected envelope shape is not an error at all and degrades to
//! an empty result (see `envelope`).

/// Errors returned by `ContentClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a status outside 200-299.
    #[error("HTTP {status} {status_text}")]
    Transport { status: u16, status_text: String },

    /// The response body (or an item inside it) was not the expected JSON.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// Base URL and path do not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A structured query parameter could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Environment configuration could not be interpreted.
    #[error("config error: {message}")]
    Config { message: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// HTTP status code, if the failure came from a non-success reply.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display() {
        let err = ApiError::Transport {
            status: 503,
            status_text: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 Service Unavailable");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn non_transport_errors_have_no_status() {
        assert_eq!(ApiError::Decode("eof".into()).status(), None);
        assert_eq!(ApiError::config("bad timeout").to_string(), "config error: bad timeout");
    }
}
