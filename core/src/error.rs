//! Error types for the datasheet request adapter.
//!
//! # Design
//! `ApiError` is the single error callers see. Transport-level failures are
//! translated into it by the adapter; API-level failures are produced by the
//! response normalizer. `TransportError` only exists at the transport seam so
//! the adapter can tell status errors, network errors and everything else
//! apart.

use thiserror::Error;

/// Boxed error carried through unchanged from a transport.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by `RequestAdapter`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport rejected the response because of its status code.
    #[error("HTTP error: {status} - {body}")]
    Http { status: u16, body: String },

    /// Connection, DNS or timeout failure before a response arrived.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered but reported a failure. Raised by normalizers.
    #[error("{0}")]
    Api(String),

    /// The adapter could not be configured.
    #[error("configuration error: {0}")]
    Config(String),

    /// Any other transport failure, passed through as-is.
    #[error("{0}")]
    Transport(#[source] BoxError),
}

/// Failures reported by a `Transport` implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The response status was treated as an error by the transport.
    #[error("status {status}")]
    Status { status: u16, body: String },

    /// The request never produced a response.
    #[error("{0}")]
    Network(String),

    /// Anything else (invalid request, encoding failure, ...).
    #[error("{0}")]
    Other(#[source] BoxError),
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Status { status, body } => ApiError::Http { status, body },
            TransportError::Network(msg) => ApiError::Network(msg),
            TransportError::Other(source) => ApiError::Transport(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_display_carries_status_and_body() {
        let err = ApiError::from(TransportError::Status {
            status: 401,
            body: "unauthorized".to_string(),
        });
        assert_eq!(err.to_string(), "HTTP error: 401 - unauthorized");
    }

    #[test]
    fn network_error_display() {
        let err = ApiError::from(TransportError::Network("connection refused".to_string()));
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn other_transport_errors_pass_through_untouched() {
        let source = std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad header value");
        let err = ApiError::from(TransportError::Other(Box::new(source)));
        assert_eq!(err.to_string(), "bad header value");
        let ApiError::Transport(inner) = err else {
            panic!("expected Transport variant");
        };
        assert!(inner.downcast_ref::<std::io::Error>().is_some());
    }
}
