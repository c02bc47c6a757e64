//! Error taxonomy for the REST client.
//!
//! # Design
//! Callers see exactly three kinds of failure, reported by
//! [`RestError::kind`]:
//!
//! - [`ErrorKind::Connection`]: the server could not be reached, or the
//!   exchange broke down before a response arrived (protocol violation,
//!   closed or reset socket, TLS handshake failure).
//! - [`ErrorKind::ResultParsing`]: the server answered but the body could
//!   not be read or interpreted.
//! - [`ErrorKind::Rest`]: everything else. These are programming or
//!   configuration errors (unsupported verb, bad configuration, client
//!   already closed), not operational ones.
//!
//! Transport failures are reclassified at the boundary of the transport
//! call and the original cause stays reachable through
//! [`std::error::Error::source`].

use thiserror::Error;

use crate::transport::{TransportError, TransportErrorKind};

/// Boxed cause carried by reclassified errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for REST client operations.
pub type Result<T> = std::result::Result<T, RestError>;

/// The coarse category a [`RestError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Connection,
    ResultParsing,
    Rest,
}

/// Errors returned by [`RestClient`](crate::RestClient) operations.
#[derive(Debug, Error)]
pub enum RestError {
    /// Could not reach, or complete a handshake with, the server.
    #[error("connection failed: {message}")]
    Connection {
        message: String,
        #[source]
        source: BoxError,
    },

    /// The server responded but the body could not be interpreted.
    #[error("failed to parse result: {message}")]
    ResultParsing {
        message: String,
        #[source]
        source: BoxError,
    },

    /// The transport refused to build the outgoing request (bad header name,
    /// malformed URI).
    #[error("invalid request: {message}")]
    InvalidRequest {
        message: String,
        #[source]
        source: BoxError,
    },

    /// The request named a verb outside GET, POST, PUT and DELETE.
    #[error("unknown request method: {0}")]
    UnsupportedMethod(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The client was closed before this call.
    #[error("rest client has been closed")]
    Closed,

    /// A request body could not be serialized.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RestError {
    pub(crate) fn connection(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        RestError::Connection {
            message: source.to_string(),
            source,
        }
    }

    pub(crate) fn result_parsing(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        RestError::ResultParsing {
            message: source.to_string(),
            source,
        }
    }

    /// Which of the three taxonomy buckets this error falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RestError::Connection { .. } => ErrorKind::Connection,
            RestError::ResultParsing { .. } => ErrorKind::ResultParsing,
            RestError::InvalidRequest { .. }
            | RestError::UnsupportedMethod(_)
            | RestError::InvalidConfiguration(_)
            | RestError::Closed
            | RestError::Serialization(_) => ErrorKind::Rest,
        }
    }

    pub fn is_connection(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }

    pub fn is_result_parsing(&self) -> bool {
        self.kind() == ErrorKind::ResultParsing
    }
}

impl From<TransportError> for RestError {
    fn from(err: TransportError) -> Self {
        match err.kind() {
            TransportErrorKind::Protocol
            | TransportErrorKind::Socket
            | TransportErrorKind::Handshake => RestError::connection(err),
            TransportErrorKind::Read => RestError::result_parsing(err),
            TransportErrorKind::InvalidRequest => RestError::InvalidRequest {
                message: err.to_string(),
                source: Box::new(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io;

    use super::*;

    fn transport_error(kind: TransportErrorKind) -> TransportError {
        TransportError::new(kind, io::Error::new(io::ErrorKind::Other, "boom"))
    }

    #[test]
    fn protocol_socket_and_handshake_failures_are_connection_errors() {
        for kind in [
            TransportErrorKind::Protocol,
            TransportErrorKind::Socket,
            TransportErrorKind::Handshake,
        ] {
            let err = RestError::from(transport_error(kind));
            assert_eq!(err.kind(), ErrorKind::Connection, "{kind}");
        }
    }

    #[test]
    fn read_failures_are_result_parsing_errors() {
        let err = RestError::from(transport_error(TransportErrorKind::Read));
        assert!(err.is_result_parsing());
    }

    #[test]
    fn invalid_request_is_generic() {
        let err = RestError::from(transport_error(TransportErrorKind::InvalidRequest));
        assert_eq!(err.kind(), ErrorKind::Rest);
    }

    #[test]
    fn original_cause_is_preserved() {
        let err = RestError::from(transport_error(TransportErrorKind::Socket));
        let transport = err
            .source()
            .and_then(|e| e.downcast_ref::<TransportError>())
            .expect("transport error as source");
        assert_eq!(transport.kind(), TransportErrorKind::Socket);
        let io = transport.source().and_then(|e| e.downcast_ref::<io::Error>());
        assert_eq!(io.map(|e| e.to_string()), Some("boom".to_string()));
    }

    #[test]
    fn programming_errors_are_generic() {
        assert_eq!(RestError::Closed.kind(), ErrorKind::Rest);
        assert_eq!(RestError::UnsupportedMethod("PATCH".into()).kind(), ErrorKind::Rest);
        assert_eq!(RestError::InvalidConfiguration("x".into()).kind(), ErrorKind::Rest);
    }
}
