//! The HTTP transport the client executes requests on.
//!
//! # Design
//! The client only ever calls [`Transport::execute`] with a fully built
//! [`HttpRequest`]. Implementations report failures as a
//! [`TransportError`] tagged with the stage and nature of the failure;
//! the client turns those into its public taxonomy. [`UreqTransport`] is
//! the default, a blocking `ureq` agent configured once from the
//! [`Configuration`].

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::auth::AuthContext;
use crate::config::Configuration;
use crate::error::{BoxError, RestError, Result};
use crate::message::{HttpRequest, HttpResponse, RequestMethod};

/// Executes fully built requests. Must be safe to share between threads.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

/// Where and how a transport call broke down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// The peer violated HTTP before a response head arrived.
    Protocol,
    /// The socket could not be opened, or was closed or reset.
    Socket,
    /// TLS handshake failed.
    Handshake,
    /// A response arrived but its body could not be read.
    Read,
    /// The request itself could not be built (bad header, bad URI).
    InvalidRequest,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Protocol => "protocol error",
            TransportErrorKind::Socket => "socket error",
            TransportErrorKind::Handshake => "handshake failed",
            TransportErrorKind::Read => "failed to read response",
            TransportErrorKind::InvalidRequest => "invalid request",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("{kind}: {source}")]
pub struct TransportError {
    kind: TransportErrorKind,
    #[source]
    source: BoxError,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, source: impl Into<BoxError>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }
}

/// Blocking transport on a shared `ureq` agent.
///
/// Status codes are returned as data, never as errors, and bodies are read
/// whole regardless of size. The agent carries the proxy route and the
/// preemptive basic-auth header from the [`AuthContext`] built at
/// construction.
pub struct UreqTransport {
    agent: ureq::Agent,
    auth: AuthContext,
}

impl UreqTransport {
    pub fn new(configuration: &Configuration) -> Result<Self> {
        let auth = AuthContext::from_configuration(configuration)?;

        let proxy = auth
            .proxy_uri()
            .map(ureq::Proxy::new)
            .transpose()
            .map_err(|e| RestError::InvalidConfiguration(format!("proxy: {e}")))?;

        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_idle_age(Duration::from_secs(configuration.request_timeout_in_seconds()))
            .proxy(proxy)
            .build()
            .new_agent();

        Ok(Self { agent, auth })
    }

    pub fn auth_context(&self) -> &AuthContext {
        &self.auth
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").field("auth", &self.auth).finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let mut headers: Vec<(&str, &str)> = request
            .headers
            .iter()
            .map(|h| (h.name(), h.value()))
            .collect();
        if request.header("authorization").is_none() {
            if let Some(value) = self.auth.authorization_for(&request.url) {
                headers.push(("Authorization", value));
            }
        }

        let result = match request.method {
            RequestMethod::Get => {
                let mut builder = self.agent.get(request.url.as_str());
                for (name, value) in &headers {
                    builder = builder.header(*name, *value);
                }
                builder.call()
            }
            RequestMethod::Delete => {
                let mut builder = self.agent.delete(request.url.as_str());
                for (name, value) in &headers {
                    builder = builder.header(*name, *value);
                }
                builder.call()
            }
            RequestMethod::Post | RequestMethod::Put => {
                let mut builder = if request.method == RequestMethod::Post {
                    self.agent.post(request.url.as_str())
                } else {
                    self.agent.put(request.url.as_str())
                };
                for (name, value) in &headers {
                    builder = builder.header(*name, *value);
                }
                match &request.entity {
                    Some(entity) => {
                        if request.header("content-type").is_none() {
                            builder = builder.header("Content-Type", entity.content_type.as_str());
                        }
                        builder.send(entity.body.as_bytes())
                    }
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(classify_send_error)?;
        let status = response.status().as_u16();
        let response_headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // Whole entity, no size cap.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_string()
            .map_err(classify_read_error)?;

        debug!("Received {status} for {} {}", request.method, request.url);
        Ok(HttpResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}

/// Failure before a response head arrived: the server was never properly
/// reached.
fn classify_send_error(err: ureq::Error) -> TransportError {
    let kind = match &err {
        ureq::Error::Tls(_) => TransportErrorKind::Handshake,
        ureq::Error::Protocol(_) => TransportErrorKind::Protocol,
        ureq::Error::BadUri(_) | ureq::Error::Http(_) => TransportErrorKind::InvalidRequest,
        _ => TransportErrorKind::Socket,
    };
    TransportError::new(kind, err)
}

/// Failure while reading a body the server already started sending.
fn classify_read_error(err: ureq::Error) -> TransportError {
    let kind = match &err {
        ureq::Error::Io(e) if is_socket_failure(e.kind()) => TransportErrorKind::Socket,
        _ => TransportErrorKind::Read,
    };
    TransportError::new(kind, err)
}

fn is_socket_failure(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
    )
}
