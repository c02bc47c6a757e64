use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{io::AsyncReadExt, net::TcpListener};

pub const MALFORMED_BODY: &str = "{\"id\": 1, \"name\": ";

/// Everything the server saw of a request, returned as the response body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Lower-cased header names. Repeated names are grouped together, each
    /// group in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: String,
    /// Decoded body when the request was form-encoded.
    pub form: Option<BTreeMap<String, String>>,
}

impl Echo {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn header_values(&self, name: &str) -> Vec<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .filter(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// Ways [`run_fault`] misbehaves on every connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Read the request head, then reset the connection (RST) without
    /// answering.
    ResetConnection,
}

pub fn app() -> Router {
    Router::new()
        .route("/status/{code}", any(status))
        .route("/malformed", any(malformed))
        .route("/bytes/{len}", any(bytes))
        .fallback(echo)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Serve raw TCP connections that fail according to `fault`.
pub async fn run_fault(listener: TcpListener, fault: Fault) -> Result<(), std::io::Error> {
    loop {
        let (mut stream, _) = listener.accept().await?;
        tokio::spawn(async move {
            match fault {
                Fault::ResetConnection => {
                    let _ = read_request_head(&mut stream).await;
                    // Zero linger turns the close into a reset.
                    let _ = stream.set_linger(Some(Duration::ZERO));
                    drop(stream);
                }
            }
        });
    }
}

async fn read_request_head(stream: &mut tokio::net::TcpStream) -> std::io::Result<Vec<u8>> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    Ok(head)
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Echo> {
    let is_form = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
    let form = is_form.then(|| {
        url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect::<BTreeMap<_, _>>()
    });

    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body,
        form,
    })
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}

/// `len` bytes of `a`, for bodies too large to buffer by accident.
async fn bytes(Path(len): Path<usize>) -> String {
    "a".repeat(len)
}

async fn malformed() -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        MALFORMED_BODY,
    )
}
