//! The caller-side description of a single API call.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;

use crate::error::{BoxError, Result};

/// Payload a request wants to send.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    /// No payload.
    #[default]
    Empty,
    /// String-keyed mapping, sent as a form submission.
    Form(BTreeMap<String, String>),
    /// Anything else, already rendered to text.
    Text(String),
}

impl RequestBody {
    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        RequestBody::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Uses the value's textual representation as the body.
    pub fn text(value: impl Display) -> Self {
        RequestBody::Text(value.to_string())
    }

    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(RequestBody::Text(serde_json::to_string(value)?))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }
}

/// A single call against the API.
///
/// `Output` is whatever [`parse_response`](Request::parse_response) turns the
/// response body into.
pub trait Request {
    type Output;

    /// Path appended verbatim to the configured API host.
    fn api_endpoint(&self) -> String;

    /// Verb to use. Only GET, POST, PUT and DELETE are dispatched; any other
    /// verb is rejected before a connection is made.
    fn request_method(&self) -> http::Method;

    fn request_body(&self) -> RequestBody {
        RequestBody::Empty
    }

    fn parse_response(&self, response: &str) -> std::result::Result<Self::Output, BoxError>;
}
