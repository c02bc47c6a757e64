//! HTTP request and response described as plain data.
//!
//! # Design
//! The client builds an `HttpRequest` value (verb, absolute URL, final
//! header list, optional entity) and hands it to a
//! [`Transport`](crate::transport::Transport). The transport returns an
//! `HttpResponse` with the body already read. Keeping both sides as owned
//! data means the dispatch pipeline can be tested against a recording
//! transport without any network.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use crate::error::RestError;
use crate::types::RequestHeader;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

/// The verbs the client knows how to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMethod {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(RequestMethod::Get),
            "POST" => Ok(RequestMethod::Post),
            "PUT" => Ok(RequestMethod::Put),
            "DELETE" => Ok(RequestMethod::Delete),
            other => Err(RestError::UnsupportedMethod(other.to_string())),
        }
    }
}

impl TryFrom<&http::Method> for RequestMethod {
    type Error = RestError;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

/// Serialized request payload for POST and PUT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub content_type: String,
    pub body: String,
}

impl Entity {
    /// UTF-8 `application/x-www-form-urlencoded` body, one pair per entry.
    pub fn form(params: &BTreeMap<String, String>) -> Self {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter())
            .finish();
        Self {
            content_type: FORM_CONTENT_TYPE.to_string(),
            body,
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self {
            content_type: TEXT_CONTENT_TYPE.to_string(),
            body: body.into(),
        }
    }
}

/// A fully built outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: RequestMethod,
    pub url: String,
    pub headers: Vec<RequestHeader>,
    pub entity: Option<Entity>,
}

impl HttpRequest {
    /// First header with `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name().eq_ignore_ascii_case(name))
            .map(RequestHeader::value)
    }
}

/// A response as returned by a transport, body fully read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
