//! Per-call hooks for mutating outgoing requests.
//!
//! A [`RequestInterceptor`] lets application policy (signing, token
//! injection, audit headers) shape each request without the client knowing
//! about it. Both hooks run synchronously on the calling thread, in the
//! request path, and only ever see per-call copies.

use std::collections::BTreeMap;

use crate::message::RequestMethod;
use crate::types::RequestHeader;

/// What an interceptor may know about the call it is shaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    url: String,
    method: RequestMethod,
}

impl RequestContext {
    pub fn new(url: impl Into<String>, method: RequestMethod) -> Self {
        Self {
            url: url.into(),
            method,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }
}

/// Hooks applied to every outgoing request.
///
/// Implementations must not block indefinitely and must not keep references
/// to the collections they are handed.
pub trait RequestInterceptor: Send + Sync {
    /// Called with a fresh copy of the default headers for every verb. May
    /// append, remove or replace entries.
    fn modify_headers(&self, _headers: &mut Vec<RequestHeader>, _context: &RequestContext) {}

    /// Called for POST and PUT when the body is a form mapping, before it is
    /// encoded. Never called for DELETE or for raw text bodies.
    fn modify_request_parameters(
        &self,
        _params: &mut BTreeMap<String, String>,
        _context: &RequestContext,
    ) {
    }
}

/// Leaves every request untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInterceptor;

impl RequestInterceptor for NoopInterceptor {}
