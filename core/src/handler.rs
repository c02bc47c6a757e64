//! Turning a raw transport response into the caller's result type.
//!
//! Handlers are passed per call, independent of the verb. Any error a
//! handler returns is reported as a result-parsing failure.

use crate::error::BoxError;
use crate::message::HttpResponse;
use crate::types::RestResponse;

pub trait ResponseHandler {
    type Output;

    fn handle_response(&self, response: HttpResponse) -> Result<Self::Output, BoxError>;
}

/// Keeps the status code and the body as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestResponseHandler;

impl ResponseHandler for RestResponseHandler {
    type Output = RestResponse;

    fn handle_response(&self, response: HttpResponse) -> Result<RestResponse, BoxError> {
        Ok(RestResponse::new(response.status, response.body))
    }
}

/// Closure adapter, see [`handler_fn`].
#[derive(Debug, Clone, Copy)]
pub struct FnHandler<F>(F);

/// Use a closure as a [`ResponseHandler`].
pub fn handler_fn<F, T>(f: F) -> FnHandler<F>
where
    F: Fn(HttpResponse) -> Result<T, BoxError>,
{
    FnHandler(f)
}

impl<F, T> ResponseHandler for FnHandler<F>
where
    F: Fn(HttpResponse) -> Result<T, BoxError>,
{
    type Output = T;

    fn handle_response(&self, response: HttpResponse) -> Result<T, BoxError> {
        (self.0)(response)
    }
}
