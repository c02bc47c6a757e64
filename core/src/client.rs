//! Request dispatch.
//!
//! # Design
//! `RestClient` owns one [`Configuration`] and one [`Transport`] for its
//! whole lifetime. A call runs synchronously on the caller's thread:
//!
//! 1. URL = API host + endpoint, concatenated literally.
//! 2. The verb is narrowed to [`RequestMethod`]; anything else fails before
//!    the transport is touched.
//! 3. Default headers are copied and passed through the interceptor.
//! 4. POST and PUT get an entity; DELETE never does, even when the request
//!    carries a body.
//! 5. The transport executes the request and failures are reclassified
//!    into the [`RestError`] taxonomy, keeping the original cause.
//!
//! A call either fully succeeds or fully fails; nothing is retried.
//!
//! The only shared mutable state is the transport slot, which `close`
//! empties. Each call clones the transport handle under a short read lock,
//! so `close` never tears a transport out from under an in-flight call.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use url::Url;

use crate::config::Configuration;
use crate::error::{RestError, Result};
use crate::handler::{ResponseHandler, RestResponseHandler};
use crate::interceptor::RequestContext;
use crate::message::{Entity, HttpRequest, RequestMethod};
use crate::request::{Request, RequestBody};
use crate::transport::{Transport, UreqTransport};
use crate::types::{RequestHeader, RestResponse};

/// Blocking REST client. Safe to share between threads.
pub struct RestClient {
    configuration: Configuration,
    transport: RwLock<Option<Arc<dyn Transport>>>,
}

impl RestClient {
    /// Build the default `ureq` transport and its auth context from
    /// `configuration`.
    pub fn init(configuration: Configuration) -> Result<Self> {
        let transport = UreqTransport::new(&configuration)?;
        Ok(Self::with_transport(configuration, Arc::new(transport)))
    }

    /// Use `transport` instead of building the default one. Basic auth and
    /// proxy settings in `configuration` are then up to the transport.
    pub fn with_transport(configuration: Configuration, transport: Arc<dyn Transport>) -> Self {
        Self {
            configuration,
            transport: RwLock::new(Some(transport)),
        }
    }

    /// The configuration the client was built with.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// `true` once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.transport.read().is_none()
    }

    /// Release the transport. Calling it again is a no-op. Calls already
    /// executing finish on the transport they started with.
    pub fn close(&self) {
        if self.transport.write().take().is_some() {
            debug!("Closed rest client for {}", self.configuration.api_host());
        }
    }

    /// Submit `request` and return the status code and raw body.
    pub fn submit_request<R>(&self, request: &R) -> Result<RestResponse>
    where
        R: Request + ?Sized,
    {
        self.submit_request_with(request, &RestResponseHandler)
    }

    /// Submit `request` and turn the response into `R::Output` with
    /// [`Request::parse_response`].
    pub fn execute<R>(&self, request: &R) -> Result<R::Output>
    where
        R: Request + ?Sized,
    {
        let response = self.submit_request(request)?;
        request
            .parse_response(response.body())
            .map_err(RestError::result_parsing)
    }

    /// Submit `request` and hand the raw response to `handler`.
    pub fn submit_request_with<R, H>(&self, request: &R, handler: &H) -> Result<H::Output>
    where
        R: Request + ?Sized,
        H: ResponseHandler + ?Sized,
    {
        let transport = self.transport()?;
        let url = self.construct_api_url(&request.api_endpoint());
        let method = RequestMethod::try_from(&request.request_method())?;

        match method {
            RequestMethod::Get => self.submit_get(transport.as_ref(), url, &BTreeMap::new(), handler),
            RequestMethod::Post | RequestMethod::Put => {
                self.submit_with_entity(transport.as_ref(), method, url, request.request_body(), handler)
            }
            RequestMethod::Delete => self.submit_delete(transport.as_ref(), url, handler),
        }
    }

    fn transport(&self) -> Result<Arc<dyn Transport>> {
        self.transport.read().clone().ok_or(RestError::Closed)
    }

    fn construct_api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.configuration.api_host(), endpoint)
    }

    pub(crate) fn submit_get<H>(
        &self,
        transport: &dyn Transport,
        url: String,
        params: &BTreeMap<String, String>,
        handler: &H,
    ) -> Result<H::Output>
    where
        H: ResponseHandler + ?Sized,
    {
        let context = RequestContext::new(url.clone(), RequestMethod::Get);
        // Parsed only to validate and append parameters; without parameters
        // the literal URL is sent.
        let mut parsed = Url::parse(&url).map_err(RestError::connection)?;
        let url = if params.is_empty() {
            url
        } else {
            parsed.query_pairs_mut().extend_pairs(params.iter());
            String::from(parsed)
        };

        let request = HttpRequest {
            method: RequestMethod::Get,
            url,
            headers: self.build_headers(&context),
            entity: None,
        };
        debug!("Executing request {} {}", request.method, request.url);
        self.dispatch(transport, request, handler)
    }

    fn submit_with_entity<H>(
        &self,
        transport: &dyn Transport,
        method: RequestMethod,
        url: String,
        body: RequestBody,
        handler: &H,
    ) -> Result<H::Output>
    where
        H: ResponseHandler + ?Sized,
    {
        let context = RequestContext::new(url.clone(), method);
        let headers = self.build_headers(&context);
        let entity = self.build_entity(body, &context);

        let request = HttpRequest {
            method,
            url,
            headers,
            entity,
        };
        debug!(
            "Executing request {} {} with {:?}",
            request.method,
            request.url,
            request.entity.as_ref().map(|e| e.body.as_str())
        );
        self.dispatch(transport, request, handler)
    }

    fn submit_delete<H>(&self, transport: &dyn Transport, url: String, handler: &H) -> Result<H::Output>
    where
        H: ResponseHandler + ?Sized,
    {
        let context = RequestContext::new(url.clone(), RequestMethod::Delete);
        // DELETE requests never carry a body, whatever the request supplied.
        let request = HttpRequest {
            method: RequestMethod::Delete,
            url,
            headers: self.build_headers(&context),
            entity: None,
        };
        debug!("Executing request {} {}", request.method, request.url);
        self.dispatch(transport, request, handler)
    }

    fn dispatch<H>(&self, transport: &dyn Transport, request: HttpRequest, handler: &H) -> Result<H::Output>
    where
        H: ResponseHandler + ?Sized,
    {
        let response = transport.execute(request)?;
        handler
            .handle_response(response)
            .map_err(RestError::result_parsing)
    }

    fn build_headers(&self, context: &RequestContext) -> Vec<RequestHeader> {
        let mut headers = self.configuration.request_headers().to_vec();
        self.configuration
            .request_interceptor()
            .modify_headers(&mut headers, context);
        headers
    }

    fn build_entity(&self, body: RequestBody, context: &RequestContext) -> Option<Entity> {
        match body {
            RequestBody::Empty => None,
            RequestBody::Form(mut params) => {
                self.configuration
                    .request_interceptor()
                    .modify_request_parameters(&mut params, context);
                Some(Entity::form(&params))
            }
            RequestBody::Text(text) => Some(Entity::text(text)),
        }
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("configuration", &self.configuration)
            .field("closed", &self.is_closed())
            .finish()
    }
}
