//! Blocking REST client core.
//!
//! # Overview
//! [`RestClient`] turns a caller-defined [`Request`] into an executed HTTP
//! call and a classified result. It applies the [`Configuration`]'s default
//! headers and credentials, lets a [`RequestInterceptor`] adjust headers and
//! form parameters per call, executes on a [`Transport`] and reports failures
//! as one of three [`ErrorKind`]s.
//!
//! # Design
//! - Configuration, auth context and transport are fixed at `init` and
//!   released together at `close`.
//! - Verbs are a closed [`RequestMethod`] enum matched at a single dispatch
//!   site; GET and DELETE never carry a body, POST and PUT send either a
//!   UTF-8 form encoding or raw text.
//! - Requests and responses cross the transport boundary as plain data
//!   ([`HttpRequest`], [`HttpResponse`]), so the pipeline is testable with a
//!   recording transport.
//! - The default transport is a blocking `ureq` agent.
//!
//! ```no_run
//! use rest_core::{BoxError, Configuration, Method, Request, RequestBody, RestClient};
//!
//! struct CreateItem {
//!     name: String,
//! }
//!
//! impl Request for CreateItem {
//!     type Output = String;
//!
//!     fn api_endpoint(&self) -> String {
//!         "/v1/items".to_string()
//!     }
//!
//!     fn request_method(&self) -> Method {
//!         Method::POST
//!     }
//!
//!     fn request_body(&self) -> RequestBody {
//!         RequestBody::form([("name", self.name.as_str())])
//!     }
//!
//!     fn parse_response(&self, response: &str) -> Result<String, BoxError> {
//!         Ok(response.to_string())
//!     }
//! }
//!
//! # fn main() -> rest_core::Result<()> {
//! let configuration = Configuration::builder()
//!     .api_host("https://api.example.com")
//!     .basic_auth_credentials("user", "secret")
//!     .request_header("Accept", "application/json")
//!     .build()?;
//! let client = RestClient::init(configuration)?;
//! let created = client.execute(&CreateItem { name: "widget".into() })?;
//! println!("{created}");
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod interceptor;
pub mod message;
pub mod request;
pub mod transport;
pub mod types;

pub use auth::{AuthContext, AuthScope};
pub use client::RestClient;
pub use config::{Configuration, ConfigurationBuilder, ProxyConfiguration};
pub use error::{BoxError, ErrorKind, RestError, Result};
pub use handler::{handler_fn, FnHandler, ResponseHandler, RestResponseHandler};
pub use interceptor::{NoopInterceptor, RequestContext, RequestInterceptor};
pub use message::{Entity, HttpRequest, HttpResponse, RequestMethod};
pub use request::{Request, RequestBody};
pub use transport::{Transport, TransportError, TransportErrorKind, UreqTransport};
pub use types::{RequestHeader, RestResponse};

pub use http::Method;
