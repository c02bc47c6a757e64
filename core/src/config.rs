//! Client configuration.
//!
//! A [`Configuration`] is built once through [`ConfigurationBuilder`] and is
//! read-only afterwards. It is owned by the client for its whole lifetime;
//! using different settings means closing the client and creating a new
//! one.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use crate::error::{RestError, Result};
use crate::interceptor::{NoopInterceptor, RequestInterceptor};
use crate::types::RequestHeader;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Proxy the transport routes every request through.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ProxyConfiguration {
    host: String,
    port: u16,
    #[serde(default = "default_proxy_scheme")]
    scheme: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

fn default_proxy_scheme() -> String {
    "http".to_string()
}

impl ProxyConfiguration {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            scheme: default_proxy_scheme(),
            username: None,
            password: None,
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn is_proxy_authentication_enabled(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

impl fmt::Debug for ProxyConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfiguration")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("scheme", &self.scheme)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
struct BasicAuthCredentials {
    username: String,
    password: String,
}

/// Resolved, validated client settings.
#[derive(Clone)]
pub struct Configuration {
    api_host: String,
    request_timeout_in_seconds: u64,
    proxy: Option<ProxyConfiguration>,
    basic_auth: Option<BasicAuthCredentials>,
    request_headers: Vec<RequestHeader>,
    request_interceptor: Arc<dyn RequestInterceptor>,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// Base URL every endpoint is appended to.
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    pub fn request_timeout_in_seconds(&self) -> u64 {
        self.request_timeout_in_seconds
    }

    pub fn proxy_configuration(&self) -> Option<&ProxyConfiguration> {
        self.proxy.as_ref()
    }

    pub fn basic_auth_username(&self) -> Option<&str> {
        self.basic_auth.as_ref().map(|c| c.username.as_str())
    }

    pub fn basic_auth_password(&self) -> Option<&str> {
        self.basic_auth.as_ref().map(|c| c.password.as_str())
    }

    /// Default headers, in the order they were first added.
    pub fn request_headers(&self) -> &[RequestHeader] {
        &self.request_headers
    }

    pub fn request_interceptor(&self) -> &dyn RequestInterceptor {
        self.request_interceptor.as_ref()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("api_host", &self.api_host)
            .field("request_timeout_in_seconds", &self.request_timeout_in_seconds)
            .field("proxy", &self.proxy)
            .field("basic_auth_username", &self.basic_auth_username())
            .field("request_headers", &self.request_headers)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Configuration`].
pub struct ConfigurationBuilder {
    api_host: Option<String>,
    request_timeout_in_seconds: u64,
    proxy: Option<ProxyConfiguration>,
    basic_auth: Option<BasicAuthCredentials>,
    request_headers: Vec<RequestHeader>,
    request_interceptor: Arc<dyn RequestInterceptor>,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self {
            api_host: None,
            request_timeout_in_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            proxy: None,
            basic_auth: None,
            request_headers: Vec::new(),
            request_interceptor: Arc::new(NoopInterceptor),
        }
    }
}

impl ConfigurationBuilder {
    pub fn api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = Some(api_host.into());
        self
    }

    pub fn request_timeout_in_seconds(mut self, seconds: u64) -> Self {
        self.request_timeout_in_seconds = seconds;
        self
    }

    pub fn proxy(mut self, proxy: ProxyConfiguration) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn basic_auth_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some(BasicAuthCredentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Add a default header. Adding the same name/value pair twice keeps
    /// only the first.
    pub fn request_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let header = RequestHeader::new(name, value);
        if !self.request_headers.contains(&header) {
            self.request_headers.push(header);
        }
        self
    }

    pub fn request_headers(self, headers: impl IntoIterator<Item = RequestHeader>) -> Self {
        headers.into_iter().fold(self, |builder, header| {
            builder.request_header(header.name().to_string(), header.value().to_string())
        })
    }

    pub fn request_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.request_interceptor = Arc::new(interceptor);
        self
    }

    pub fn build(self) -> Result<Configuration> {
        let api_host = self
            .api_host
            .filter(|host| !host.trim().is_empty())
            .ok_or_else(|| RestError::InvalidConfiguration("api host is required".to_string()))?;

        let parsed = Url::parse(&api_host)
            .map_err(|e| RestError::InvalidConfiguration(format!("api host {api_host:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RestError::InvalidConfiguration(format!(
                "api host {api_host:?} must use http or https"
            )));
        }

        if self.request_timeout_in_seconds == 0 {
            return Err(RestError::InvalidConfiguration(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(Configuration {
            api_host,
            request_timeout_in_seconds: self.request_timeout_in_seconds,
            proxy: self.proxy,
            basic_auth: self.basic_auth,
            request_headers: self.request_headers,
            request_interceptor: self.request_interceptor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let config = Configuration::builder()
            .api_host("https://api.example.com")
            .build()
            .unwrap();
        assert_eq!(config.api_host(), "https://api.example.com");
        assert_eq!(config.request_timeout_in_seconds(), DEFAULT_REQUEST_TIMEOUT_SECS);
        assert!(config.proxy_configuration().is_none());
        assert!(config.basic_auth_username().is_none());
        assert!(config.request_headers().is_empty());
    }

    #[test]
    fn api_host_is_required() {
        let err = Configuration::builder().build().unwrap_err();
        assert!(matches!(err, RestError::InvalidConfiguration(_)));

        let err = Configuration::builder().api_host("  ").build().unwrap_err();
        assert!(matches!(err, RestError::InvalidConfiguration(_)));
    }

    #[test]
    fn api_host_must_be_http_url() {
        let err = Configuration::builder()
            .api_host("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidConfiguration(_)));

        let err = Configuration::builder()
            .api_host("ftp://files.example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidConfiguration(_)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Configuration::builder()
            .api_host("https://api.example.com")
            .request_timeout_in_seconds(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, RestError::InvalidConfiguration(_)));
    }

    #[test]
    fn duplicate_headers_collapse_and_keep_order() {
        let config = Configuration::builder()
            .api_host("https://api.example.com")
            .request_header("Accept", "application/json")
            .request_header("X-Client", "rest-core")
            .request_header("Accept", "application/json")
            .request_header("Accept", "text/plain")
            .build()
            .unwrap();
        assert_eq!(
            config.request_headers(),
            &[
                RequestHeader::new("Accept", "application/json"),
                RequestHeader::new("X-Client", "rest-core"),
                RequestHeader::new("Accept", "text/plain"),
            ]
        );
    }

    #[test]
    fn proxy_auth_requires_both_credentials() {
        let proxy = ProxyConfiguration::new("proxy.local", 3128);
        assert!(!proxy.is_proxy_authentication_enabled());
        assert_eq!(proxy.scheme(), "http");

        let proxy = proxy.with_credentials("user", "pass");
        assert!(proxy.is_proxy_authentication_enabled());
    }

    #[test]
    fn proxy_deserializes_with_default_scheme() {
        let proxy: ProxyConfiguration =
            serde_json::from_str(r#"{"host":"proxy.local","port":8080,"username":"u"}"#).unwrap();
        assert_eq!(proxy.host(), "proxy.local");
        assert_eq!(proxy.port(), 8080);
        assert_eq!(proxy.scheme(), "http");
        assert_eq!(proxy.username(), Some("u"));
        assert!(!proxy.is_proxy_authentication_enabled());
    }

    #[test]
    fn debug_output_hides_passwords() {
        let config = Configuration::builder()
            .api_host("https://api.example.com")
            .basic_auth_credentials("alice", "hunter2")
            .proxy(ProxyConfiguration::new("proxy.local", 3128).with_credentials("bob", "swordfish"))
            .build()
            .unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("swordfish"));
    }
}
