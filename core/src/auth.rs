//! Authentication context bound to a client at init.
//!
//! Built once from the [`Configuration`] and never mutated afterwards.
//! Basic-auth credentials are scoped to the API host and attached
//! preemptively, so no 401 round-trip is needed. Proxy credentials travel
//! unescaped in the proxy URI, which the transport uses to authenticate
//! preemptively with the proxy; credentials that would need escaping are
//! rejected at init.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use url::Url;

use crate::config::{Configuration, ProxyConfiguration};
use crate::error::{RestError, Result};

/// Host and port a credential applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthScope {
    host: String,
    port: Option<u16>,
}

impl AuthScope {
    fn of(url: &Url) -> Option<Self> {
        Some(Self {
            host: url.host_str()?.to_ascii_lowercase(),
            port: url.port_or_known_default(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

#[derive(Clone)]
struct ScopedAuthorization {
    scope: AuthScope,
    header_value: String,
}

#[derive(Clone, Default)]
pub struct AuthContext {
    basic: Option<ScopedAuthorization>,
    proxy_uri: Option<String>,
}

impl AuthContext {
    pub fn from_configuration(configuration: &Configuration) -> Result<Self> {
        let proxy_uri = configuration
            .proxy_configuration()
            .map(build_proxy_uri)
            .transpose()?;

        let basic = match configuration.basic_auth_username() {
            Some(username) => {
                let api_url = Url::parse(configuration.api_host()).map_err(|e| {
                    RestError::InvalidConfiguration(format!(
                        "cannot scope basic auth to api host {:?}: {e}",
                        configuration.api_host()
                    ))
                })?;
                let scope = AuthScope::of(&api_url).ok_or_else(|| {
                    RestError::InvalidConfiguration(format!(
                        "api host {:?} has no host name",
                        configuration.api_host()
                    ))
                })?;
                let password = configuration.basic_auth_password().unwrap_or_default();
                Some(ScopedAuthorization {
                    scope,
                    header_value: basic_authorization(username, password),
                })
            }
            None => None,
        };

        Ok(Self { basic, proxy_uri })
    }

    /// The preemptive `Authorization` value for `url`, if it falls inside
    /// the basic-auth scope.
    pub fn authorization_for(&self, url: &str) -> Option<&str> {
        let basic = self.basic.as_ref()?;
        let target = Url::parse(url).ok()?;
        (AuthScope::of(&target)? == basic.scope).then_some(basic.header_value.as_str())
    }

    pub fn basic_auth_scope(&self) -> Option<&AuthScope> {
        self.basic.as_ref().map(|b| &b.scope)
    }

    /// `scheme://[user:password@]host:port` for the configured proxy.
    pub fn proxy_uri(&self) -> Option<&str> {
        self.proxy_uri.as_deref()
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("basic_auth_scope", &self.basic_auth_scope())
            .field("proxy", &self.proxy_uri.is_some())
            .finish()
    }
}

fn basic_authorization(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

fn build_proxy_uri(proxy: &ProxyConfiguration) -> Result<String> {
    let invalid = |detail: String| RestError::InvalidConfiguration(format!("proxy: {detail}"));

    let authority = format!("{}:{}", proxy.host(), proxy.port());
    Url::parse(&format!("{}://{authority}", proxy.scheme())).map_err(|e| invalid(e.to_string()))?;

    if !proxy.is_proxy_authentication_enabled() {
        return Ok(format!("{}://{authority}", proxy.scheme()));
    }

    // The transport base64-encodes the userinfo exactly as it appears in the
    // URI, so credentials go in verbatim or not at all.
    let username = proxy.username().unwrap_or_default();
    let password = proxy.password().unwrap_or_default();
    if let Some(c) = username.chars().find(|c| !is_userinfo_char(*c)) {
        return Err(invalid(format!("username cannot contain {c:?}")));
    }
    if let Some(c) = password.chars().find(|c| !is_userinfo_char(*c)) {
        return Err(invalid(format!("password cannot contain {c:?}")));
    }

    Ok(format!("{}://{username}:{password}@{authority}", proxy.scheme()))
}

/// Unreserved and sub-delim characters: valid in a URI userinfo without
/// percent-encoding and never a separator.
fn is_userinfo_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._~!$&'()*+,;=".contains(c)
}
