//! Redirect URI parsing for the local callback listener

use url::{Host, Url};

use crate::error::{Error, Result};

/// Where the local callback listener binds and which path it serves.
///
/// Parsed once from the configured redirect URI. The port falls back to the
/// scheme's well-known port when the URI omits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    uri: String,
    host: String,
    port: u16,
    path: String,
}

impl RedirectTarget {
    pub fn parse(uri: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidRedirectUri {
            uri: uri.to_string(),
            reason: reason.to_string(),
        };

        let parsed = Url::parse(uri).map_err(|e| invalid(&e.to_string()))?;
        if parsed.scheme() != "http" {
            return Err(invalid("the local callback listener only serves http"));
        }

        let host = match parsed.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv4(ip)) => ip.to_string(),
            Some(Host::Ipv6(ip)) => ip.to_string(),
            None => return Err(invalid("missing host")),
        };
        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| invalid("missing port"))?;

        let path = parsed.path().to_string();
        // Router syntax, not literal path segments
        if path
            .split('/')
            .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
        {
            return Err(invalid("path segments must not start with ':' or '*'"));
        }

        Ok(Self {
            uri: uri.to_string(),
            host,
            port,
            path,
        })
    }

    /// The redirect URI exactly as configured
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Path the callback route is mounted at, always starting with `/`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `host:port` suitable for binding, with IPv6 hosts bracketed
    pub fn bind_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}
