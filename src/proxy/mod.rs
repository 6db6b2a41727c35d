//! Proxy descriptors and the `user:pass@host:port` parser.
//!
//! A [`Proxy`] is an immutable value attached to a
//! [`Request`](crate::Request). Parsing reuses URL-authority grammar instead
//! of hand-rolled matching, so bare IPs, hostnames, and optional credentials
//! all resolve through the same validated path.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use url::Url;

/// Port substituted when the proxy string carries none (or an out-of-range
/// one).
pub const DEFAULT_PROXY_PORT: u16 = 80;

/// Failure states of [`Proxy::parse`].
///
/// Callers treat any of these as "no proxy configured" rather than aborting
/// request construction.
#[derive(Debug, Error)]
pub enum ProxyParseError {
    #[error("invalid proxy authority '{input}': {source}")]
    InvalidAuthority {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid proxy authority '{0}': no host")]
    MissingHost(String),
    #[error("invalid proxy user info '{0}': expected user[:password]")]
    InvalidUserInfo(String),
}

/// Immutable proxy endpoint: host, port, optional credentials.
///
/// Canonical rendering via [`Display`](fmt::Display) is
/// `[username[:password]@]host:port` and round-trips through
/// [`Proxy::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<String>,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn trim_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Splits a trailing `:<digits>` port off the authority, clamping values
/// outside 1..=65535 to the default. The port is taken before URL parsing
/// because oversized values (`host:99999`) must degrade to the default
/// rather than invalidate the whole authority.
fn split_port(authority: &str) -> (&str, Option<u16>) {
    match authority.rsplit_once(':') {
        Some((host, digits))
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) =>
        {
            let port = match digits.parse::<u32>() {
                Ok(port @ 1..=65535) => port as u16,
                _ => DEFAULT_PROXY_PORT,
            };
            (host, Some(port))
        }
        _ => (authority, None),
    }
}

impl Proxy {
    /// Creates a descriptor for `host` on the default port, without
    /// credentials.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PROXY_PORT,
            username: None,
            password: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Parses `[username[:password]@](host|ip)[:port]`.
    ///
    /// The segment after the last `@` is handed to URL-authority parsing for
    /// host validation; a port that is absent or outside 1..=65535 falls
    /// back to [`DEFAULT_PROXY_PORT`]. More than one `:` in the credential
    /// segment is rejected.
    pub fn parse(proxy: &str) -> Result<Self, ProxyParseError> {
        let (user_info, authority) = match proxy.rsplit_once('@') {
            Some((user_info, authority)) => (Some(user_info), authority),
            None => (None, proxy),
        };

        let (host_authority, explicit_port) = split_port(authority);
        let url = Url::parse(&format!("http://{host_authority}")).map_err(|source| {
            ProxyParseError::InvalidAuthority {
                input: proxy.to_string(),
                source,
            }
        })?;
        let host = url
            .host_str()
            .ok_or_else(|| ProxyParseError::MissingHost(proxy.to_string()))?
            .to_string();
        let port = explicit_port
            .or(url.port())
            .unwrap_or(DEFAULT_PROXY_PORT);

        let mut username = None;
        let mut password = None;
        if let Some(info) = user_info.filter(|info| !is_blank(info)) {
            let parts: Vec<&str> = info.split(':').collect();
            if parts.len() > 2 {
                return Err(ProxyParseError::InvalidUserInfo(proxy.to_string()));
            }
            username = trim_to_none(parts[0]);
            password = parts.get(1).and_then(|part| trim_to_none(part));
        }

        Ok(Self {
            host,
            port,
            username,
            password,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// True only when both username and password are present and non-blank.
    pub fn has_authentication(&self) -> bool {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !is_blank(v));
        present(&self.username) && present(&self.password)
    }
}

impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_blank(&self.host) {
            return Ok(());
        }
        if let Some(username) = self.username.as_deref().filter(|u| !is_blank(u)) {
            f.write_str(username)?;
            if let Some(password) = self.password.as_deref().filter(|p| !is_blank(p)) {
                write!(f, ":{password}")?;
            }
            f.write_str("@")?;
        }
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Proxy {
    type Err = ProxyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Proxy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Proxy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Proxy::parse(&raw).map_err(D::Error::custom)
    }
}
