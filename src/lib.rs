//! # spiderkit
//!
//! Request-description building blocks for web crawlers: a fluent
//! [`Request`] descriptor, the case-insensitive insertion-ordered
//! [`CaseInsensitiveMap`] backing its headers and params, and a [`Proxy`]
//! descriptor with a `user:pass@host:port` parser.
//!
//! Everything here is inert configuration data. The crate deliberately stops
//! short of fetching: an executor elsewhere takes a finished [`Request`] and
//! performs the network call.
//!
//! ## Example
//!
//! ```
//! use spiderkit::Request;
//!
//! let request = Request::get("https://example.com/page")
//!     .with_user_agent("spiderkit/0.1")
//!     .raw_headers("Accept: text/html\nAccept-Language: en")
//!     .with_proxy_str("user:pass@10.0.0.5:3128");
//!
//! assert_eq!(request.headers().get("ACCEPT"), Some("text/html"));
//! assert_eq!(request.proxy().unwrap().port(), 3128);
//! ```

mod request;

pub mod headers;
pub mod proxy;

pub use crate::headers::CaseInsensitiveMap;
pub use crate::proxy::{DEFAULT_PROXY_PORT, Proxy, ProxyParseError};
pub use crate::request::{DEFAULT_CONTENT_TYPE, DEFAULT_TIMEOUT, Request};

/// Crate version, handy for default user-agent strings.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
