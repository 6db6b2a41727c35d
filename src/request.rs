//! Fluent request descriptor.
//!
//! A [`Request`] aggregates everything a crawl task needs to describe one
//! fetch: URL, method, timeout, charset, user agent, cookie, payload, proxy,
//! plus case-insensitive header and param maps. It is inert data — an
//! executor elsewhere consumes it and performs the network call.

use std::time::Duration;

use http::Method;

use crate::headers::CaseInsensitiveMap;
use crate::proxy::Proxy;

/// Content type assumed for form-style POST bodies when the caller sets none.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Description of a single HTTP request, built through chained setters.
///
/// ```
/// use spiderkit::Request;
///
/// let request = Request::get("https://example.com/list")
///     .with_user_agent("spiderkit/0.1")
///     .header("Accept", "text/html")
///     .with_proxy_str("user:pass@10.0.0.5:3128");
/// assert_eq!(request.headers().get("accept"), Some("text/html"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    url: Option<String>,
    method: Method,
    timeout: Duration,
    charset: Option<String>,
    user_agent: Option<String>,
    cookie: Option<String>,
    payload: Option<String>,
    proxy: Option<Proxy>,
    headers: CaseInsensitiveMap,
    params: CaseInsensitiveMap,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            url: None,
            method: Method::GET,
            timeout: DEFAULT_TIMEOUT,
            charset: None,
            user_agent: None,
            cookie: None,
            payload: None,
            proxy: None,
            headers: CaseInsensitiveMap::new(),
            params: CaseInsensitiveMap::new(),
        }
    }
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    /// GET request for `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new().with_url(url)
    }

    /// POST request for `url`.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new().with_url(url).with_method(Method::POST)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    /// Sets the raw request body. When a payload is present, downstream
    /// executors send it and ignore [`params`](Self::params); when absent,
    /// the params are form-encoded instead.
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn with_proxy(mut self, proxy: Proxy) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Parses `proxy` as `[user[:password]@]host[:port]` and attaches the
    /// result. A malformed string is logged and leaves the request without a
    /// proxy; request building continues.
    pub fn with_proxy_str(mut self, proxy: &str) -> Self {
        match Proxy::parse(proxy) {
            Ok(parsed) => self.proxy = Some(parsed),
            Err(err) => {
                log::warn!("ignoring proxy '{proxy}': {err}");
                self.proxy = None;
            }
        }
        self
    }

    /// Adds one header. Names are matched case-insensitively; re-adding a
    /// name replaces the previous value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Adds every header of `headers`, in its iteration order.
    pub fn headers_from<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.insert_all(headers);
        self
    }

    /// Adds headers from a newline-separated `Name: Value` block.
    ///
    /// Lines are trimmed and blank lines skipped. A line without `:` is
    /// logged and stops processing of the block; lines parsed before it stay
    /// applied.
    pub fn raw_headers(mut self, raw: &str) -> Self {
        for line in raw.split('\n') {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.split_once(':') {
                Some((name, value)) => {
                    self.headers.insert(name.trim(), value.trim());
                }
                None => {
                    log::warn!("unparseable header line '{line}', dropping rest of block");
                    break;
                }
            }
        }
        self
    }

    /// Adds one form param. Ignored by executors whenever a payload is set.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Adds every param of `params`, in its iteration order.
    pub fn params_from<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params.insert_all(params);
        self
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    pub fn proxy(&self) -> Option<&Proxy> {
        self.proxy.as_ref()
    }

    pub fn headers(&self) -> &CaseInsensitiveMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut CaseInsensitiveMap {
        &mut self.headers
    }

    pub fn params(&self) -> &CaseInsensitiveMap {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut CaseInsensitiveMap {
        &mut self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_crawler_conventions() {
        let request = Request::new();
        assert_eq!(request.url(), None);
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.timeout(), Duration::from_secs(120));
        assert!(request.headers().is_empty());
        assert!(request.params().is_empty());
        assert!(request.proxy().is_none());
    }

    #[test]
    fn fluent_chain_sets_every_field() {
        let request = Request::post("https://example.com/submit")
            .with_timeout(Duration::from_secs(30))
            .with_charset("utf-8")
            .with_user_agent("spiderkit/0.1")
            .with_cookie("session=abc")
            .with_payload(r#"{"q":"rust"}"#)
            .header("Content-Type", "application/json")
            .param("page", "2");

        assert_eq!(request.url(), Some("https://example.com/submit"));
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.timeout(), Duration::from_secs(30));
        assert_eq!(request.charset(), Some("utf-8"));
        assert_eq!(request.user_agent(), Some("spiderkit/0.1"));
        assert_eq!(request.cookie(), Some("session=abc"));
        assert_eq!(request.payload(), Some(r#"{"q":"rust"}"#));
        assert_eq!(request.headers().get("content-type"), Some("application/json"));
        assert_eq!(request.params().get("PAGE"), Some("2"));
    }

    #[test]
    fn raw_header_block_parses_trimmed_lines() {
        let request = Request::new().raw_headers("Content-Type: text/html\nX-Foo: bar");
        assert_eq!(request.headers().get("content-type"), Some("text/html"));
        assert_eq!(request.headers().get("x-foo"), Some("bar"));
        assert_eq!(request.headers().len(), 2);
    }

    #[test]
    fn raw_header_block_skips_blank_lines_and_crlf() {
        let request = Request::new().raw_headers("\nAccept: */*\r\n\r\nHost: example.com\n");
        assert_eq!(request.headers().get("accept"), Some("*/*"));
        assert_eq!(request.headers().get("host"), Some("example.com"));
        assert_eq!(request.headers().len(), 2);
    }

    #[test]
    fn malformed_raw_header_line_keeps_earlier_lines() {
        let request = Request::new().raw_headers("Accept: */*\nbogus line\nHost: example.com");
        assert_eq!(request.headers().get("accept"), Some("*/*"));
        assert!(!request.headers().contains_key("host"));
        assert_eq!(request.headers().len(), 1);
    }

    #[test]
    fn malformed_raw_block_does_not_disturb_existing_headers() {
        let request = Request::new()
            .header("X-Token", "t0")
            .raw_headers("no colon here");
        assert_eq!(request.headers().get("x-token"), Some("t0"));
        assert_eq!(request.headers().len(), 1);
    }

    #[test]
    fn header_values_split_on_first_colon_only() {
        let request = Request::new().raw_headers("Referer: https://example.com/a");
        assert_eq!(request.headers().get("referer"), Some("https://example.com/a"));
    }

    #[test]
    fn proxy_str_attaches_parsed_descriptor() {
        let request = Request::new().with_proxy_str("user:pass@10.0.0.5:3128");
        let proxy = request.proxy().unwrap();
        assert_eq!(proxy.host(), "10.0.0.5");
        assert_eq!(proxy.port(), 3128);
        assert!(proxy.has_authentication());
    }

    #[test]
    fn invalid_proxy_str_leaves_request_without_proxy() {
        let request = Request::new().with_proxy_str("not a valid ::: proxy");
        assert!(request.proxy().is_none());

        let request = Request::new()
            .with_proxy(Proxy::new("10.0.0.5"))
            .with_proxy_str("a:b:c@host");
        assert!(request.proxy().is_none());
    }

    #[test]
    fn bulk_setters_preserve_source_order() {
        let request = Request::new()
            .headers_from([("B", "2"), ("a", "1")])
            .params_from([("y", "20"), ("x", "10")]);

        let header_keys: Vec<&str> = request.headers().keys().collect();
        assert_eq!(header_keys, ["B", "a"]);
        let param_keys: Vec<&str> = request.params().keys().collect();
        assert_eq!(param_keys, ["y", "x"]);
    }
}
