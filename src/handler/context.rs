//! Request context and handler reply types

use hyper::body::Bytes;
use hyper::{Method, StatusCode};
use serde_json::Value;

use crate::error::Rejection;

/// Everything a handler may read from a request, already parsed
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    params: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Bytes,
}

impl RequestContext {
    pub fn new(
        method: Method,
        path: impl Into<String>,
        params: Vec<(String, String)>,
        raw_query: Option<&str>,
        body: Bytes,
    ) -> Self {
        let query = raw_query.map(parse_query).unwrap_or_default();

        Self {
            method,
            path: path.into(),
            params,
            query,
            body,
        }
    }

    /// Captured path parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        lookup(&self.params, name)
    }

    /// First value of a query parameter, if the key is present at all
    pub fn query(&self, name: &str) -> Option<&str> {
        lookup(&self.query, name)
    }

    /// First value of a query parameter, or `default` when the key is absent.
    ///
    /// A key present with an empty value (`?q=`) yields `""`.
    pub fn query_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.query(name).unwrap_or(default)
    }

    pub const fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Decode a query string into key/value pairs.
///
/// Pairs containing `;` or a malformed `%` escape are dropped entirely.
fn parse_query(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|pair| !pair.contains(';') && has_valid_escapes(pair))
        .filter_map(|pair| url::form_urlencoded::parse(pair.as_bytes()).into_owned().next())
        .collect()
}

/// Every `%` must be followed by two hex digits
fn has_valid_escapes(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}

fn lookup<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// A handler's successful answer: status plus JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    pub const fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    pub const fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK, body)
    }
}

pub type HandlerResult = Result<Reply, Rejection>;

/// Route handler signature
pub type Handler = fn(&RequestContext) -> HandlerResult;
