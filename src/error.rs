//! Error types
//!
//! `ServerError` covers startup failures and is returned from `main`.
//! `Rejection` is what a handler (or the dispatcher on its behalf) answers
//! with instead of a normal reply; each variant maps to one status code.
//! `RouteError` is raised while the route table is being built.

use hyper::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("route table error: {0}")]
    Route(#[from] RouteError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum Rejection {
    /// Body is not a JSON object
    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("failed to read request body: {0}")]
    BodyRead(String),

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    #[error("404 page not found")]
    NotFound,
}

impl Rejection {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_) | Self::BodyRead(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route pattern must start with '/': {0}")]
    MissingLeadingSlash(String),

    #[error("empty parameter name in route pattern: {0}")]
    EmptyParam(String),

    #[error("parameter ':{name}' appears twice in route pattern: {pattern}")]
    DuplicateParam { pattern: String, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_status_codes() {
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert_eq!(Rejection::from(err).status(), StatusCode::BAD_REQUEST);
        assert_eq!(Rejection::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Rejection::PayloadTooLarge { limit: 1 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_invalid_json_message_is_parser_message() {
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let expected = err.to_string();
        assert_eq!(Rejection::from(err).to_string(), expected);
        assert!(!expected.is_empty());
    }
}
