//! Route table and request dispatch
//!
//! Entry point for HTTP request processing once a connection has parsed a
//! request: route matching, trailing-slash redirects, body collection,
//! handler invocation with panic recovery, and response building.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};

use super::pattern::PathPattern;
use crate::error::{Rejection, RouteError};
use crate::handler::{Handler, RequestContext};
use crate::http;
use crate::logger;

/// A registered (method, pattern) pair and its handler
struct Route {
    method: Method,
    pattern: PathPattern,
    handler: Handler,
}

/// Immutable-after-startup route table
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route
    pub fn route(
        mut self,
        method: Method,
        pattern: &str,
        handler: Handler,
    ) -> Result<Self, RouteError> {
        let pattern = PathPattern::parse(pattern)?;
        self.routes.push(Route {
            method,
            pattern,
            handler,
        });
        Ok(self)
    }

    pub fn get(self, pattern: &str, handler: Handler) -> Result<Self, RouteError> {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post(self, pattern: &str, handler: Handler) -> Result<Self, RouteError> {
        self.route(Method::POST, pattern, handler)
    }

    /// Registered routes in registration order
    pub fn routes(&self) -> impl Iterator<Item = (&Method, &str)> {
        self.routes.iter().map(|r| (&r.method, r.pattern.as_str()))
    }

    /// Find the most specific route for method and raw path
    ///
    /// Static segments outrank parameters left to right; among equally
    /// specific routes the first registered wins.
    fn find(&self, method: &Method, path: &str) -> Option<(&Route, Vec<(String, String)>)> {
        let mut best: Option<(&Route, Vec<(String, String)>, Vec<bool>)> = None;
        for route in self.routes.iter().filter(|r| r.method == *method) {
            let Some(params) = route.pattern.matches(path) else {
                continue;
            };
            let rank = route.pattern.specificity();
            if best
                .as_ref()
                .is_none_or(|(_, _, best_rank)| rank > *best_rank)
            {
                best = Some((route, params, rank));
            }
        }
        best.map(|(route, params, _)| (route, params))
    }

    /// Path that would match if its trailing slash were added or removed
    fn trailing_slash_alternative(&self, method: &Method, path: &str) -> Option<String> {
        if path == "/" {
            return None;
        }
        let alternative = match path.strip_suffix('/') {
            Some(trimmed) => trimmed.to_string(),
            None => format!("{path}/"),
        };
        self.find(method, &alternative).map(|_| alternative)
    }

    /// Dispatch a request to its handler and build the response
    pub async fn dispatch<B>(&self, req: Request<B>, max_body_size: u64) -> Response<Full<Bytes>>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();
        let path = parts.uri.path();

        let Some((route, params)) = self.find(&parts.method, path) else {
            return self.not_found(&parts.method, &parts.uri);
        };

        // 1. Reject oversized bodies up front when the length is declared
        if let Some(size) = content_length(&parts.headers) {
            if size > max_body_size {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                return http::build_rejection_response(&Rejection::PayloadTooLarge {
                    limit: max_body_size,
                });
            }
        }

        // 2. Collect the body, enforcing the limit for chunked uploads
        let body = match read_body(body, max_body_size).await {
            Ok(bytes) => bytes,
            Err(rejection) => return http::build_rejection_response(&rejection),
        };

        let ctx = RequestContext::new(
            parts.method.clone(),
            path,
            params,
            parts.uri.query(),
            body,
        );

        // 3. Run the handler, turning a panic into a 500
        match panic::catch_unwind(AssertUnwindSafe(|| (route.handler)(&ctx))) {
            Ok(Ok(reply)) => http::json_response(reply.status, &reply.body),
            Ok(Err(rejection)) => http::build_rejection_response(&rejection),
            Err(payload) => {
                logger::log_panic(&ctx.method, &ctx.path, &panic_message(payload.as_ref()));
                http::build_500_response()
            }
        }
    }

    /// 404, or a redirect when only the trailing slash is off
    fn not_found(&self, method: &Method, uri: &hyper::Uri) -> Response<Full<Bytes>> {
        let Some(target) = self.trailing_slash_alternative(method, uri.path()) else {
            return http::build_rejection_response(&Rejection::NotFound);
        };

        let location = match uri.query() {
            Some(q) => format!("{target}?{q}"),
            None => target,
        };
        let code = if *method == Method::GET {
            StatusCode::MOVED_PERMANENTLY
        } else {
            StatusCode::TEMPORARY_REDIRECT
        };
        http::build_redirect_response_with_code(&location, code)
    }
}

fn content_length(headers: &hyper::HeaderMap) -> Option<u64> {
    let value = headers.get(hyper::header::CONTENT_LENGTH)?;
    match value.to_str().ok().and_then(|s| s.parse::<u64>().ok()) {
        Some(size) => Some(size),
        None => {
            logger::log_warning("Invalid Content-Length value, skipping size check");
            None
        }
    }
}

async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes, Rejection>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(Rejection::PayloadTooLarge {
            limit: max_body_size,
        }),
        Err(e) => Err(Rejection::BodyRead(e.to_string())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
