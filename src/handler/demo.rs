//! Demo endpoints
//!
//! Five fixed routes: hello-world, a path-parameter echo, a query echo,
//! a JSON-body echo and a health check. None of them touch shared state.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{HandlerResult, Reply, RequestContext};
use crate::error::{Rejection, RouteError};
use crate::routing::Router;

/// Build the route table served by the application
pub fn router() -> Result<Router, RouteError> {
    Router::new()
        .get("/", hello)?
        .get("/user/:name", greet_user)?
        .get("/search", search)?
        .post("/data", echo_data)?
        .get("/health", health)
}

/// GET /
pub fn hello(_ctx: &RequestContext) -> HandlerResult {
    Ok(Reply::ok(json!({
        "message": "Hello, World!",
        "status": "success",
    })))
}

/// GET /user/:name
pub fn greet_user(ctx: &RequestContext) -> HandlerResult {
    let name = ctx.param("name").unwrap_or_default();
    Ok(Reply::ok(json!({
        "message": format!("Hello, {name}!"),
        "user": name,
    })))
}

/// GET /search?q=..&limit=..
///
/// `limit` is echoed as given; it is never parsed as a number.
pub fn search(ctx: &RequestContext) -> HandlerResult {
    Ok(Reply::ok(json!({
        "query": ctx.query_or("q", ""),
        "limit": ctx.query_or("limit", "10"),
    })))
}

/// POST /data
pub fn echo_data(ctx: &RequestContext) -> HandlerResult {
    // Only the first JSON value is read; anything after it is ignored.
    // `null` parses to None and is echoed back as null.
    let mut de = serde_json::Deserializer::from_slice(ctx.body());
    let data =
        Option::<Map<String, Value>>::deserialize(&mut de).map_err(Rejection::InvalidJson)?;
    Ok(Reply::ok(json!({
        "message": "Data received successfully",
        "data": data,
    })))
}

/// GET /health
pub fn health(_ctx: &RequestContext) -> HandlerResult {
    Ok(Reply::ok(json!({ "status": "healthy" })))
}
