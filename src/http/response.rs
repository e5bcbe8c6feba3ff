//! HTTP response building module
//!
//! Provides builders for the status codes the server answers with,
//! decoupled from routing and handlers.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::error::Rejection;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Build compact JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_vec(body) {
        Ok(j) => j,
        Err(e) => {
            log_build_error("JSON", &e);
            return build_500_response();
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", JSON_CONTENT_TYPE)
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the response for a handler or dispatcher rejection
pub fn build_rejection_response(rejection: &Rejection) -> Response<Full<Bytes>> {
    match rejection {
        Rejection::NotFound => build_404_response(),
        other => json_response(
            other.status(),
            &serde_json::json!({ "error": other.to_string() }),
        ),
    }
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from("404 page not found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 page not found")))
        })
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    const BODY: &str = r#"{"error":"Internal Server Error"}"#;
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header("Content-Type", JSON_CONTENT_TYPE)
        .body(Full::new(Bytes::from_static(BODY.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            let mut resp = Response::new(Full::new(Bytes::from_static(BODY.as_bytes())));
            *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            resp
        })
}

/// Build redirect response with a specific status code
pub fn build_redirect_response_with_code(target: &str, code: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(code)
        .header("Location", target)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(format!("Redirecting to {target}"))))
        .unwrap_or_else(|e| {
            log_build_error(code.as_str(), &e);
            Response::new(Full::new(Bytes::from("Redirecting...")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &impl std::fmt::Display) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_json_response_is_compact() {
        let resp = json_response(
            StatusCode::OK,
            &serde_json::json!({ "message": "hi", "status": "success" }),
        );
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], JSON_CONTENT_TYPE);
        assert_eq!(body_string(resp).await, r#"{"message":"hi","status":"success"}"#);
    }

    #[tokio::test]
    async fn test_rejection_not_found_is_plain_text() {
        let resp = build_rejection_response(&Rejection::NotFound);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(body_string(resp).await, "404 page not found");
    }

    #[tokio::test]
    async fn test_rejection_too_large_has_error_field() {
        let resp = build_rejection_response(&Rejection::PayloadTooLarge { limit: 16 });
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let value: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(value["error"], "request body exceeds 16 bytes");
    }

    #[tokio::test]
    async fn test_500_response() {
        let resp = build_500_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(resp).await, r#"{"error":"Internal Server Error"}"#);
    }

    #[test]
    fn test_redirect_response() {
        let resp = build_redirect_response_with_code("/health", StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()["location"], "/health");
    }
}
