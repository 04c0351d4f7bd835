//! CORS and preflight handling.
//!
//! # Responsibilities
//! - Answer every OPTIONS request with 204 before routing
//! - Attach the CORS header block to dotted, non-root paths
//! - Honor the configured origin override before reflecting the caller's
//!
//! The dotted-path condition is part of the relay's public surface; SDKs
//! built against it depend on which paths carry the block.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// State for the CORS layer.
#[derive(Clone)]
pub struct CorsState {
    /// Configured origin override; the request's Origin is reflected
    /// when unset.
    pub allow_origin: Option<String>,
}

pub async fn cors_middleware(
    State(state): State<CorsState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    let origin = state
        .allow_origin
        .clone()
        .or_else(|| {
            req.headers()
                .get(header::ORIGIN)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "*".to_string());

    let mut response = if req.method() == Method::OPTIONS {
        axum::http::StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    if path != "/" && path.contains('.') {
        apply_cors_block(response.headers_mut(), &origin);
    }
    response
}

fn apply_cors_block(headers: &mut HeaderMap, origin: &str) {
    insert(headers, "access-control-allow-credentials", HeaderValue::from_static("true"));
    if let Ok(value) = HeaderValue::from_str(origin) {
        insert(headers, "access-control-allow-origin", value);
    }
    insert(
        headers,
        "access-control-allow-headers",
        HeaderValue::from_static("X-Requested-With,Content-Type"),
    );
    insert(
        headers,
        "access-control-allow-methods",
        HeaderValue::from_static("PUT,POST,GET,DELETE,OPTIONS"),
    );
    // Only as a default; a response that already declared its type wins.
    if !headers.contains_key(header::CONTENT_TYPE) {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
    }
}

fn insert(headers: &mut HeaderMap, name: &'static str, value: HeaderValue) {
    headers.insert(HeaderName::from_static(name), value);
}
