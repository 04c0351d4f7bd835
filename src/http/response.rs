//! Handler outcome shapes and response shaping.
//!
//! # Responsibilities
//! - Define the result/failure shapes every handler produces
//! - Map outcomes onto transport responses
//! - Apply the cookie re-emission policy
//! - Mask bodyless failures behind a generic not-found envelope
//!
//! # Design Decisions
//! - Failures are structurally results on the error channel; only a
//!   missing (or null) body marks one as maskable
//! - Cookies are appended before handler headers are applied, so a
//!   handler-supplied `Set-Cookie` header replaces the relayed ones

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::http::cookies::decorate_set_cookie;

/// Successful handler outcome, reshaped from the upstream response.
#[derive(Debug, Clone, Default)]
pub struct HandlerResult {
    pub status: u16,
    pub body: Value,
    pub headers: HashMap<String, String>,
    /// Upstream `Set-Cookie` values, in upstream order.
    pub cookies: Vec<String>,
}

impl HandlerResult {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body, ..Default::default() }
    }

    pub fn with_cookies(mut self, cookies: Vec<String>) -> Self {
        self.cookies = cookies;
        self
    }
}

/// Failed handler outcome.
#[derive(Debug, Clone, Default)]
pub struct HandlerFailure {
    pub status: u16,
    pub body: Option<Value>,
    pub headers: HashMap<String, String>,
    /// Carried for structural parity; never re-emitted on the error path.
    pub cookies: Vec<String>,
}

impl HandlerFailure {
    /// Bodyless failure, masked to the not-found envelope at respond time.
    pub fn masked(status: u16) -> Self {
        Self { status, ..Default::default() }
    }

    pub fn with_body(status: u16, body: Value) -> Self {
        Self { status, body: Some(body), ..Default::default() }
    }
}

pub type HandlerOutcome = Result<HandlerResult, HandlerFailure>;

/// The fixed envelope returned for bodyless failures and unmounted paths.
pub fn not_found_envelope() -> Value {
    json!({ "code": 404, "data": null, "msg": "Not Found" })
}

/// Map a success onto the transport response.
///
/// Relayed cookies are decorated per the transport security and skipped
/// entirely when the caller opted out.
pub fn respond_success(result: HandlerResult, secure: bool, no_cookie: bool) -> Response {
    let status = StatusCode::from_u16(result.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(result.body)).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );

    if !no_cookie {
        for cookie in &result.cookies {
            match HeaderValue::from_str(&decorate_set_cookie(cookie, secure)) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(_) => tracing::warn!(cookie = %cookie, "dropping undecoratable cookie"),
            }
        }
    }

    apply_headers(&mut response, &result.headers);
    response
}

/// Map a failure onto the transport response.
///
/// A failure whose body is absent or null is masked behind the generic
/// not-found envelope so internal error shapes never reach the caller; the
/// real cause is the dispatcher's to log.
pub fn respond_failure(failure: HandlerFailure) -> Response {
    let body = match failure.body {
        None | Some(Value::Null) => {
            return (StatusCode::NOT_FOUND, Json(not_found_envelope())).into_response();
        }
        Some(body) => body,
    };

    let status = StatusCode::from_u16(failure.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    apply_headers(&mut response, &failure.headers);
    response
}

fn apply_headers(response: &mut Response, headers: &HashMap<String, String>) {
    for (name, value) in headers {
        let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
            tracing::warn!(header = %name, "dropping invalid response header name");
            continue;
        };
        match HeaderValue::from_str(value) {
            Ok(header_value) => {
                response.headers_mut().insert(header_name, header_value);
            }
            Err(_) => tracing::warn!(header = %name, "dropping invalid response header value"),
        }
    }
}
