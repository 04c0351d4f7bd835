//! Upstream request/response types and error definitions.

use reqwest::Method;
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

use crate::http::response::{HandlerFailure, HandlerResult};

/// One outbound call to the upstream API.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// Path joined onto the configured base URL, or an absolute URL.
    pub url: String,
    pub method: Method,
    /// Payload, sent form-encoded for mutating methods and as query
    /// parameters for GET.
    pub data: Value,
    /// Cookies forwarded to the upstream.
    pub cookies: HashMap<String, String>,
    /// Caller IP bound by the dispatcher's request factory.
    pub real_ip: Option<String>,
}

impl OutboundRequest {
    pub fn post(url: impl Into<String>, data: Value) -> Self {
        Self {
            url: url.into(),
            method: Method::POST,
            data,
            cookies: HashMap::new(),
            real_ip: None,
        }
    }

    pub fn get(url: impl Into<String>, data: Value) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            data,
            cookies: HashMap::new(),
            real_ip: None,
        }
    }

    pub fn with_cookies(mut self, cookies: HashMap<String, String>) -> Self {
        self.cookies = cookies;
        self
    }
}

/// Reshaped upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    /// Upstream body, parsed as JSON when possible and carried as a
    /// string otherwise.
    pub body: Value,
    /// `Set-Cookie` values with their Domain attribute stripped, so the
    /// cookies re-bind to the relay origin.
    pub set_cookies: Vec<String>,
    /// Remaining upstream headers, for handler inspection only.
    pub headers: HashMap<String, String>,
}

/// Errors that can occur during upstream calls.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The outbound URL could not be built.
    #[error("invalid upstream url: {0}")]
    Url(String),

    /// Transport-level failure (connect, timeout, protocol).
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

impl From<UpstreamResponse> for HandlerResult {
    /// A response relayed as-is. Upstream transport headers are not
    /// forwarded; the body is re-serialized and cookies travel separately.
    fn from(response: UpstreamResponse) -> Self {
        Self {
            status: response.status,
            body: response.body,
            headers: HashMap::new(),
            cookies: response.set_cookies,
        }
    }
}

impl From<UpstreamError> for HandlerFailure {
    fn from(error: UpstreamError) -> Self {
        HandlerFailure::with_body(
            502,
            json!({ "code": 502, "msg": error.to_string() }),
        )
    }
}
