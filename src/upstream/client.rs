//! Upstream HTTP client and the per-request factory handed to handlers.
//!
//! # Responsibilities
//! - Join outbound paths onto the configured base URL
//! - Send calls with the relay's cookie and identity headers
//! - Reshape responses: parse the body, strip cookie Domain attributes
//! - Bind the caller's normalized IP per request

use reqwest::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE, USER_AGENT};
use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::schema::UpstreamConfig;
use crate::upstream::types::{OutboundRequest, UpstreamError, UpstreamResponse, UpstreamResult};

/// Shared client for upstream calls.
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    user_agent: String,
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl UpstreamClient {
    /// Create a client from upstream configuration.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let base_url: Url = config.base_url.parse().map_err(|e| {
            UpstreamError::Url(format!("'{}': {}", config.base_url, e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Send one outbound call and reshape the response.
    pub async fn send(&self, request: OutboundRequest) -> UpstreamResult<UpstreamResponse> {
        let url = self.resolve(&request.url)?;

        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, value);
        }
        if !request.cookies.is_empty() {
            let cookie = request
                .cookies
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                headers.insert(COOKIE, value);
            }
        }
        if let Some(ip) = &request.real_ip {
            if let Ok(value) = HeaderValue::from_str(ip) {
                headers.insert("x-real-ip", value);
            }
        }

        let fields = form_fields(&request.data);
        let builder = self.http.request(request.method.clone(), url).headers(headers);
        let builder = if request.method == Method::GET {
            builder.query(&fields)
        } else {
            builder.form(&fields)
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();

        let mut set_cookies = Vec::new();
        let mut response_headers = HashMap::new();
        for (name, value) in response.headers() {
            let Ok(text) = value.to_str() else { continue };
            if name == SET_COOKIE {
                set_cookies.push(strip_domain(text));
            } else {
                response_headers.insert(name.to_string(), text.to_string());
            }
        }

        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        Ok(UpstreamResponse {
            status,
            body,
            set_cookies,
            headers: response_headers,
        })
    }

    /// Resolve a path against the base URL; absolute URLs pass through.
    fn resolve(&self, path_or_url: &str) -> UpstreamResult<Url> {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            return path_or_url
                .parse()
                .map_err(|e| UpstreamError::Url(format!("'{path_or_url}': {e}")));
        }
        self.base_url
            .join(path_or_url)
            .map_err(|e| UpstreamError::Url(format!("'{path_or_url}': {e}")))
    }
}

/// Per-request capability handed to handlers.
///
/// Wraps the shared client and stamps the caller's normalized IP onto
/// every outbound request it sends.
#[derive(Debug, Clone)]
pub struct RequestFactory {
    client: Arc<UpstreamClient>,
    client_ip: Option<String>,
}

impl RequestFactory {
    pub fn new(client: Arc<UpstreamClient>, client_ip: impl Into<Option<String>>) -> Self {
        Self {
            client,
            client_ip: client_ip.into(),
        }
    }

    /// Send an outbound call with the caller identity applied.
    pub async fn send(&self, mut request: OutboundRequest) -> UpstreamResult<UpstreamResponse> {
        request.real_ip = self.client_ip.clone();
        self.client.send(request).await
    }
}

/// Flatten a JSON object into form fields. Non-string scalars serialize
/// to their JSON text, matching how the legacy relay stringified them.
fn form_fields(data: &Value) -> Vec<(String, String)> {
    match data {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Drop the Domain attribute from a `Set-Cookie` value so the cookie binds
/// to the relay origin instead of the upstream's.
fn strip_domain(set_cookie: &str) -> String {
    set_cookie
        .split(';')
        .map(str::trim)
        .filter(|part| !part.to_ascii_lowercase().starts_with("domain="))
        .collect::<Vec<_>>()
        .join("; ")
}
