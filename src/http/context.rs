//! Per-request context assembly.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → Cookie header   → cookie map
//!     → query string    → last-wins parameter map
//!     → body bytes      → JSON value (JSON or urlencoded form)
//!     → RequestContext (the single view handlers receive)
//! ```
//!
//! A string-valued `cookie` query parameter replaces the header cookie map
//! wholesale; a string-valued `cookie` field inside an object body is
//! parsed into a map in place. Both arrive percent-encoded on the wire and
//! are decoded before parsing.

use serde_json::Value;
use std::collections::HashMap;

use crate::http::cookies::{decode, parse_cookie_header};

/// Merged request view passed to every handler.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Cookies for the upstream call: query-supplied when present,
    /// otherwise the inbound header's.
    pub cookies: HashMap<String, String>,
    /// Query parameters, minus the absorbed `cookie` parameter.
    pub query: HashMap<String, String>,
    /// Parsed request body.
    pub body: Value,
    /// Caller opted out of cookie re-emission (`noCookie` parameter).
    pub no_cookie: bool,
}

impl RequestContext {
    /// Build the context from the normalized transport pieces.
    pub fn new(
        header_cookies: HashMap<String, String>,
        mut query: HashMap<String, String>,
        mut body: Value,
    ) -> Self {
        let cookies = match query.remove("cookie") {
            Some(raw) => parse_cookie_header(&decode(&raw)),
            None => header_cookies,
        };

        let body_cookies = body
            .get("cookie")
            .and_then(Value::as_str)
            .map(|raw| parse_cookie_header(&decode(raw)));
        if let (Some(parsed), Some(object)) = (body_cookies, body.as_object_mut()) {
            object.insert("cookie".to_string(), cookie_map_to_value(&parsed));
        }

        let no_cookie = query.get("noCookie").is_some_and(|value| !value.is_empty());

        Self { cookies, query, body, no_cookie }
    }

    /// Query parameter accessor.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Query parameter with a default.
    pub fn param_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.param(key).unwrap_or(default)
    }
}

/// Parse a raw query string into a last-wins parameter map.
pub fn parse_query(raw: Option<&str>) -> HashMap<String, String> {
    match raw {
        Some(raw) => url::form_urlencoded::parse(raw.as_bytes()).into_owned().collect(),
        None => HashMap::new(),
    }
}

/// Parse the request body per its content type: urlencoded forms into an
/// object, everything else as JSON. Empty or unparseable bodies are Null.
pub fn parse_body(content_type: Option<&str>, bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    if content_type
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
    {
        return Value::Object(
            url::form_urlencoded::parse(bytes)
                .into_owned()
                .map(|(key, value)| (key, Value::String(value)))
                .collect(),
        );
    }
    serde_json::from_slice(bytes).unwrap_or(Value::Null)
}

fn cookie_map_to_value(map: &HashMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn header_cookies() -> HashMap<String, String> {
        let mut cookies = HashMap::new();
        cookies.insert("MUSIC_U".to_string(), "header-token".to_string());
        cookies
    }

    #[test]
    fn test_header_cookies_used_by_default() {
        let ctx = RequestContext::new(header_cookies(), HashMap::new(), Value::Null);
        assert_eq!(ctx.cookies["MUSIC_U"], "header-token");
    }

    #[test]
    fn test_query_cookie_replaces_header_cookies_wholesale() {
        let mut query = HashMap::new();
        query.insert("cookie".to_string(), "MUSIC_A%3Dquery-token".to_string());

        let ctx = RequestContext::new(header_cookies(), query, Value::Null);

        assert_eq!(ctx.cookies.len(), 1);
        assert_eq!(ctx.cookies["MUSIC_A"], "query-token");
        assert!(!ctx.query.contains_key("cookie"));
    }

    #[test]
    fn test_body_cookie_string_parsed_in_place() {
        let body = json!({ "cookie": "a=1%3B%20b=2", "id": "5" });

        let ctx = RequestContext::new(HashMap::new(), HashMap::new(), body);

        assert_eq!(ctx.body["cookie"]["a"], "1");
        assert_eq!(ctx.body["cookie"]["b"], "2");
        assert_eq!(ctx.body["id"], "5");
        // The body cookie never feeds the upstream cookie map.
        assert!(ctx.cookies.is_empty());
    }

    #[test]
    fn test_body_cookie_object_left_untouched() {
        let body = json!({ "cookie": { "a": "1" } });
        let ctx = RequestContext::new(HashMap::new(), HashMap::new(), body.clone());
        assert_eq!(ctx.body, body);
    }

    #[test]
    fn test_no_cookie_requires_non_empty_value() {
        let mut query = HashMap::new();
        query.insert("noCookie".to_string(), "true".to_string());
        assert!(RequestContext::new(HashMap::new(), query, Value::Null).no_cookie);

        let mut query = HashMap::new();
        query.insert("noCookie".to_string(), String::new());
        assert!(!RequestContext::new(HashMap::new(), query, Value::Null).no_cookie);

        assert!(!RequestContext::new(HashMap::new(), HashMap::new(), Value::Null).no_cookie);
    }

    #[test]
    fn test_parse_query_last_value_wins() {
        let query = parse_query(Some("a=1&a=2&b=3"));
        assert_eq!(query["a"], "2");
        assert_eq!(query["b"], "3");
    }

    #[test]
    fn test_parse_query_decodes_components() {
        let query = parse_query(Some("name=hello%20world"));
        assert_eq!(query["name"], "hello world");
    }

    #[test]
    fn test_parse_query_absent() {
        assert!(parse_query(None).is_empty());
    }

    #[test]
    fn test_parse_body_json() {
        let body = parse_body(Some("application/json"), br#"{"id": 5}"#);
        assert_eq!(body["id"], 5);
    }

    #[test]
    fn test_parse_body_form() {
        let body = parse_body(
            Some("application/x-www-form-urlencoded"),
            b"id=5&name=hello%20world",
        );
        assert_eq!(body["id"], "5");
        assert_eq!(body["name"], "hello world");
    }

    #[test]
    fn test_parse_body_empty_or_invalid_is_null() {
        assert_eq!(parse_body(Some("application/json"), b""), Value::Null);
        assert_eq!(parse_body(Some("application/json"), b"{not json"), Value::Null);
        assert_eq!(parse_body(None, b"plain"), Value::Null);
    }
}
