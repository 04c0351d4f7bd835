//! Cookie wire-format handling.
//!
//! # Responsibilities
//! - Parse the inbound `Cookie` header into a key/value map
//! - Decorate outbound `Set-Cookie` values per the transport security

use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// Suffix appended to every relayed cookie.
const PATH_SUFFIX: &str = "; PATH=/";

/// Extra attributes browsers require for cross-site cookies over TLS.
const SECURE_SUFFIX: &str = "; SameSite=None; Secure";

/// Parse a `Cookie` header value into a map.
///
/// Pairs are split on `;`. A pair with no `=`, a leading `=`, or a
/// trailing `=` is dropped. Surviving keys and values are percent-decoded
/// and trimmed.
pub fn parse_cookie_header(header: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for pair in header.split(';') {
        let pair = pair.trim();
        let Some(crack) = pair.find('=') else { continue };
        if crack == 0 || crack == pair.len() - 1 {
            continue;
        }
        let key = decode(&pair[..crack]);
        let value = decode(&pair[crack + 1..]);
        cookies.insert(key.trim().to_string(), value.trim().to_string());
    }
    cookies
}

/// Percent-decode a cookie component. Malformed escapes pass through as
/// literal text rather than failing the whole header.
pub fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Decorate an upstream `Set-Cookie` value for re-emission to the caller.
///
/// `PATH=/` is always appended. `SameSite=None; Secure` is added only when
/// the inbound hop was secure; on plain HTTP the `Secure` attribute would
/// make the cookie unusable to the browser.
pub fn decorate_set_cookie(cookie: &str, secure: bool) -> String {
    if secure {
        format!("{cookie}{PATH_SUFFIX}{SECURE_SUFFIX}")
    } else {
        format!("{cookie}{PATH_SUFFIX}")
    }
}
