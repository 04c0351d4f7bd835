//! MD5/SHA1 digest primitives.
//!
//! The upstream protocol digests both raw strings and structured values;
//! structured values are canonicalized to their JSON text form first.

use md5::{Digest, Md5};
use serde_json::Value;
use sha1::Sha1;
use std::borrow::Cow;

/// Input accepted by the digest and cipher functions.
///
/// Raw bytes and text pass through untouched; a JSON value is serialized to
/// its compact text form before any bytes are hashed or encrypted.
#[derive(Debug, Clone)]
pub enum Payload<'a> {
    Bytes(&'a [u8]),
    Text(&'a str),
    Json(&'a Value),
}

impl<'a> Payload<'a> {
    /// Canonical byte form of the payload.
    pub fn canonical_bytes(&self) -> Cow<'a, [u8]> {
        match self {
            Payload::Bytes(b) => Cow::Borrowed(b),
            Payload::Text(s) => Cow::Borrowed(s.as_bytes()),
            Payload::Json(v) => {
                Cow::Owned(serde_json::to_vec(v).expect("JSON value serialization cannot fail"))
            }
        }
    }
}

impl<'a> From<&'a [u8]> for Payload<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Payload::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(text: &'a str) -> Self {
        Payload::Text(text)
    }
}

impl<'a> From<&'a Value> for Payload<'a> {
    fn from(value: &'a Value) -> Self {
        Payload::Json(value)
    }
}

/// MD5 digest of the canonical payload bytes, as lowercase hex.
pub fn md5_hex<'a>(data: impl Into<Payload<'a>>) -> String {
    let bytes = data.into().canonical_bytes();
    let mut hasher = Md5::new();
    hasher.update(bytes.as_ref());
    hex::encode(hasher.finalize())
}

/// SHA1 digest of the canonical payload bytes, as lowercase hex.
pub fn sha1_hex<'a>(data: impl Into<Payload<'a>>) -> String {
    let bytes = data.into().canonical_bytes();
    let mut hasher = Sha1::new();
    hasher.update(bytes.as_ref());
    hex::encode(hasher.finalize())
}
