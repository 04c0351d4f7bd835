//! Cellphone login relay.
//!
//! The password is MD5-hashed before it leaves this process, and the whole
//! payload travels inside the upstream's encrypted envelope: the JSON is
//! AES-encrypted under a generated password, and that password rides along
//! RSA-encrypted against the upstream's well-known public key.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::crypto::{
    aes_encrypt, md5_hex, rsa_encrypt, AesEncrypted, CipherOptions, CryptoResult,
    DEFAULT_RSA_PUBLIC_KEY,
};
use crate::http::context::RequestContext;
use crate::http::handler::RouteHandler;
use crate::http::response::{HandlerFailure, HandlerOutcome};
use crate::upstream::{OutboundRequest, RequestFactory};

pub struct LoginCellphone;

#[async_trait]
impl RouteHandler for LoginCellphone {
    fn name(&self) -> &'static str {
        "login_cellphone"
    }

    async fn handle(&self, ctx: &RequestContext, request: &RequestFactory) -> HandlerOutcome {
        let phone = ctx.param_or("phone", "");
        if phone.is_empty() {
            return Err(HandlerFailure::with_body(
                400,
                json!({ "code": 400, "msg": "phone is required" }),
            ));
        }

        let payload = json!({
            "phone": phone,
            "countrycode": ctx.param_or("countrycode", "86"),
            "password": md5_hex(ctx.param_or("password", "")),
            "rememberLogin": "true",
        });
        let data = encrypt_envelope(&payload).map_err(|e| {
            tracing::error!(error = %e, "login envelope encryption failed");
            HandlerFailure::masked(500)
        })?;

        let response = request
            .send(
                OutboundRequest::post("/weapi/login/cellphone", data)
                    .with_cookies(ctx.cookies.clone()),
            )
            .await?;
        Ok(response.into())
    }
}

/// Wrap a payload in the upstream's AES + RSA envelope.
fn encrypt_envelope(payload: &Value) -> CryptoResult<Value> {
    let (params, password) = match aes_encrypt(payload, &CipherOptions::default())? {
        AesEncrypted::Keyed { hex, key } => (hex, key),
        AesEncrypted::Hex(_) => unreachable!("no caller key supplied"),
    };
    let enc_sec_key = rsa_encrypt(password.as_str(), DEFAULT_RSA_PUBLIC_KEY)?;

    Ok(json!({ "params": params, "encSecKey": enc_sec_key }))
}
