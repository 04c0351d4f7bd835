//! Fixed-block RSA encryption for the upstream handshake.
//!
//! The upstream expects a 128-byte plaintext block encrypted with no padding
//! scheme; the zero right-padding applied here IS the padding. Standard
//! PKCS1 padding would change the wire format and break compatibility.

use rsa::hazmat::rsa_encrypt as raw_encrypt;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};

use crate::crypto::digest::Payload;
use crate::crypto::error::{CryptoError, CryptoResult};

/// Width of the zero-padded plaintext block.
pub const RSA_BLOCK_LEN: usize = 128;

/// Public key the upstream publishes for its envelope handshake.
///
/// Passed explicitly by callers; there is no hidden default inside
/// [`rsa_encrypt`] so every use of this key is auditable at the call site.
// Same key bytes as the original's embedded PEM, re-wrapped at 64 columns:
// the strict RFC 7468 parser behind `from_public_key_pem` rejects the
// original's single-line base64 body.
pub const DEFAULT_RSA_PUBLIC_KEY: &str = "-----BEGIN PUBLIC KEY-----\nMIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQKBgQDIAG7QOELSYoIJvTFJhMpe1s/g\nbjDJX51HBNnEl5HXqTW6lQ7LC8jr9fWZTwusknp+sVGzwd40MwP6U5yDE27M/X1+\nUR4tvOGOqp94TJtQ1EPnWGWXngpeIW5GxoQGao1rmYWAu6oi1z9XkChrsUdC6DJE\n5E221wf/4WLFxwAtRQIDAQAB\n-----END PUBLIC KEY-----";

/// Encrypt `data` against the given SPKI PEM public key with no padding
/// scheme, after zero right-padding the plaintext to [`RSA_BLOCK_LEN`].
///
/// Payloads longer than the block fail with
/// [`CryptoError::PayloadTooLarge`]. The hex output is always the modulus
/// size in length.
pub fn rsa_encrypt<'a>(data: impl Into<Payload<'a>>, public_key_pem: &str) -> CryptoResult<String> {
    let plain = data.into().canonical_bytes();
    if plain.len() > RSA_BLOCK_LEN {
        return Err(CryptoError::PayloadTooLarge {
            len: plain.len(),
            max: RSA_BLOCK_LEN,
        });
    }

    let key = RsaPublicKey::from_public_key_pem(public_key_pem)
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

    let mut block = [0u8; RSA_BLOCK_LEN];
    block[..plain.len()].copy_from_slice(&plain);

    let cipher = raw_encrypt(&key, &BigUint::from_bytes_be(&block))
        .map_err(|e| CryptoError::Rsa(e.to_string()))?;

    // Left-pad to the modulus width; Node's publicEncrypt always yields a
    // modulus-sized buffer and downstream parsers rely on that.
    let bytes = cipher.to_bytes_be();
    let size = key.size();
    let mut out = vec![0u8; size.saturating_sub(bytes.len())];
    out.extend_from_slice(&bytes);
    Ok(hex::encode(out))
}
