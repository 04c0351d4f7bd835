//! AES-256-CBC with the upstream's two key-derivation policies.
//!
//! # Responsibilities
//! - Encrypt with an explicit 32-byte key and 16-byte iv
//! - Encrypt with a password-derived key/iv, generating a throwaway
//!   password when the caller supplies none
//! - Decrypt hex ciphertext back into JSON or raw text
//!
//! # Design Decisions
//! - Derivation: working key = MD5 hex of the password (exactly 32 chars),
//!   iv = the last 16 chars of that key
//! - Pkcs7 block padding on both sides
//! - Decrypt returns a tagged value instead of a silently-ambiguous string

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::Rng;
use serde_json::Value;

use crate::crypto::digest::{md5_hex, Payload};
use crate::crypto::error::{CryptoError, CryptoResult};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;
const PASSWORD_LEN: usize = 16;
const PASSWORD_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Key material for [`aes_encrypt`].
#[derive(Debug, Clone, Default)]
pub struct CipherOptions {
    /// With `iv` set, the verbatim 32-byte key; alone, a password to derive
    /// the key and iv from.
    pub key: Option<String>,
    /// Verbatim 16-byte iv. Ignored unless `key` is also set.
    pub iv: Option<String>,
}

impl CipherOptions {
    /// Explicit key + iv, used verbatim.
    pub fn with_key_iv(key: impl Into<String>, iv: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            iv: Some(iv.into()),
        }
    }

    /// Password mode: key and iv are derived from the password digest.
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            key: Some(password.into()),
            iv: None,
        }
    }
}

/// Ciphertext, plus the derivation secret when it was generated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AesEncrypted {
    /// The caller supplied key material; only the hex ciphertext comes back.
    Hex(String),
    /// A password was generated; it is returned so the ciphertext can be
    /// decrypted again.
    Keyed { hex: String, key: String },
}

impl AesEncrypted {
    /// The hex ciphertext regardless of variant.
    pub fn hex(&self) -> &str {
        match self {
            AesEncrypted::Hex(hex) => hex,
            AesEncrypted::Keyed { hex, .. } => hex,
        }
    }
}

/// Outcome of [`aes_decrypt`]: plaintext that parsed as JSON, or raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum Decrypted {
    Json(Value),
    Text(String),
}

/// Derive the working key and iv from a password string.
fn derive_key_iv(password: &str) -> (String, String) {
    let key = md5_hex(password);
    let iv = key[key.len() - IV_LEN..].to_string();
    (key, iv)
}

fn random_password() -> String {
    let mut rng = rand::thread_rng();
    (0..PASSWORD_LEN)
        .map(|_| PASSWORD_CHARSET[rng.gen_range(0..PASSWORD_CHARSET.len())] as char)
        .collect()
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> CryptoResult<()> {
    if expected != actual {
        return Err(CryptoError::InvalidKeyLength {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Encrypt `data` with AES-256-CBC and hex-encode the ciphertext.
///
/// Key resolution follows [`CipherOptions`]: explicit key + iv are used
/// verbatim; a key without an iv is treated as a password; with no key at
/// all a random 16-character lowercase password is generated and returned
/// in [`AesEncrypted::Keyed`] so the result can be decrypted later.
pub fn aes_encrypt<'a>(
    data: impl Into<Payload<'a>>,
    opt: &CipherOptions,
) -> CryptoResult<AesEncrypted> {
    let plain = data.into().canonical_bytes();

    let (key, iv, generated) = match (&opt.key, &opt.iv) {
        (Some(key), Some(iv)) => (key.clone(), iv.clone(), None),
        (Some(password), None) => {
            let (key, iv) = derive_key_iv(password);
            (key, iv, None)
        }
        (None, _) => {
            // An iv without a key is ignored; the derived iv wins.
            let password = random_password();
            let (key, iv) = derive_key_iv(&password);
            (key, iv, Some(password))
        }
    };
    check_len("key", KEY_LEN, key.len())?;
    check_len("iv", IV_LEN, iv.len())?;

    let cipher = Aes256CbcEnc::new_from_slices(key.as_bytes(), iv.as_bytes())
        .expect("key and iv lengths checked above");
    let hex = hex::encode(cipher.encrypt_padded_vec_mut::<Pkcs7>(&plain));

    Ok(match generated {
        Some(key) => AesEncrypted::Keyed { hex, key },
        None => AesEncrypted::Hex(hex),
    })
}

/// Decrypt hex-encoded AES-256-CBC ciphertext.
///
/// With no `iv`, `key` is a password and the working key/iv are derived the
/// same way as on the encrypt side.
pub fn aes_decrypt(hex_data: &str, key: &str, iv: Option<&str>) -> CryptoResult<Decrypted> {
    let (key, iv) = match iv {
        Some(iv) => (key.to_string(), iv.to_string()),
        None => derive_key_iv(key),
    };
    check_len("key", KEY_LEN, key.len())?;
    check_len("iv", IV_LEN, iv.len())?;

    let data = hex::decode(hex_data)?;
    if data.is_empty() || data.len() % 16 != 0 {
        return Err(CryptoError::Decryption);
    }

    let cipher = Aes256CbcDec::new_from_slices(key.as_bytes(), iv.as_bytes())
        .expect("key and iv lengths checked above");
    let plain = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(&data)
        .map_err(|_| CryptoError::Decryption)?;

    let text = String::from_utf8_lossy(&plain);
    Ok(match serde_json::from_str::<Value>(&text) {
        Ok(value) => Decrypted::Json(value),
        Err(_) => Decrypted::Text(text.into_owned()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEY: &str = "0123456789abcdef0123456789abcdef";
    const IV: &str = "0123456789abcdef";

    #[test]
    fn test_explicit_round_trip() {
        let opt = CipherOptions::with_key_iv(KEY, IV);
        let encrypted = aes_encrypt("plain text", &opt).unwrap();
        let AesEncrypted::Hex(hex) = &encrypted else {
            panic!("explicit mode must return the plain hex shape");
        };
        assert_eq!(
            aes_decrypt(hex, KEY, Some(IV)).unwrap(),
            Decrypted::Text("plain text".into())
        );
    }

    #[test]
    fn test_structured_round_trip() {
        let value = json!({ "ids": [1, 2, 3], "br": 999000 });
        let opt = CipherOptions::with_key_iv(KEY, IV);
        let encrypted = aes_encrypt(&value, &opt).unwrap();
        assert_eq!(
            aes_decrypt(encrypted.hex(), KEY, Some(IV)).unwrap(),
            Decrypted::Json(value)
        );
    }

    #[test]
    fn test_password_mode_returns_hex_shape() {
        let opt = CipherOptions::with_password("secret");
        let encrypted = aes_encrypt("data", &opt).unwrap();
        // Caller supplied the password, so the derivation secret is not
        // echoed back.
        assert!(matches!(encrypted, AesEncrypted::Hex(_)));
        assert_eq!(
            aes_decrypt(encrypted.hex(), "secret", None).unwrap(),
            Decrypted::Text("data".into())
        );
    }

    #[test]
    fn test_generated_password_round_trip() {
        let encrypted = aes_encrypt("data", &CipherOptions::default()).unwrap();
        let AesEncrypted::Keyed { hex, key } = &encrypted else {
            panic!("generated mode must return the derivation secret");
        };
        assert_eq!(key.len(), 16);
        assert!(key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        assert_eq!(
            aes_decrypt(hex, key, None).unwrap(),
            Decrypted::Text("data".into())
        );
    }

    #[test]
    fn test_supplied_iv_without_key_is_ignored() {
        let opt = CipherOptions {
            key: None,
            iv: Some(IV.into()),
        };
        let encrypted = aes_encrypt("data", &opt).unwrap();
        assert!(matches!(encrypted, AesEncrypted::Keyed { .. }));
    }

    #[test]
    fn test_derivation_matches_digest() {
        let (key, iv) = derive_key_iv("secret");
        assert_eq!(key, md5_hex("secret"));
        assert_eq!(iv, key[16..]);
    }

    #[test]
    fn test_wrong_key_does_not_recover_plaintext() {
        let opt = CipherOptions::with_password("right");
        let encrypted = aes_encrypt("plain text", &opt).unwrap();
        match aes_decrypt(encrypted.hex(), "wrong", None) {
            Err(CryptoError::Decryption) => {}
            Err(other) => panic!("unexpected error: {other}"),
            Ok(Decrypted::Text(text)) => assert_ne!(text, "plain text"),
            Ok(Decrypted::Json(value)) => assert_ne!(value, json!("plain text")),
        }
    }

    #[test]
    fn test_malformed_hex_rejected() {
        assert!(matches!(
            aes_decrypt("not hex!", KEY, Some(IV)),
            Err(CryptoError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_truncated_ciphertext_rejected() {
        let opt = CipherOptions::with_key_iv(KEY, IV);
        let encrypted = aes_encrypt("plain text", &opt).unwrap();
        // Drop one hex pair so the ciphertext is no longer block-aligned.
        let truncated = &encrypted.hex()[..encrypted.hex().len() - 2];
        assert!(matches!(
            aes_decrypt(truncated, KEY, Some(IV)),
            Err(CryptoError::Decryption)
        ));
    }

    #[test]
    fn test_bad_explicit_key_length() {
        let opt = CipherOptions::with_key_iv("short", IV);
        assert!(matches!(
            aes_encrypt("data", &opt),
            Err(CryptoError::InvalidKeyLength { field: "key", .. })
        ));
    }

    #[test]
    fn test_empty_plaintext_round_trip() {
        let opt = CipherOptions::with_key_iv(KEY, IV);
        let encrypted = aes_encrypt("", &opt).unwrap();
        assert_eq!(
            aes_decrypt(encrypted.hex(), KEY, Some(IV)).unwrap(),
            Decrypted::Text(String::new())
        );
    }

    #[test]
    fn test_numeric_plaintext_parses_as_json() {
        let opt = CipherOptions::with_key_iv(KEY, IV);
        let encrypted = aes_encrypt("12345", &opt).unwrap();
        assert_eq!(
            aes_decrypt(encrypted.hex(), KEY, Some(IV)).unwrap(),
            Decrypted::Json(json!(12345))
        );
    }
}
