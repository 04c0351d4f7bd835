//! Crypto envelope layer for the upstream's request-signing protocol.
//!
//! # Data Flow
//! ```text
//! handler payload (bytes / text / JSON value)
//!     → digest.rs (MD5/SHA1, canonical JSON text form)
//!     → aes.rs (AES-256-CBC, explicit or password-derived key/iv)
//!     → rsa.rs (fixed 128-byte block, no padding scheme)
//!     → hex on the wire
//! ```
//!
//! # Design Decisions
//! - Pure, stateless functions; safe for unlimited concurrent use
//! - Key derivation and block padding are pinned by round-trip tests;
//!   getting either wrong silently breaks every upstream call
//! - The embedded public key is a named constant callers pass explicitly

pub mod aes;
pub mod digest;
pub mod error;
pub mod rsa;

pub use aes::{aes_decrypt, aes_encrypt, AesEncrypted, CipherOptions, Decrypted};
pub use digest::{md5_hex, sha1_hex, Payload};
pub use error::{CryptoError, CryptoResult};
pub use rsa::{rsa_encrypt, DEFAULT_RSA_PUBLIC_KEY, RSA_BLOCK_LEN};
