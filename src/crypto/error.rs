//! Error definitions for the crypto envelope layer.

use thiserror::Error;

/// Errors that can occur in the envelope primitives.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Ciphertext is not valid hex.
    #[error("ciphertext is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Explicit key or iv has the wrong byte length for AES-256-CBC.
    #[error("aes-256-cbc expects a {expected}-byte {field}, got {actual} bytes")]
    InvalidKeyLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Ciphertext/key/iv mismatch in the symmetric cipher.
    #[error("decryption failed: key/iv mismatch or corrupt ciphertext")]
    Decryption,

    /// RSA plaintext exceeds the fixed block width.
    #[error("rsa payload of {len} bytes exceeds the {max}-byte block")]
    PayloadTooLarge { len: usize, max: usize },

    /// The RSA public key could not be parsed.
    #[error("invalid rsa public key: {0}")]
    InvalidPublicKey(String),

    /// Raw RSA rejected the block (plaintext block not below the modulus).
    #[error("rsa rejected the plaintext block: {0}")]
    Rsa(String),
}

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CryptoError::PayloadTooLarge { len: 150, max: 128 };
        assert_eq!(
            err.to_string(),
            "rsa payload of 150 bytes exceeds the 128-byte block"
        );

        let err = CryptoError::InvalidKeyLength {
            field: "iv",
            expected: 16,
            actual: 8,
        };
        assert!(err.to_string().contains("16-byte iv"));
    }
}
