//! Error type shared by the key, cipher, and text layers.

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors produced by the key, cipher, and text layers.
///
/// Only [`CryptoError::RandomnessUnavailable`] indicates a broken environment;
/// every other variant is an ordinary, recoverable result of bad input.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// An encrypt or decrypt call was made without a key.
    #[error("no key provided")]
    MissingKey,

    /// The input was empty or is not valid standard base64.
    #[error("invalid base64 encoding: {0}")]
    InvalidEncoding(String),

    /// Decoded key material is not exactly [`KEY_LEN`](crate::key::KEY_LEN) bytes.
    #[error("expected key length to be {expected} bytes, was {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    /// The sealed blob is too short to hold a nonce and a tag.
    #[error("malformed ciphertext: {len} bytes is shorter than nonce + tag")]
    MalformedCiphertext { len: usize },

    /// The authentication tag did not verify.
    ///
    /// Covers both a wrong key and a tampered blob; the two are deliberately
    /// indistinguishable.
    #[error("message authentication failed (wrong key or tampered ciphertext)")]
    AuthenticationFailed,

    /// Decrypted bytes are not valid UTF-8 (text layer only).
    #[error("decrypted data is not valid UTF-8: {0}")]
    InvalidUtf8(#[source] std::str::Utf8Error),

    /// The OS random source failed while drawing a key or nonce.
    #[error("secure random source unavailable: {0}")]
    RandomnessUnavailable(String),

    /// The AEAD rejected the plaintext (beyond the GCM length limit).
    #[error("aead seal operation failed")]
    EncryptionFailed,
}

impl From<base64::DecodeError> for CryptoError {
    fn from(e: base64::DecodeError) -> Self {
        CryptoError::InvalidEncoding(e.to_string())
    }
}
