//! Key loading and the encrypt/decrypt runners behind each binary.

use aes_seal_core::{Aes256Key, SealedBlob};
use anyhow::{Context, Result};
use tracing::debug;

use crate::config::Settings;

/// Direction of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encrypt,
    Decrypt,
}

/// A new random key, base64-encoded.
pub fn generate_key() -> String {
    Aes256Key::generate().to_base64()
}

/// Resolve the key from the `-k` flag, falling back to `SEAL_KEY`.
///
/// # Errors
///
/// Returns an error if neither source holds a key or the key does not decode
/// to 32 bytes.
pub fn load_key(arg: Option<&str>, settings: &Settings) -> Result<Aes256Key> {
    let encoded = arg
        .or(settings.key.as_deref())
        .filter(|k| !k.is_empty())
        .context("no key provided: pass -k <key> or set SEAL_KEY")?;

    Aes256Key::from_base64(encoded).context("Error loading the base64-encoded AES-256 key")
}

/// Encrypt or decrypt raw bytes.
pub fn run_bytes(mode: Mode, data: &[u8], key: &Aes256Key) -> Result<Vec<u8>> {
    debug!(?mode, input_len = data.len(), "transforming bytes");
    match mode {
        Mode::Encrypt => aes_seal_core::encrypt(data, key)
            .map(SealedBlob::into_vec)
            .context("Error encrypting"),
        Mode::Decrypt => aes_seal_core::decrypt(data, key).context("Error decrypting"),
    }
}

/// Encrypt a string to base64 text, or decrypt base64 text to a string.
pub fn run_text(mode: Mode, text: &str, key: &Aes256Key) -> Result<String> {
    debug!(?mode, input_len = text.len(), "transforming text");
    match mode {
        Mode::Encrypt => aes_seal_core::encrypt_to_text(text, key).context("Error encrypting"),
        Mode::Decrypt => aes_seal_core::decrypt_from_text(text, key).context("Error decrypting"),
    }
}
