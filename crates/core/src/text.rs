//! String convenience layer: UTF-8 text in, base64 sealed blobs out.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::Zeroize;

use crate::cipher;
use crate::error::{CryptoError, CryptoResult};
use crate::key::Aes256Key;

/// Encrypt a string and return the sealed blob as standard base64.
///
/// # Errors
///
/// Propagates every error of [`cipher::encrypt`] unchanged.
pub fn encrypt_to_text<'k>(
    plaintext: &str,
    key: impl Into<Option<&'k Aes256Key>>,
) -> CryptoResult<String> {
    let blob = cipher::encrypt(plaintext.as_bytes(), key)?;
    Ok(blob.to_base64())
}

/// Decode a base64 sealed blob (e.g. from [`encrypt_to_text`]), decrypt it,
/// and return the recovered string.
///
/// # Errors
///
/// Returns [`CryptoError::MissingKey`] if `key` is `None`,
/// [`CryptoError::InvalidEncoding`] if `text` is not valid base64,
/// any error of [`cipher::decrypt`], and [`CryptoError::InvalidUtf8`] if the
/// decrypted bytes are not UTF-8.
pub fn decrypt_from_text<'k>(
    text: &str,
    key: impl Into<Option<&'k Aes256Key>>,
) -> CryptoResult<String> {
    let key = key.into().ok_or(CryptoError::MissingKey)?;
    let blob = STANDARD.decode(text)?;
    let plaintext = cipher::decrypt(&blob, key)?;

    String::from_utf8(plaintext).map_err(|e| {
        let source = e.utf8_error();
        e.into_bytes().zeroize();
        CryptoError::InvalidUtf8(source)
    })
}
