//! AES-256-GCM encryption and decryption of raw byte buffers.
//!
//! **Nonce handling:** every [`encrypt`] call draws a fresh 96-bit nonce from
//! the OS CSPRNG. GCM nonce reuse under one key is catastrophic: it breaks both
//! confidentiality and authentication. Never derive the nonce from the input.

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{CryptoError, CryptoResult};
use crate::key::Aes256Key;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of a GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Smallest possible sealed blob: a nonce and a tag around an empty plaintext.
pub const MIN_SEALED_LEN: usize = NONCE_LEN + TAG_LEN;

/// Output of [`encrypt`]: `nonce || ciphertext || tag`.
#[derive(Clone, PartialEq, Eq)]
pub struct SealedBlob(Vec<u8>);

impl SealedBlob {
    /// Wrap bytes received from elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedCiphertext`] if `bytes` is shorter than
    /// [`MIN_SEALED_LEN`].
    pub fn from_vec(bytes: Vec<u8>) -> CryptoResult<Self> {
        if bytes.len() < MIN_SEALED_LEN {
            return Err(CryptoError::MalformedCiphertext { len: bytes.len() });
        }
        Ok(Self(bytes))
    }

    /// Decode the text form produced by [`SealedBlob::to_base64`].
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidEncoding`] on malformed base64 and
    /// [`CryptoError::MalformedCiphertext`] if the decoded blob is too short.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        Self::from_vec(STANDARD.decode(encoded)?)
    }

    /// Standard (padded) base64 of the whole blob.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// The 12-byte nonce prefix.
    pub fn nonce(&self) -> &[u8] {
        &self.0[..NONCE_LEN]
    }

    /// Ciphertext followed by the authentication tag.
    pub fn sealed_payload(&self) -> &[u8] {
        &self.0[NONCE_LEN..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: a blob holds at least a nonce and a tag.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for SealedBlob {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<SealedBlob> for Vec<u8> {
    fn from(blob: SealedBlob) -> Self {
        blob.0
    }
}

impl std::fmt::Debug for SealedBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedBlob").field("len", &self.0.len()).finish()
    }
}

/// Encrypt `plaintext` under `key` with AES-256-GCM and no associated data.
///
/// # Errors
///
/// Returns [`CryptoError::MissingKey`] if `key` is `None`,
/// [`CryptoError::RandomnessUnavailable`] if no nonce can be drawn, and
/// [`CryptoError::EncryptionFailed`] if the AEAD rejects the plaintext.
pub fn encrypt<'k>(
    plaintext: &[u8],
    key: impl Into<Option<&'k Aes256Key>>,
) -> CryptoResult<SealedBlob> {
    let cipher = build_cipher(key.into())?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);
    Ok(SealedBlob(sealed))
}

/// Decrypt a sealed blob produced by [`encrypt`].
///
/// # Errors
///
/// Returns [`CryptoError::MissingKey`] if `key` is `None`,
/// [`CryptoError::MalformedCiphertext`] if `blob` is shorter than
/// [`MIN_SEALED_LEN`], and [`CryptoError::AuthenticationFailed`] if the tag
/// does not verify (wrong key or tampered data).
pub fn decrypt<'k>(blob: &[u8], key: impl Into<Option<&'k Aes256Key>>) -> CryptoResult<Vec<u8>> {
    let cipher = build_cipher(key.into())?;

    if blob.len() < MIN_SEALED_LEN {
        return Err(CryptoError::MalformedCiphertext { len: blob.len() });
    }

    let (nonce, sealed) = blob.split_at(NONCE_LEN);
    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| CryptoError::AuthenticationFailed)
}

fn build_cipher(key: Option<&Aes256Key>) -> CryptoResult<Aes256Gcm> {
    let key = key.ok_or(CryptoError::MissingKey)?;
    Ok(Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes())))
}
