//! [`Aes256Key`]: a fixed-size 256-bit AES key.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// A 256-bit AES key.
///
/// The length is fixed by the type. Key material is overwritten with zeroes
/// when the value is dropped and never appears in `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Aes256Key([u8; KEY_LEN]);

impl Aes256Key {
    /// Generate a new key from the OS CSPRNG.
    ///
    /// # Panics
    ///
    /// Panics if the OS random source fails. There is no safe fallback for a
    /// missing entropy source; use [`Aes256Key::try_generate`] to handle it.
    pub fn generate() -> Self {
        match Self::try_generate() {
            Ok(key) => key,
            Err(e) => panic!("cannot generate AES-256 key: {e}"),
        }
    }

    /// Generate a new key from the OS CSPRNG.
    ///
    /// An all-zero draw is discarded and redrawn, so the zero key is never
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::RandomnessUnavailable`] if the OS random source fails.
    pub fn try_generate() -> CryptoResult<Self> {
        let mut key = Self([0u8; KEY_LEN]);
        while key.is_zero() {
            OsRng
                .try_fill_bytes(&mut key.0)
                .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))?;
        }
        Ok(key)
    }

    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Decode a key from standard (padded) base64.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidEncoding`] if `encoded` is empty or not
    /// valid base64, and [`CryptoError::InvalidKeyLength`] if it does not
    /// decode to exactly [`KEY_LEN`] bytes.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        if encoded.is_empty() {
            return Err(CryptoError::InvalidEncoding("empty key string".into()));
        }

        let mut decoded = STANDARD.decode(encoded)?;
        if decoded.len() != KEY_LEN {
            let got = decoded.len();
            decoded.zeroize();
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_LEN,
                got,
            });
        }

        let mut key = Self([0u8; KEY_LEN]);
        key.0.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(key)
    }

    /// Encode the key as standard base64 (44 characters).
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    fn is_zero(&self) -> bool {
        bool::from(self.0.as_slice().ct_eq(&[0u8; KEY_LEN]))
    }
}

impl PartialEq for Aes256Key {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.0.as_slice().ct_eq(other.0.as_slice()))
    }
}

impl Eq for Aes256Key {}

impl std::fmt::Debug for Aes256Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Aes256Key([REDACTED])")
    }
}

/// Encode an optional key; an absent key encodes to the empty string.
pub fn optional_to_base64(key: Option<&Aes256Key>) -> String {
    key.map(Aes256Key::to_base64).unwrap_or_default()
}

/// Constant-time comparison of two optional keys.
///
/// An absent key compares as zero-length, so two absent keys are equal and an
/// absent key never equals a present one.
pub fn keys_equal(a: Option<&Aes256Key>, b: Option<&Aes256Key>) -> bool {
    let a = a.map(|k| k.0.as_slice()).unwrap_or(&[]);
    let b = b.map(|k| k.0.as_slice()).unwrap_or(&[]);
    bool::from(a.ct_eq(b))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const FIXED_KEY: [u8; KEY_LEN] = [
        144, 219, 85, 9, 191, 207, 189, 121, 11, 162, 77, 82, 15, 129, 176, 78, 102, 55, 120, 13,
        173, 171, 130, 177, 247, 157, 53, 121, 113, 69, 189, 25,
    ];
    pub(crate) const FIXED_KEY_BASE64: &str = "kNtVCb/PvXkLok1SD4GwTmY3eA2tq4Kx9501eXFFvRk=";

    #[test]
    fn generated_keys_are_distinct_and_non_zero() {
        let k1 = Aes256Key::generate();
        let k2 = Aes256Key::generate();
        assert_ne!(k1, k2);
        assert_ne!(k1, Aes256Key::from_bytes([0u8; KEY_LEN]));
        assert!(!k1.is_zero());
    }

    #[test]
    fn from_base64_decodes_fixed_key() {
        let key = Aes256Key::from_base64(FIXED_KEY_BASE64).unwrap();
        assert_eq!(key.as_bytes(), &FIXED_KEY);
    }

    #[test]
    fn to_base64_encodes_fixed_key() {
        let key = Aes256Key::from_bytes(FIXED_KEY);
        let encoded = key.to_base64();
        assert_eq!(encoded, FIXED_KEY_BASE64);
        assert_eq!(encoded.len(), 44);
        assert_eq!(STANDARD.decode(&encoded).unwrap(), FIXED_KEY);
    }

    #[test]
    fn base64_round_trip() {
        let key = Aes256Key::generate();
        let decoded = Aes256Key::from_base64(&key.to_base64()).unwrap();
        assert_eq!(key, decoded);
    }

    #[test]
    fn empty_string_rejected() {
        assert!(matches!(
            Aes256Key::from_base64(""),
            Err(CryptoError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn bad_base64_rejected() {
        assert!(matches!(
            Aes256Key::from_base64("bad base64 String"),
            Err(CryptoError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn short_key_rejected() {
        let short = STANDARD.encode(&FIXED_KEY[..13]);
        assert!(matches!(
            Aes256Key::from_base64(&short),
            Err(CryptoError::InvalidKeyLength {
                expected: KEY_LEN,
                got: 13
            })
        ));
    }

    #[test]
    fn long_key_rejected() {
        let long = STANDARD.encode([7u8; KEY_LEN + 1]);
        assert!(matches!(
            Aes256Key::from_base64(&long),
            Err(CryptoError::InvalidKeyLength { got: 33, .. })
        ));
    }

    #[test]
    fn absent_key_encodes_to_empty_string() {
        assert_eq!(optional_to_base64(None), "");
        let key = Aes256Key::from_bytes(FIXED_KEY);
        assert_eq!(optional_to_base64(Some(&key)), FIXED_KEY_BASE64);
    }

    #[test]
    fn keys_equal_semantics() {
        let k1 = Aes256Key::generate();
        let k2 = Aes256Key::generate();
        let zero = Aes256Key::from_bytes([0u8; KEY_LEN]);

        assert!(keys_equal(Some(&k1), Some(&k1)));
        assert!(keys_equal(Some(&k1), Some(&k1.clone())));
        assert!(!keys_equal(Some(&k1), Some(&k2)));
        assert!(!keys_equal(Some(&k1), Some(&zero)));
        assert!(keys_equal(Some(&zero), Some(&zero)));
        assert!(keys_equal(None, None));
        assert!(!keys_equal(None, Some(&k1)));
        assert!(!keys_equal(Some(&zero), None));
    }

    #[test]
    fn debug_is_redacted() {
        let key = Aes256Key::from_bytes(FIXED_KEY);
        let out = format!("{key:?}");
        assert!(out.contains("REDACTED"));
        assert!(!out.contains("144"));
    }
}
