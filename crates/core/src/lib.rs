//! AES-256-GCM authenticated encryption with text-safe output.
//!
//! # Sealed blob format
//!
//! ```text
//! offset 0..12    nonce (random, fresh per encryption)
//! offset 12..N-16 ciphertext (same length as the plaintext)
//! offset N-16..N  GCM authentication tag
//! ```
//!
//! The text form of a blob is standard base64 with padding. No associated
//! data is authenticated.
//!
//! # Example
//!
//! ```rust
//! use aes_seal_core::{decrypt_from_text, encrypt_to_text, Aes256Key};
//!
//! let key = Aes256Key::generate();
//! let sealed = encrypt_to_text("test", &key).unwrap();
//! assert_eq!(decrypt_from_text(&sealed, &key).unwrap(), "test");
//! ```

pub mod cipher;
pub mod error;
pub mod key;
pub mod text;

pub use cipher::{decrypt, encrypt, SealedBlob};
pub use error::{CryptoError, CryptoResult};
pub use key::{keys_equal, optional_to_base64, Aes256Key, KEY_LEN};
pub use text::{decrypt_from_text, encrypt_to_text};
