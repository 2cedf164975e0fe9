//! The nky decryption-key container
//!
//! Fixed layout, base64 at rest:
//! [256 bytes: key ciphertext (RSA-OAEP)]
//! [3 bytes: safeword "H4k"]
//! [16 bytes: IV]
//! [N bytes: private key ciphertext]

mod container;

pub use container::{Field, NkyContainer};

/// Length of the RSA-OAEP wrapped key (2048-bit modulus)
pub const KEY_CIPHERTEXT_LEN: usize = 256;

/// Marker that follows the key ciphertext
pub const SAFEWORD: &[u8; 3] = b"H4k";

/// Block cipher IV length
pub const IV_LEN: usize = 16;

/// Offset of the first byte of the private key ciphertext
pub const HEADER_LEN: usize = KEY_CIPHERTEXT_LEN + SAFEWORD.len() + IV_LEN;
