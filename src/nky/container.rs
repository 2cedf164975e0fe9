//! Parsing and validation of nky containers

use std::fs;
use std::ops::Range;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use super::{HEADER_LEN, IV_LEN, KEY_CIPHERTEXT_LEN, SAFEWORD};
use crate::error::{NkyError, Result};

/// Named byte range inside a decoded container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    KeyCiphertext,
    Safeword,
    Iv,
    PrivateKeyCiphertext,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::KeyCiphertext,
        Field::Safeword,
        Field::Iv,
        Field::PrivateKeyCiphertext,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::KeyCiphertext => "key_ciphertext",
            Field::Safeword => "safeword",
            Field::Iv => "iv",
            Field::PrivateKeyCiphertext => "private_key_ciphertext",
        }
    }
}

/// A decoded nky container whose safeword has been checked
///
/// Holds the whole decoded buffer; fields are views into it.
#[derive(Clone, PartialEq, Eq)]
pub struct NkyContainer {
    data: Vec<u8>,
}

impl NkyContainer {
    /// Read a base64 container from disk
    pub fn open(path: &Path) -> Result<Self> {
        let encoded = fs::read(path).map_err(|e| NkyError::on_read(path, e))?;
        debug!(path = %path.display(), encoded_len = encoded.len(), "read nky file");
        Self::from_base64(&encoded)
    }

    /// Decode base64 text, ignoring line breaks and other ASCII whitespace
    pub fn from_base64(encoded: &[u8]) -> Result<Self> {
        let compact: Vec<u8> = encoded
            .iter()
            .copied()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();

        let decoded = STANDARD.decode(&compact).map_err(|e| {
            NkyError::CorruptedContainer(format!("Container is not valid base64: {}", e))
        })?;

        Self::from_bytes(decoded)
    }

    /// Validate an already decoded buffer
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let safeword_end = KEY_CIPHERTEXT_LEN + SAFEWORD.len();

        if data.len() < safeword_end {
            return Err(NkyError::CorruptedContainer(format!(
                "Safeword is missing: container has {} bytes, needs at least {}. Probably corrupted key.",
                data.len(),
                safeword_end
            )));
        }

        if &data[KEY_CIPHERTEXT_LEN..safeword_end] != SAFEWORD {
            return Err(NkyError::CorruptedContainer(
                "Safeword does not match. Probably corrupted key.".into(),
            ));
        }

        if data.len() < HEADER_LEN {
            return Err(NkyError::CorruptedContainer(format!(
                "IV is truncated: container has {} bytes, expected at least {}",
                data.len(),
                HEADER_LEN
            )));
        }

        Ok(Self { data })
    }

    /// Byte range of a field within the decoded buffer
    pub fn range(&self, field: Field) -> Range<usize> {
        let safeword_end = KEY_CIPHERTEXT_LEN + SAFEWORD.len();
        match field {
            Field::KeyCiphertext => 0..KEY_CIPHERTEXT_LEN,
            Field::Safeword => KEY_CIPHERTEXT_LEN..safeword_end,
            Field::Iv => safeword_end..safeword_end + IV_LEN,
            Field::PrivateKeyCiphertext => HEADER_LEN..self.data.len(),
        }
    }

    pub fn field(&self, field: Field) -> &[u8] {
        &self.data[self.range(field)]
    }

    pub fn key_ciphertext(&self) -> &[u8] {
        self.field(Field::KeyCiphertext)
    }

    pub fn safeword(&self) -> &[u8] {
        self.field(Field::Safeword)
    }

    pub fn iv(&self) -> &[u8] {
        self.field(Field::Iv)
    }

    pub fn private_key_ciphertext(&self) -> &[u8] {
        self.field(Field::PrivateKeyCiphertext)
    }

    /// Total decoded length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// Container bytes include wrapped key material, keep them out of Debug output
impl std::fmt::Debug for NkyContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NkyContainer")
            .field("len", &self.data.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}
