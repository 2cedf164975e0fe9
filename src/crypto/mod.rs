//! Cryptographic operations for nky-tools
//!
//! Nothing here implements a primitive. RSA and AES live behind
//! [`CryptoProvider`], whose production implementation drives the
//! `openssl` command-line tool. Tests substitute a stub.

mod openssl;
mod secure_bytes;
#[cfg(test)]
pub(crate) mod stub;

use std::path::Path;

pub use openssl::OpensslCli;
pub use secure_bytes::SecureBytes;

use crate::error::Result;

/// RSA modulus size for generated key pairs
pub const RSA_KEY_BITS: u32 = 2048;

/// AES-256 key length taken from the recovered OAEP plaintext
pub const AES_KEY_LEN: usize = 32;

/// Narrow capability set used by key generation and recovery
pub trait CryptoProvider {
    /// Generate an RSA private key, PEM encoded
    fn generate_private_key(&self, bits: u32) -> Result<SecureBytes>;

    /// Derive the PEM public key for a PEM private key
    fn derive_public_key(&self, private_key_pem: &[u8]) -> Result<Vec<u8>>;

    /// RSA-OAEP decrypt `ciphertext` with the private key stored at `private_key`
    fn decrypt_oaep(&self, ciphertext: &[u8], private_key: &Path) -> Result<SecureBytes>;

    /// RSA-OAEP encrypt `plaintext` with the public key stored at `public_key`
    fn encrypt_oaep(&self, plaintext: &[u8], public_key: &Path) -> Result<Vec<u8>>;

    /// AES-256-CBC decrypt with PKCS#7 padding
    fn decrypt_aes_256_cbc(&self, key: &[u8], iv: &[u8], ciphertext: &[u8])
        -> Result<SecureBytes>;
}
