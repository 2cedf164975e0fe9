//! nky-tools - RSA key generation and nky key recovery
//!
//! This crate:
//! - Generates 2048-bit RSA key pairs through the openssl CLI
//! - Parses and validates nky decryption-key containers
//! - Recovers the RSA-OAEP wrapped key, and optionally the embedded private key
//!
//! No cryptographic primitive is implemented here; see [`crypto::CryptoProvider`].

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod keypair;
pub mod nky;
pub mod recover;

pub use error::{NkyError, Result};
