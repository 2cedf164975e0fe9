use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NkyError>;

#[derive(Debug, Error)]
pub enum NkyError {
    #[error("File was not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{0}")]
    CorruptedContainer(String),

    #[error("'{tool}' could not be started. Is it installed and on PATH?")]
    ToolMissing { tool: String },

    #[error("'{tool} {step}' failed ({status}): {stderr}")]
    NonZeroExit {
        tool: String,
        step: String,
        status: String,
        stderr: String,
    },

    #[error("Key pair check failed: the private key does not match the public key")]
    KeyPairMismatch,

    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NkyError {
    /// Map an I/O error on an input path, keeping "not found" distinct
    pub fn on_read(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            NkyError::NotFound(path.into())
        } else {
            NkyError::Io(err)
        }
    }
}
