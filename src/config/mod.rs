//! Configuration for nky-tools
//!
//! Lookup order, later wins:
//! - built-in defaults
//! - `nky-tools.json` next to the executable, or the file given by `--config`
//! - `NKY_OPENSSL` environment variable
//! - command-line flags (applied by the caller)

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NkyError, Result};
use crate::keypair::KeyNames;

pub const CONFIG_FILE: &str = "nky-tools.json";
pub const OPENSSL_ENV: &str = "NKY_OPENSSL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Path or name of the openssl binary
    pub openssl: PathBuf,
    /// Dump container fields and tool invocations
    pub verbose: bool,
    /// Default file naming for `keygen`
    pub key_names: KeyNames,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openssl: PathBuf::from("openssl"),
            verbose: false,
            key_names: KeyNames::default(),
        }
    }
}

impl Settings {
    /// Load settings from `explicit` if given, else from the executable's directory
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let settings = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = get_exe_dir()?.join(CONFIG_FILE);
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        settings.with_openssl_override(std::env::var_os(OPENSSL_ENV))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| NkyError::on_read(path, e))?;
        let settings: Settings = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), "loaded configuration");
        settings.validate()
    }

    /// Replace the openssl program when an override is present and non-empty
    pub fn with_openssl_override(mut self, value: Option<OsString>) -> Result<Self> {
        if let Some(value) = value {
            if !value.is_empty() {
                self.openssl = PathBuf::from(value);
            }
        }
        self.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.openssl.as_os_str().is_empty() {
            return Err(NkyError::InvalidConfig("'openssl' must not be empty".into()));
        }
        Ok(self)
    }
}

/// Directory that holds the running executable
pub fn get_exe_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()?;

    exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| NkyError::InvalidConfig("could not determine executable directory".into()))
}
