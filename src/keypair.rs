//! RSA key-pair generation and pairing checks

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::crypto::{CryptoProvider, RSA_KEY_BITS};
use crate::error::{NkyError, Result};

/// Probe length for [`verify_key_pair`], fits comfortably in one OAEP block
const PROBE_LEN: usize = 32;

/// Output file naming for `keygen`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KeyNames {
    /// og_private.pem / og_public.pem
    #[default]
    #[serde(rename = "og")]
    #[value(name = "og")]
    Original,
    /// private.pem / public.pem
    Plain,
}

impl KeyNames {
    pub fn private_file(self) -> &'static str {
        match self {
            KeyNames::Original => "og_private.pem",
            KeyNames::Plain => "private.pem",
        }
    }

    pub fn public_file(self) -> &'static str {
        match self {
            KeyNames::Original => "og_public.pem",
            KeyNames::Plain => "public.pem",
        }
    }

    /// (private, public) paths inside `dir`
    pub fn paths_in(self, dir: &Path) -> (PathBuf, PathBuf) {
        (dir.join(self.private_file()), dir.join(self.public_file()))
    }
}

/// Create or truncate `path` and write `data` to it
fn write_key_file(path: &Path, data: &[u8], private: bool) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        if private {
            options.mode(0o600);
        }
    }

    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()?;

    // mode() only applies on creation, tighten pre-existing files too
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if private {
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
    }
    #[cfg(not(unix))]
    let _ = private;

    Ok(())
}

/// Generate a 2048-bit RSA key pair and write both halves as PEM
///
/// The public key is derived only after the private key is on disk.
/// Existing files are overwritten.
pub fn generate_key_pair<P>(provider: &P, private_path: &Path, public_path: &Path) -> Result<()>
where
    P: CryptoProvider + ?Sized,
{
    let private_pem = provider.generate_private_key(RSA_KEY_BITS)?;
    write_key_file(private_path, &private_pem, true)?;
    debug!(path = %private_path.display(), "wrote private key");

    let public_pem = provider.derive_public_key(&private_pem)?;
    write_key_file(public_path, &public_pem, false)?;
    debug!(path = %public_path.display(), "wrote public key");

    info!(bits = RSA_KEY_BITS, "generated RSA key pair");
    Ok(())
}

/// Check that `private_path` decrypts what `public_path` encrypts
pub fn verify_key_pair<P>(provider: &P, private_path: &Path, public_path: &Path) -> Result<()>
where
    P: CryptoProvider + ?Sized,
{
    for path in [private_path, public_path] {
        if !path.exists() {
            return Err(NkyError::NotFound(path.to_path_buf()));
        }
    }

    let mut probe = [0u8; PROBE_LEN];
    OsRng.fill_bytes(&mut probe);

    let ciphertext = provider.encrypt_oaep(&probe, public_path)?;
    let decrypted = provider.decrypt_oaep(&ciphertext, private_path)?;

    if *decrypted != probe[..] {
        return Err(NkyError::KeyPairMismatch);
    }

    debug!("key pair check passed");
    Ok(())
}
