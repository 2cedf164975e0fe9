//! `openssl` command-line backend
//!
//! Each operation is a single process invocation. Input travels over stdin
//! except for the OAEP decryption, whose ciphertext is staged in a private
//! temporary directory that is removed when the call returns.

use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStdin, Command, Stdio};

use tracing::debug;

use super::{CryptoProvider, SecureBytes, AES_KEY_LEN};
use crate::error::{NkyError, Result};

const OAEP_PADDING: &str = "rsa_padding_mode:oaep";
const CIPHERTEXT_FILE: &str = "key_ciphertext.bin";

/// Drives the `openssl` binary
#[derive(Debug, Clone)]
pub struct OpensslCli {
    program: PathBuf,
    /// Parent of the per-call scratch directory; system temp dir when None
    scratch_root: Option<PathBuf>,
}

impl OpensslCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            scratch_root: None,
        }
    }

    /// Stage ciphertext under `root` instead of the system temp dir
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// `openssl version`, handy to probe that the tool is usable
    pub fn version(&self) -> Result<String> {
        let out = self.run("version", &[OsString::from("version")], None)?;
        Ok(String::from_utf8_lossy(&out).trim().to_string())
    }

    /// Run one openssl subcommand and return its stdout
    ///
    /// `step` names the operation in errors and logs. Arguments are never
    /// logged since some carry key material.
    fn run(&self, step: &str, args: &[OsString], stdin: Option<&[u8]>) -> Result<Vec<u8>> {
        debug!(tool = %self.program.display(), step, "invoking external tool");

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => NkyError::ToolMissing {
                    tool: self.program.display().to_string(),
                },
                _ => NkyError::Io(e),
            })?;

        // stdin is fed from its own thread while wait_with_output drains
        // stdout and stderr, otherwise large inputs fill both pipes
        let pipe = child.stdin.take();
        let (output, fed) = std::thread::scope(|scope| {
            let feeder = scope.spawn(move || feed_stdin(pipe, stdin.unwrap_or_default()));
            let output = child.wait_with_output();
            let fed = feeder.join().unwrap_or_else(|_| {
                Err(std::io::Error::new(ErrorKind::Other, "stdin writer panicked"))
            });
            (output, fed)
        });
        let output = output?;

        if !output.status.success() {
            return Err(NkyError::NonZeroExit {
                tool: self.program.display().to_string(),
                step: step.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // A zero exit after a short write still means truncated input
        fed?;

        debug!(step, stdout_len = output.stdout.len(), "external tool succeeded");
        Ok(output.stdout)
    }
}

impl Default for OpensslCli {
    fn default() -> Self {
        Self::new("openssl")
    }
}

/// Write `input` to the child's stdin and close it
///
/// An early exit of the child closes the pipe; that is reported through
/// its exit status and stderr, so `BrokenPipe` is not an error here.
fn feed_stdin(pipe: Option<ChildStdin>, input: &[u8]) -> std::io::Result<()> {
    let Some(mut pipe) = pipe else {
        return Ok(());
    };
    match pipe.write_all(input) {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

fn args<I, S>(items: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    items.into_iter().map(|s| s.as_ref().to_os_string()).collect()
}

/// Write `data` to a fresh owner-only file
fn write_private_file(path: &Path, data: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file: File = options.open(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}

impl CryptoProvider for OpensslCli {
    fn generate_private_key(&self, bits: u32) -> Result<SecureBytes> {
        let pem = self.run("genrsa", &args(["genrsa".to_string(), bits.to_string()]), None)?;
        Ok(SecureBytes::new(pem))
    }

    fn derive_public_key(&self, private_key_pem: &[u8]) -> Result<Vec<u8>> {
        self.run(
            "rsa -pubout",
            &args(["rsa", "-outform", "PEM", "-pubout"]),
            Some(private_key_pem),
        )
    }

    fn decrypt_oaep(&self, ciphertext: &[u8], private_key: &Path) -> Result<SecureBytes> {
        // tempfile creates the directory with 0700 on Unix
        let mut builder = tempfile::Builder::new();
        builder.prefix("nky-");
        let scratch = match &self.scratch_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        let ciphertext_path = scratch.path().join(CIPHERTEXT_FILE);
        write_private_file(&ciphertext_path, ciphertext)?;
        debug!(path = %ciphertext_path.display(), "staged key ciphertext");

        let mut argv = args(["pkeyutl", "-decrypt", "-inkey"]);
        argv.push(private_key.as_os_str().to_os_string());
        argv.extend(args(["-in"]));
        argv.push(ciphertext_path.as_os_str().to_os_string());
        argv.extend(args(["-pkeyopt", OAEP_PADDING]));

        let result = self.run("pkeyutl -decrypt", &argv, None);

        // Explicit close so removal errors surface; on early return Drop cleans up
        scratch.close()?;

        Ok(SecureBytes::new(result?))
    }

    fn encrypt_oaep(&self, plaintext: &[u8], public_key: &Path) -> Result<Vec<u8>> {
        let mut argv = args(["pkeyutl", "-encrypt", "-pubin", "-inkey"]);
        argv.push(public_key.as_os_str().to_os_string());
        argv.extend(args(["-pkeyopt", OAEP_PADDING]));

        self.run("pkeyutl -encrypt", &argv, Some(plaintext))
    }

    fn decrypt_aes_256_cbc(
        &self,
        key: &[u8],
        iv: &[u8],
        ciphertext: &[u8],
    ) -> Result<SecureBytes> {
        if key.len() != AES_KEY_LEN {
            return Err(NkyError::InvalidKeyMaterial(format!(
                "AES-256 key must be {} bytes, got {}",
                AES_KEY_LEN,
                key.len()
            )));
        }

        // TODO: openssl enc only takes a raw key via -K, which exposes it in the
        // process table; switch to a provider that accepts the key over a pipe.
        let argv = args([
            "enc".to_string(),
            "-d".to_string(),
            "-aes-256-cbc".to_string(),
            "-K".to_string(),
            hex::encode(key),
            "-iv".to_string(),
            hex::encode(iv),
        ]);

        let plaintext = self.run("enc -d -aes-256-cbc", &argv, Some(ciphertext))?;
        Ok(SecureBytes::new(plaintext))
    }
}
