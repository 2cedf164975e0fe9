//! Recovery of the wrapped key stored in an nky container

use std::path::Path;

use tracing::{debug, info};

use crate::crypto::{CryptoProvider, SecureBytes, AES_KEY_LEN};
use crate::error::{NkyError, Result};
use crate::nky::NkyContainer;

/// RSA-OAEP decrypt the container's key ciphertext with `private_key`
///
/// The container is already validated, so reaching this point means the
/// safeword matched.
pub fn recover_key<P>(provider: &P, container: &NkyContainer, private_key: &Path) -> Result<SecureBytes>
where
    P: CryptoProvider + ?Sized,
{
    if !private_key.exists() {
        return Err(NkyError::NotFound(private_key.to_path_buf()));
    }

    let key = provider.decrypt_oaep(container.key_ciphertext(), private_key)?;
    info!(recovered_len = key.len(), "recovered wrapped key");
    Ok(key)
}

/// Read, validate and decrypt an nky file in one go
pub fn recover_private_key<P>(provider: &P, nky_path: &Path, private_key: &Path) -> Result<SecureBytes>
where
    P: CryptoProvider + ?Sized,
{
    let container = NkyContainer::open(nky_path)?;
    recover_key(provider, &container, private_key)
}

/// Second stage: decrypt the embedded private key with the recovered key
///
/// The first 32 recovered bytes form the AES-256-CBC key, the container
/// IV is used as is.
pub fn unwrap_private_key<P>(
    provider: &P,
    container: &NkyContainer,
    recovered_key: &[u8],
) -> Result<SecureBytes>
where
    P: CryptoProvider + ?Sized,
{
    if recovered_key.len() < AES_KEY_LEN {
        return Err(NkyError::InvalidKeyMaterial(format!(
            "recovered key has {} bytes, AES-256 needs {}",
            recovered_key.len(),
            AES_KEY_LEN
        )));
    }

    if container.private_key_ciphertext().is_empty() {
        return Err(NkyError::CorruptedContainer(
            "Container holds no private key ciphertext".into(),
        ));
    }

    let pem = provider.decrypt_aes_256_cbc(
        &recovered_key[..AES_KEY_LEN],
        container.iv(),
        container.private_key_ciphertext(),
    )?;
    debug!(pem_len = pem.len(), "unwrapped embedded private key");
    Ok(pem)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use base64::{engine::general_purpose::STANDARD, Engine as _};

    use super::*;
    use crate::crypto::stub::{StubProvider, STUB_PRIVATE_PEM};

    fn sample() -> Vec<u8> {
        let mut data = vec![0x00u8; 256];
        data.extend_from_slice(b"H4k");
        data.extend_from_slice(&[0x01u8; 16]);
        data.extend_from_slice(b"CIPHERTEXT");
        data
    }

    /// Lays out an nky file and a key file in a scratch directory
    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new(decoded: &[u8]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::write(dir.path().join("decrypt_key.nky"), STANDARD.encode(decoded)).unwrap();
            fs::write(dir.path().join("og_private.pem"), STUB_PRIVATE_PEM).unwrap();
            Self { dir }
        }

        fn nky(&self) -> std::path::PathBuf {
            self.dir.path().join("decrypt_key.nky")
        }

        fn key(&self) -> std::path::PathBuf {
            self.dir.path().join("og_private.pem")
        }
    }

    #[test]
    fn test_recover_passes_key_ciphertext_to_provider() {
        let fixture = Fixture::new(&sample());
        let provider = StubProvider::default();

        let key = recover_private_key(&provider, &fixture.nky(), &fixture.key()).unwrap();

        // The stub echoes its input
        assert_eq!(&*key, &[0u8; 256][..]);
        assert_eq!(provider.calls(), vec!["decrypt_oaep"]);
    }

    #[test]
    fn test_safeword_mismatch_never_invokes_provider() {
        let mut data = sample();
        data[257] = 0x58;
        let fixture = Fixture::new(&data);
        let provider = StubProvider::default();

        let err = recover_private_key(&provider, &fixture.nky(), &fixture.key()).unwrap_err();

        assert!(matches!(err, NkyError::CorruptedContainer(_)));
        assert!(err.to_string().contains("Safeword"));
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_short_container_never_invokes_provider() {
        let fixture = Fixture::new(&sample()[..100]);
        let provider = StubProvider::default();

        let err = recover_private_key(&provider, &fixture.nky(), &fixture.key()).unwrap_err();

        assert!(matches!(err, NkyError::CorruptedContainer(_)));
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_missing_nky_file() {
        let fixture = Fixture::new(&sample());
        let provider = StubProvider::default();
        let missing = fixture.dir.path().join("missing.nky");

        let err = recover_private_key(&provider, &missing, &fixture.key()).unwrap_err();

        assert!(matches!(err, NkyError::NotFound(ref p) if p == &missing));
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_missing_private_key() {
        let fixture = Fixture::new(&sample());
        let provider = StubProvider::default();
        let missing = fixture.dir.path().join("nope.pem");

        let err = recover_private_key(&provider, &fixture.nky(), &missing).unwrap_err();

        assert!(matches!(err, NkyError::NotFound(_)));
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_unwrap_uses_first_32_bytes_and_iv() {
        let container = NkyContainer::from_bytes(sample()).unwrap();
        let recovered: Vec<u8> = (0u8..48).collect();
        let provider = StubProvider {
            aes_plaintext: STUB_PRIVATE_PEM.to_vec(),
            ..Default::default()
        };

        let pem = unwrap_private_key(&provider, &container, &recovered).unwrap();

        assert_eq!(&*pem, STUB_PRIVATE_PEM);
        let (key, iv, ciphertext) = provider.last_aes_input.borrow().clone().unwrap();
        assert_eq!(key, (0u8..32).collect::<Vec<u8>>());
        assert_eq!(iv, vec![0x01u8; 16]);
        assert_eq!(ciphertext, b"CIPHERTEXT".to_vec());
    }

    #[test]
    fn test_unwrap_rejects_short_key() {
        let container = NkyContainer::from_bytes(sample()).unwrap();
        let provider = StubProvider::default();

        let err = unwrap_private_key(&provider, &container, &[7u8; 16]).unwrap_err();

        assert!(matches!(err, NkyError::InvalidKeyMaterial(_)));
        assert!(provider.calls().is_empty());
    }

    #[test]
    fn test_unwrap_rejects_empty_payload() {
        let mut data = sample();
        data.truncate(275);
        let container = NkyContainer::from_bytes(data).unwrap();
        let provider = StubProvider::default();

        let err = unwrap_private_key(&provider, &container, &[7u8; 32]).unwrap_err();
        assert!(matches!(err, NkyError::CorruptedContainer(_)));
    }
}
