//! Byte container for recovered key material
//!
//! Zeroed on drop, never printed by Debug, and locked in memory where the
//! platform allows it.

use std::ops::Deref;
use zeroize::Zeroize;

/// Sensitive bytes (recovered keys, PEM private keys) that zero on drop
pub struct SecureBytes {
    data: Vec<u8>,
    /// Length of the mlock'd region at `data`'s allocation, 0 when not locked
    locked: usize,
}

impl SecureBytes {
    /// Take ownership of `data`; from here on it is wiped on drop
    pub fn new(data: Vec<u8>) -> Self {
        let locked = Self::lock_memory(&data);
        Self { data, locked }
    }

    /// Lock memory to prevent swapping (best effort, may fail without privileges)
    #[cfg(unix)]
    fn lock_memory(data: &[u8]) -> usize {
        if data.is_empty() {
            return 0;
        }
        let rc = unsafe { libc::mlock(data.as_ptr() as *const libc::c_void, data.len()) };
        if rc == 0 {
            data.len()
        } else {
            0
        }
    }

    #[cfg(not(unix))]
    fn lock_memory(_data: &[u8]) -> usize {
        0
    }

    #[cfg(unix)]
    fn unlock_memory(&mut self) {
        if self.locked == 0 {
            return;
        }
        unsafe {
            libc::munlock(self.data.as_ptr() as *const libc::c_void, self.locked);
        }
        self.locked = 0;
    }

    #[cfg(not(unix))]
    fn unlock_memory(&mut self) {}

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Base64 rendering for operator output
    pub fn to_base64(&self) -> String {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        STANDARD.encode(&self.data)
    }
}

// Wipes contents but keeps the allocation, so the locked region stays valid
impl Zeroize for SecureBytes {
    fn zeroize(&mut self) {
        self.data.zeroize();
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        self.data.zeroize();
        self.unlock_memory();
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for SecureBytes {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.data.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}
