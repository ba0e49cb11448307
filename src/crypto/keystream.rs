use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use super::KEY_LEN;

/// Password-derived XOR keystream.
///
/// `byte_at(i)` repeats the SHA-256 digest of the password every
/// [`KEY_LEN`] bytes. The stream is a pure function of the password and the
/// position, so encryption and decryption are the same operation.
#[derive(Clone)]
pub struct KeyStream {
    key: [u8; KEY_LEN],
}

impl Drop for KeyStream {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl KeyStream {
    /// Derive the stream for `password`. Any input is accepted, including an
    /// empty password.
    pub fn derive(password: &[u8]) -> Self {
        let digest = Sha256::digest(password);
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&digest);
        Self { key }
    }

    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn byte_at(&self, i: usize) -> u8 {
        self.key[i % KEY_LEN]
    }

    /// XOR the stream into `data`, starting at stream position 0.
    pub fn apply(&self, data: &mut [u8]) {
        for (i, b) in data.iter_mut().enumerate() {
            *b ^= self.byte_at(i);
        }
    }
}

impl std::fmt::Debug for KeyStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyStream(..)")
    }
}
