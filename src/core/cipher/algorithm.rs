//! Symmetric AEAD algorithms.
//!
//! Both algorithms take a 32-byte key and produce `nonce ∥ sealed`, where the
//! 12-byte nonce is freshly drawn from the OS RNG on every call.

use std::fmt;
use std::str::FromStr;

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::Aes256Gcm;
use chacha20poly1305::ChaCha20Poly1305;
use tracing::trace;

use crate::error::{CipherError, Result};

/// Symmetric key size in bytes.
pub const KEY_SIZE: usize = 32;

/// AEAD nonce size in bytes (same for both algorithms).
pub const NONCE_SIZE: usize = 12;

/// AEAD authentication tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Supported symmetric algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// AES-256-GCM.
    #[default]
    AesGcm,
    /// ChaCha20-Poly1305.
    ChaCha20,
}

impl Algorithm {
    /// Every supported algorithm.
    pub const ALL: [Algorithm; 2] = [Algorithm::AesGcm, Algorithm::ChaCha20];

    /// Identifier used on the command line and in `ENC[...]` cells.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::AesGcm => "aes-gcm",
            Algorithm::ChaCha20 => "chacha20",
        }
    }

    /// Byte stored in the symmetric envelope header.
    pub fn tag(self) -> u8 {
        match self {
            Algorithm::AesGcm => 0,
            Algorithm::ChaCha20 => 1,
        }
    }

    /// Resolve an envelope header byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Algorithm::AesGcm),
            1 => Some(Algorithm::ChaCha20),
            _ => None,
        }
    }

    /// Encrypt `plaintext` under `key`, returning `nonce ∥ sealed`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidKeySize` unless `key` is exactly 32 bytes.
    pub fn encrypt(self, plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        trace!(algorithm = self.name(), plaintext_len = plaintext.len(), "sealing");
        match self {
            Algorithm::AesGcm => seal::<Aes256Gcm>(plaintext, key),
            Algorithm::ChaCha20 => seal::<ChaCha20Poly1305>(plaintext, key),
        }
    }

    /// Decrypt `nonce ∥ sealed` produced by [`Algorithm::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidKeySize` for a bad key,
    /// `CipherError::CorruptEnvelope` if the input cannot hold a nonce and tag,
    /// and `CipherError::DecryptionFailed` if authentication fails.
    pub fn decrypt(self, ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        trace!(algorithm = self.name(), ciphertext_len = ciphertext.len(), "opening");
        match self {
            Algorithm::AesGcm => open::<Aes256Gcm>(ciphertext, key),
            Algorithm::ChaCha20 => open::<ChaCha20Poly1305>(ciphertext, key),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = CipherError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| CipherError::UnknownAlgorithm(s.to_string()))
    }
}

/// Look up an algorithm by identifier.
///
/// # Errors
///
/// Returns `CipherError::UnknownAlgorithm` for anything but `aes-gcm` or `chacha20`.
pub fn encryptor_for(id: &str) -> Result<Algorithm> {
    Ok(id.parse::<Algorithm>()?)
}

fn check_key(key: &[u8]) -> Result<()> {
    if key.len() != KEY_SIZE {
        return Err(CipherError::InvalidKeySize {
            expected: KEY_SIZE,
            actual: key.len(),
        }
        .into());
    }
    Ok(())
}

fn seal<C>(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>>
where
    C: Aead + AeadCore + KeyInit,
{
    check_key(key)?;
    let cipher = C::new_from_slice(key).map_err(|_| CipherError::InvalidKeySize {
        expected: KEY_SIZE,
        actual: key.len(),
    })?;

    let nonce = C::generate_nonce(&mut OsRng);
    let sealed = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| CipherError::EncryptionFailed("aead seal failed".to_string()))?;

    let mut out = Vec::with_capacity(nonce.len() + sealed.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);
    Ok(out)
}

fn open<C>(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>>
where
    C: Aead + AeadCore + KeyInit,
{
    check_key(key)?;
    if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CipherError::CorruptEnvelope(format!(
            "ciphertext too short: {} bytes",
            ciphertext.len()
        ))
        .into());
    }

    let cipher = C::new_from_slice(key).map_err(|_| CipherError::InvalidKeySize {
        expected: KEY_SIZE,
        actual: key.len(),
    })?;

    let (nonce, sealed) = ciphertext.split_at(NONCE_SIZE);
    cipher
        .decrypt(GenericArray::from_slice(nonce), sealed)
        .map_err(|_| CipherError::DecryptionFailed.into())
}
