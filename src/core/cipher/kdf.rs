//! Password key derivation (Argon2id).
//!
//! Cost parameters are fixed so encrypted files stay portable without
//! storing tuning parameters next to the ciphertext.

use argon2::{Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;
use zeroize::Zeroizing;

use super::algorithm::KEY_SIZE;
use crate::error::{CipherError, Result};

/// Salt size in bytes.
pub const SALT_SIZE: usize = 16;

const ARGON2_TIME_COST: u32 = 3;
const ARGON2_MEMORY_KIB: u32 = 64 * 1024;
const ARGON2_LANES: u32 = 4;

/// A 256-bit key derived from a password, with the salt that produced it.
///
/// Key bytes are wiped on drop.
pub struct DerivedKey {
    key: Zeroizing<[u8; KEY_SIZE]>,
    salt: [u8; SALT_SIZE],
}

impl DerivedKey {
    /// Raw key bytes.
    pub fn key(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }

    /// Salt to persist alongside the ciphertext.
    pub fn salt(&self) -> &[u8; SALT_SIZE] {
        &self.salt
    }

    pub(crate) fn into_key(self) -> Zeroizing<[u8; KEY_SIZE]> {
        self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("salt", &self.salt)
            .finish_non_exhaustive()
    }
}

/// Derive a key from `password`, generating a random salt when none is given.
pub fn derive(password: &[u8], salt: Option<[u8; SALT_SIZE]>) -> Result<DerivedKey> {
    let salt = salt.unwrap_or_else(random_salt);
    let key = derive_with_salt(password, &salt)?;
    Ok(DerivedKey { key, salt })
}

/// Re-derive the key for a known salt. Deterministic for a given pair.
///
/// # Errors
///
/// Returns `CipherError::KeyDerivation` if the salt is not 16 bytes.
pub fn derive_with_salt(password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
    if salt.len() != SALT_SIZE {
        return Err(CipherError::KeyDerivation(format!(
            "invalid salt size: expected {} bytes, got {}",
            SALT_SIZE,
            salt.len()
        ))
        .into());
    }

    debug!("deriving key with argon2id");
    record_derivation();

    let params = Params::new(
        ARGON2_MEMORY_KIB,
        ARGON2_TIME_COST,
        ARGON2_LANES,
        Some(KEY_SIZE),
    )
    .map_err(|e| CipherError::KeyDerivation(e.to_string()))?;
    let argon = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    argon
        .hash_password_into(password, salt, &mut key[..])
        .map_err(|e| CipherError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

/// Fresh random salt from the OS RNG.
pub fn random_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
thread_local! {
    static DERIVATIONS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

#[cfg(test)]
fn record_derivation() {
    DERIVATIONS.with(|c| c.set(c.get() + 1));
}

#[cfg(not(test))]
fn record_derivation() {}

/// Number of Argon2 runs on the current test thread.
#[cfg(test)]
pub(crate) fn derivation_count() -> usize {
    DERIVATIONS.with(|c| c.get())
}
