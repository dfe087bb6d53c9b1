//! Per-value sealers for `.env` cells.
//!
//! A cell is written as `ENC[<id>:<base64>]`. The id is an [`Algorithm`]
//! name for password mode or [`AGE_FIELD_ID`] for recipient mode.

use ::age::x25519;
use zeroize::Zeroizing;

use super::age::Age;
use super::algorithm::{encryptor_for, Algorithm, KEY_SIZE};
use super::Cipher;
use crate::error::{CipherError, Result};

/// Cell id for values sealed to age recipients.
pub const AGE_FIELD_ID: &str = "age";

/// Encrypts one value.
pub trait FieldSealer {
    /// Id recorded in the cells this sealer writes.
    fn algorithm_id(&self) -> &str;

    /// Seal a single value.
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>>;
}

/// Decrypts one value using the id recorded in its cell.
pub trait FieldOpener {
    /// Open a single value.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::UnknownAlgorithm` for ids this opener cannot handle.
    fn open(&self, algorithm_id: &str, ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// Symmetric sealing under one password-derived key.
pub struct PasswordFields {
    key: Zeroizing<[u8; KEY_SIZE]>,
    algorithm: Algorithm,
}

impl PasswordFields {
    pub fn new(key: Zeroizing<[u8; KEY_SIZE]>, algorithm: Algorithm) -> Self {
        Self { key, algorithm }
    }
}

impl FieldSealer for PasswordFields {
    fn algorithm_id(&self) -> &str {
        self.algorithm.name()
    }

    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.algorithm.encrypt(plaintext, &self.key[..])
    }
}

impl FieldOpener for PasswordFields {
    // Cells may name a different algorithm than the one used for sealing.
    fn open(&self, algorithm_id: &str, ciphertext: &[u8]) -> Result<Vec<u8>> {
        encryptor_for(algorithm_id)?.decrypt(ciphertext, &self.key[..])
    }
}

/// Seals each value to the full recipient list.
pub struct RecipientSealer {
    recipients: Vec<x25519::Recipient>,
}

impl RecipientSealer {
    pub fn new(recipients: Vec<x25519::Recipient>) -> Self {
        Self { recipients }
    }
}

impl FieldSealer for RecipientSealer {
    fn algorithm_id(&self) -> &str {
        AGE_FIELD_ID
    }

    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        Age.encrypt(plaintext, &self.recipients)
    }
}

/// Opens age cells with the local identity.
pub struct IdentityOpener<'a> {
    identity: &'a x25519::Identity,
}

impl<'a> IdentityOpener<'a> {
    pub fn new(identity: &'a x25519::Identity) -> Self {
        Self { identity }
    }
}

impl FieldOpener for IdentityOpener<'_> {
    fn open(&self, algorithm_id: &str, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if algorithm_id != AGE_FIELD_ID {
            return Err(CipherError::UnknownAlgorithm(algorithm_id.to_string()).into());
        }
        Age.decrypt(ciphertext, self.identity)
    }
}
