//! Age encryption backend implementation.
//!
//! Wraps plaintext for any number of x25519 recipients. Output is the binary
//! age format. Armored input from other age tools is detected on decrypt.

use std::io::{Read, Write};

use ::age::secrecy::ExposeSecret;
use ::age::x25519;
use tracing::trace;

use super::Cipher;
use crate::core::types::PublicKey;
use crate::error::{CipherError, Result};

/// Age-based cryptographic backend using x25519 keys
#[derive(Debug, Clone, Copy, Default)]
pub struct Age;

impl Cipher for Age {
    type Recipient = x25519::Recipient;
    type Identity = x25519::Identity;

    fn name(&self) -> &'static str {
        "age"
    }

    fn encrypt(&self, plaintext: &[u8], recipients: &[x25519::Recipient]) -> Result<Vec<u8>> {
        trace!(
            recipients = recipients.len(),
            plaintext_len = plaintext.len(),
            "encrypting"
        );

        let encryptor =
            age::Encryptor::with_recipients(recipients.iter().map(|r| r as &dyn age::Recipient))
                .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        let mut encrypted = Vec::new();
        let mut writer = encryptor
            .wrap_output(age::armor::ArmoredWriter::wrap_output(
                &mut encrypted,
                age::armor::Format::Binary,
            )?)
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        writer.write_all(plaintext)?;
        let armored = writer
            .finish()
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
        armored
            .finish()
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        trace!(ciphertext_len = encrypted.len(), "encrypted");
        Ok(encrypted)
    }

    fn decrypt(&self, encrypted: &[u8], identity: &x25519::Identity) -> Result<Vec<u8>> {
        trace!(ciphertext_len = encrypted.len(), "decrypting");

        let reader = age::armor::ArmoredReader::new(encrypted);
        let decryptor =
            age::Decryptor::new(reader).map_err(|_| CipherError::DecryptionFailed)?;

        let mut decrypted = Vec::new();
        let mut reader = decryptor
            .decrypt(std::iter::once(identity as &dyn age::Identity))
            .map_err(|_| CipherError::DecryptionFailed)?;

        // A failed payload chunk MAC shows up as a read error.
        reader
            .read_to_end(&mut decrypted)
            .map_err(|_| CipherError::DecryptionFailed)?;

        trace!(plaintext_len = decrypted.len(), "decrypted");
        Ok(decrypted)
    }
}

/// Parse a public key string into an age recipient
///
/// # Errors
///
/// Returns `CipherError::InvalidRecipient` if the key format is invalid.
pub fn parse_recipient(key: &str) -> Result<x25519::Recipient> {
    key.trim()
        .parse::<x25519::Recipient>()
        .map_err(|_| CipherError::InvalidRecipient(key.to_string()).into())
}

/// Parse every recipient, failing on the first invalid key.
pub fn parse_recipients<S: AsRef<str>>(keys: &[S]) -> Result<Vec<x25519::Recipient>> {
    keys.iter().map(|k| parse_recipient(k.as_ref())).collect()
}

/// Parse an `AGE-SECRET-KEY-...` string.
///
/// # Errors
///
/// Returns `CipherError::InvalidIdentity`. The input is never echoed.
pub fn parse_identity(secret: &str) -> Result<x25519::Identity> {
    secret
        .trim()
        .parse::<x25519::Identity>()
        .map_err(|_| CipherError::InvalidIdentity.into())
}

/// Generate a fresh identity from the OS RNG.
pub fn generate_identity() -> x25519::Identity {
    x25519::Identity::generate()
}

/// Encoded `(private, public)` strings for an identity.
pub fn encode_identity(identity: &x25519::Identity) -> (String, PublicKey) {
    let secret = identity.to_string();
    (
        secret.expose_secret().to_string(),
        identity.to_public().to_string(),
    )
}

/// Encrypt for a list of encoded public keys.
///
/// Every key is parsed before anything is encrypted, so an invalid key never
/// yields a partial envelope.
pub fn seal_for_recipients<S: AsRef<str>>(plaintext: &[u8], keys: &[S]) -> Result<Vec<u8>> {
    let recipients = parse_recipients(keys)?;
    Age.encrypt(plaintext, &recipients)
}

/// Decrypt with an encoded private identity.
pub fn open_with_identity(envelope: &[u8], secret: &str) -> Result<Vec<u8>> {
    let identity = parse_identity(secret)?;
    Age.decrypt(envelope, &identity)
}
