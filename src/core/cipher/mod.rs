//! Cryptographic operations.
//!
//! Composes standard primitives; nothing here implements a cipher or KDF.
//!
//! ## Layers
//!
//! - **algorithm**: AES-256-GCM and ChaCha20-Poly1305 over a 32-byte key.
//! - **kdf**: Argon2id password derivation with fixed cost parameters.
//! - **envelope**: `salt ∥ tag ∥ nonce ∥ sealed` password container.
//! - **age**: multi-recipient x25519 envelopes.
//! - **field**: per-value sealers used by the `.env` codec.

use crate::error::Result;

mod age;
mod algorithm;
pub mod envelope;
mod field;
pub mod kdf;

pub use self::age::{
    encode_identity, generate_identity, open_with_identity, parse_identity, parse_recipient,
    parse_recipients, seal_for_recipients, Age,
};
pub use algorithm::{encryptor_for, Algorithm, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use field::{FieldOpener, FieldSealer, IdentityOpener, PasswordFields, RecipientSealer, AGE_FIELD_ID};
pub use kdf::{derive, derive_with_salt, DerivedKey, SALT_SIZE};

/// Public-key backend trait.
///
/// Recipients and identities are backend-specific; for age they are
/// x25519 public keys and private identities.
pub trait Cipher {
    /// Type representing a recipient public key.
    type Recipient;

    /// Type representing a private identity/key.
    type Identity;

    /// Encrypt plaintext for multiple recipients.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if encryption fails.
    fn encrypt(&self, plaintext: &[u8], recipients: &[Self::Recipient]) -> Result<Vec<u8>>;

    /// Decrypt with a single private identity.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` if the identity is not a
    /// recipient or the ciphertext was modified.
    fn decrypt(&self, encrypted: &[u8], identity: &Self::Identity) -> Result<Vec<u8>>;

    /// Backend name for display/config.
    fn name(&self) -> &'static str;
}

// Re-export commonly used age types for convenience
pub use ::age::x25519::{Identity, Recipient};
