//! Symmetric password envelope.
//!
//! Binary layout:
//!
//! ```text
//! [0..16)   Argon2id salt
//! [16]      algorithm tag (0 = aes-gcm, 1 = chacha20)
//! [17..29)  AEAD nonce
//! [29..)    sealed ciphertext + 16-byte tag
//! ```

use tracing::debug;

use super::algorithm::{Algorithm, NONCE_SIZE, TAG_SIZE};
use super::kdf::{self, SALT_SIZE};
use crate::error::{CipherError, Result};

/// Salt plus algorithm tag.
pub const HEADER_SIZE: usize = SALT_SIZE + 1;

/// Smallest well-formed envelope (empty plaintext).
pub const MIN_ENVELOPE_SIZE: usize = HEADER_SIZE + NONCE_SIZE + TAG_SIZE;

/// A parsed, borrowed view of a symmetric envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    pub salt: &'a [u8],
    pub algorithm: Algorithm,
    /// `nonce ∥ sealed` as produced by [`Algorithm::encrypt`].
    pub ciphertext: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Split an envelope into its parts without doing any key derivation.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::CorruptEnvelope` if the input is shorter than
    /// [`MIN_ENVELOPE_SIZE`] or carries an unknown algorithm tag.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < MIN_ENVELOPE_SIZE {
            return Err(CipherError::CorruptEnvelope(format!(
                "envelope too short: {} bytes, need at least {}",
                bytes.len(),
                MIN_ENVELOPE_SIZE
            ))
            .into());
        }

        let (salt, rest) = bytes.split_at(SALT_SIZE);
        let algorithm = Algorithm::from_tag(rest[0]).ok_or_else(|| {
            CipherError::CorruptEnvelope(format!("unknown algorithm tag {}", rest[0]))
        })?;

        Ok(Self {
            salt,
            algorithm,
            ciphertext: &rest[1..],
        })
    }

    /// Serialize the parts back into the binary layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.ciphertext.len());
        out.extend_from_slice(self.salt);
        out.push(self.algorithm.tag());
        out.extend_from_slice(self.ciphertext);
        out
    }
}

/// Encrypt `plaintext` with a key derived from `password` under a fresh salt.
pub fn seal(plaintext: &[u8], password: &[u8], algorithm: Algorithm) -> Result<Vec<u8>> {
    let derived = kdf::derive(password, None)?;
    let ciphertext = algorithm.encrypt(plaintext, derived.key())?;

    debug!(
        algorithm = algorithm.name(),
        plaintext_len = plaintext.len(),
        "sealed envelope"
    );

    Ok(Envelope {
        salt: derived.salt(),
        algorithm,
        ciphertext: &ciphertext,
    }
    .to_bytes())
}

/// Decrypt an envelope produced by [`seal`].
///
/// Malformed input is rejected before the KDF runs. A wrong password and a
/// tampered envelope both surface as `CipherError::DecryptionFailed`.
pub fn open(envelope: &[u8], password: &[u8]) -> Result<Vec<u8>> {
    let parsed = Envelope::parse(envelope)?;
    let key = kdf::derive_with_salt(password, parsed.salt)?;
    let plaintext = parsed.algorithm.decrypt(parsed.ciphertext, &key[..])?;

    debug!(algorithm = parsed.algorithm.name(), "opened envelope");
    Ok(plaintext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_sample_scenario() {
        let sealed = seal(b"hello\n", b"pass123", Algorithm::AesGcm).unwrap();
        assert_eq!(sealed[SALT_SIZE], 0);
        assert_eq!(open(&sealed, b"pass123").unwrap(), b"hello\n");

        let err = open(&sealed, b"wrong").unwrap_err();
        assert!(matches!(err, Error::Cipher(CipherError::DecryptionFailed)));
    }

    #[test]
    fn test_chacha_tag_byte() {
        let sealed = seal(b"data", b"pw", Algorithm::ChaCha20).unwrap();
        assert_eq!(sealed[SALT_SIZE], 1);
        assert_eq!(sealed.len(), MIN_ENVELOPE_SIZE + 4);
        assert_eq!(open(&sealed, b"pw").unwrap(), b"data");
    }

    #[test]
    fn test_empty_plaintext() {
        let sealed = seal(b"", b"pw", Algorithm::AesGcm).unwrap();
        assert_eq!(sealed.len(), MIN_ENVELOPE_SIZE);
        assert!(open(&sealed, b"pw").unwrap().is_empty());
    }

    #[test]
    fn test_short_envelope_skips_kdf() {
        let before = kdf::derivation_count();
        for len in [0, 1, HEADER_SIZE, MIN_ENVELOPE_SIZE - 1] {
            let err = open(&vec![0u8; len], b"pw").unwrap_err();
            assert!(matches!(err, Error::Cipher(CipherError::CorruptEnvelope(_))));
        }
        assert_eq!(kdf::derivation_count(), before);
    }

    #[test]
    fn test_unknown_tag_skips_kdf() {
        let mut sealed = seal(b"data", b"pw", Algorithm::AesGcm).unwrap();
        sealed[SALT_SIZE] = 9;
        let before = kdf::derivation_count();
        let err = open(&sealed, b"pw").unwrap_err();
        assert!(matches!(err, Error::Cipher(CipherError::CorruptEnvelope(_))));
        assert_eq!(kdf::derivation_count(), before);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let sealed = seal(b"attack at dawn", b"pw", Algorithm::ChaCha20).unwrap();
        for i in [HEADER_SIZE, HEADER_SIZE + NONCE_SIZE, sealed.len() - 1] {
            let mut corrupted = sealed.clone();
            corrupted[i] ^= 0x01;
            let err = open(&corrupted, b"pw").unwrap_err();
            assert!(matches!(err, Error::Cipher(CipherError::DecryptionFailed)));
        }
    }

    #[test]
    fn test_tampered_salt_fails() {
        let mut sealed = seal(b"data", b"pw", Algorithm::AesGcm).unwrap();
        sealed[0] ^= 0x80;
        assert!(open(&sealed, b"pw").is_err());
    }

    #[test]
    fn test_parse_views() {
        let sealed = seal(b"abc", b"pw", Algorithm::ChaCha20).unwrap();
        let parsed = Envelope::parse(&sealed).unwrap();
        assert_eq!(parsed.salt.len(), SALT_SIZE);
        assert_eq!(parsed.algorithm, Algorithm::ChaCha20);
        assert_eq!(parsed.ciphertext.len(), NONCE_SIZE + 3 + TAG_SIZE);
        assert_eq!(parsed.to_bytes(), sealed);
    }
}
