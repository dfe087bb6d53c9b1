//! Format-preserving `.env` codec.
//!
//! Only the value half of `KEY=VALUE` lines is ever rewritten. Comments,
//! blank lines, unparsable lines, ordering, the text before each `=` and
//! the trailing-newline convention all survive a parse → render cycle
//! byte for byte.

use std::fmt;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, trace};

use crate::core::cipher::{
    self, Algorithm, FieldOpener, FieldSealer, IdentityOpener, PasswordFields, RecipientSealer,
    SALT_SIZE,
};
use crate::core::constants::{LEGACY_SALT_MARKER, SALT_MARKER};
use crate::error::{CipherError, Result};

/// One logical line of an env file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvEntry {
    /// Comment, blank line, or a line without `=`, kept verbatim.
    Passthrough(String),
    /// A `KEY=VALUE` line.
    Pair(EnvPair),
}

/// A key/value line.
///
/// When `algorithm` is set the value is the base64 payload of an
/// `ENC[<algorithm>:<payload>]` cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvPair {
    lead: String,
    key: String,
    value: String,
    algorithm: Option<String>,
}

impl EnvPair {
    /// Trimmed key name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Plaintext value, or the base64 payload when encrypted.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Algorithm id of an encrypted value.
    pub fn algorithm(&self) -> Option<&str> {
        self.algorithm.as_deref()
    }

    pub fn is_encrypted(&self) -> bool {
        self.algorithm.is_some()
    }

    fn value_cell(&self) -> String {
        match &self.algorithm {
            Some(algorithm) => format!("ENC[{}:{}]", algorithm, self.value),
            None => self.value.clone(),
        }
    }

    fn seal(&mut self, sealer: &dyn FieldSealer) -> Result<()> {
        let sealed = sealer.seal(self.value.as_bytes())?;
        self.value = STANDARD.encode(sealed);
        self.algorithm = Some(sealer.algorithm_id().to_string());
        Ok(())
    }

    fn open(&mut self, opener: &dyn FieldOpener) -> Result<()> {
        let Some(algorithm) = self.algorithm.as_deref() else {
            return Ok(());
        };

        let ciphertext = STANDARD.decode(&self.value).map_err(|_| {
            CipherError::CorruptEnvelope(format!("value of {} is not valid base64", self.key))
        })?;
        let plaintext = opener.open(algorithm, &ciphertext)?;
        let value = String::from_utf8(plaintext).map_err(|_| {
            CipherError::CorruptEnvelope(format!("value of {} is not valid UTF-8", self.key))
        })?;

        self.value = value;
        self.algorithm = None;
        Ok(())
    }
}

impl EnvEntry {
    /// Parse a single line (without its newline).
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return EnvEntry::Passthrough(line.to_string());
        }

        let Some((lead, value)) = line.split_once('=') else {
            return EnvEntry::Passthrough(line.to_string());
        };

        let (value, algorithm) = match parse_cell(value) {
            Some((algorithm, payload)) => (payload.to_string(), Some(algorithm.to_string())),
            None => (value.to_string(), None),
        };

        EnvEntry::Pair(EnvPair {
            lead: lead.to_string(),
            key: lead.trim().to_string(),
            value,
            algorithm,
        })
    }

    /// The pair, unless this is a passthrough line.
    pub fn as_pair(&self) -> Option<&EnvPair> {
        match self {
            EnvEntry::Pair(pair) => Some(pair),
            EnvEntry::Passthrough(_) => None,
        }
    }

    /// Whether this is the synthetic salt comment.
    fn salt(&self) -> Option<&str> {
        let EnvEntry::Passthrough(raw) = self else {
            return None;
        };
        let comment = raw.trim().strip_prefix('#')?.trim_start();
        [SALT_MARKER, LEGACY_SALT_MARKER].into_iter().find_map(|marker| {
            comment
                .strip_prefix(marker)?
                .strip_prefix('=')
                .map(str::trim)
        })
    }
}

impl fmt::Display for EnvEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvEntry::Passthrough(raw) => f.write_str(raw),
            EnvEntry::Pair(pair) => write!(f, "{}={}", pair.lead, pair.value_cell()),
        }
    }
}

/// Match `ENC[<algo>:<payload>]`, where `<algo>` is `[A-Za-z0-9-]+`.
fn parse_cell(value: &str) -> Option<(&str, &str)> {
    let inner = value.strip_prefix("ENC[")?.strip_suffix(']')?;
    let (algorithm, payload) = inner.split_once(':')?;
    let valid_id = !algorithm.is_empty()
        && algorithm
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid_id || payload.is_empty() {
        return None;
    }
    Some((algorithm, payload))
}

/// A parsed env file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    entries: Vec<EnvEntry>,
    trailing_newline: bool,
}

impl EnvFile {
    /// Parse env text. Never fails; odd lines become passthrough entries.
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }

        let (body, trailing_newline) = match text.strip_suffix('\n') {
            Some(body) => (body, true),
            None => (text, false),
        };

        Self {
            entries: body.split('\n').map(EnvEntry::parse).collect(),
            trailing_newline,
        }
    }

    /// Read and parse an env file from disk.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read or is not UTF-8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading env file");
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn entries(&self) -> &[EnvEntry] {
        &self.entries
    }

    /// Key/value lines only.
    pub fn pairs(&self) -> impl Iterator<Item = &EnvPair> {
        self.entries.iter().filter_map(EnvEntry::as_pair)
    }

    /// Serialize back to text.
    pub fn render(&self) -> String {
        let mut out = self
            .entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        if self.trailing_newline && !self.entries.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Encrypt every plaintext value; returns how many were sealed.
    ///
    /// Values already in `ENC[...]` form are left alone.
    pub fn seal_values(&mut self, sealer: &dyn FieldSealer) -> Result<usize> {
        let mut sealed = 0;
        for entry in &mut self.entries {
            if let EnvEntry::Pair(pair) = entry {
                if pair.is_encrypted() {
                    continue;
                }
                trace!(key = %pair.key, "sealing value");
                pair.seal(sealer)?;
                sealed += 1;
            }
        }
        Ok(sealed)
    }

    /// Decrypt every encrypted value; returns how many were opened.
    pub fn open_values(&mut self, opener: &dyn FieldOpener) -> Result<usize> {
        let mut opened = 0;
        for entry in &mut self.entries {
            if let EnvEntry::Pair(pair) = entry {
                if !pair.is_encrypted() {
                    continue;
                }
                trace!(key = %pair.key, algorithm = ?pair.algorithm, "opening value");
                pair.open(opener)?;
                opened += 1;
            }
        }
        Ok(opened)
    }

    /// Remove the salt comment and return its decoded salt.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::CorruptEnvelope` if the marker holds anything but
    /// 16 base64-encoded bytes.
    pub fn take_salt(&mut self) -> Result<Option<[u8; SALT_SIZE]>> {
        let Some(index) = self.entries.iter().position(|e| e.salt().is_some()) else {
            return Ok(None);
        };

        let encoded = self.entries[index].salt().unwrap_or_default();
        let decoded = STANDARD
            .decode(encoded)
            .map_err(|_| CipherError::CorruptEnvelope("salt marker is not valid base64".into()))?;
        let salt: [u8; SALT_SIZE] = decoded.as_slice().try_into().map_err(|_| {
            CipherError::CorruptEnvelope(format!(
                "salt marker holds {} bytes, expected {}",
                decoded.len(),
                SALT_SIZE
            ))
        })?;

        self.entries.remove(index);
        Ok(Some(salt))
    }

    /// Prepend the salt comment.
    pub fn insert_salt(&mut self, salt: &[u8; SALT_SIZE]) {
        let marker = format!("# {}={}", SALT_MARKER, STANDARD.encode(salt));
        self.entries.insert(0, EnvEntry::Passthrough(marker));
    }

    /// Password mode: encrypt values and record the salt as a leading comment.
    ///
    /// A file that already carries a salt keeps it, so cells encrypted on an
    /// earlier run stay decryptable with the same password.
    pub fn encrypt_with_password(&mut self, password: &[u8], algorithm: Algorithm) -> Result<usize> {
        let existing = self.take_salt()?;
        let derived = cipher::derive(password, existing)?;
        let salt = *derived.salt();

        let sealer = PasswordFields::new(derived.into_key(), algorithm);
        let sealed = self.seal_values(&sealer)?;
        self.insert_salt(&salt);

        debug!(sealed, algorithm = algorithm.name(), "encrypted env values");
        Ok(sealed)
    }

    /// Password mode: strip the salt comment and decrypt all values.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::MissingSalt` before any decryption if there is
    /// no salt comment.
    pub fn decrypt_with_password(&mut self, password: &[u8]) -> Result<usize> {
        let salt = self.take_salt()?.ok_or(CipherError::MissingSalt)?;
        let key = cipher::derive_with_salt(password, &salt)?;

        // Cells carry their own algorithm id; the default is never used here.
        let opener = PasswordFields::new(key, Algorithm::default());
        let opened = self.open_values(&opener)?;

        debug!(opened, "decrypted env values");
        Ok(opened)
    }

    /// Recipient mode: encrypt values to every recipient.
    pub fn encrypt_for_recipients(&mut self, recipients: &[cipher::Recipient]) -> Result<usize> {
        let sealer = RecipientSealer::new(recipients.to_vec());
        self.seal_values(&sealer)
    }

    /// Recipient mode: decrypt values with the local identity.
    pub fn decrypt_with_identity(&mut self, identity: &cipher::Identity) -> Result<usize> {
        self.open_values(&IdentityOpener::new(identity))
    }
}

impl fmt::Display for EnvFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
