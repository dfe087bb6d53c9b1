//! Configuration file management.
//!
//! Handles reading, writing, and validating `.podx.toml` project files, and
//! keeping `.gitignore` in step with the declared secret patterns.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::cipher;
use crate::core::constants;
use crate::core::file::write_with_mode;
use crate::core::types::{MemberName, PublicKey, SecretPattern};
use crate::error::{ConfigError, Result};

/// Public-key backend named in the config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Age,
    /// Recognized but never used for batch operations.
    Gpg,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Age => f.write_str("age"),
            Backend::Gpg => f.write_str("gpg"),
        }
    }
}

/// A named public key allowed to decrypt project secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub name: MemberName,
    pub key: PublicKey,
}

/// Project configuration stored in `.podx.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Configuration schema version
    pub version: u32,
    #[serde(default)]
    pub backend: Backend,
    /// Glob patterns, relative to the project root, naming secret files
    #[serde(default)]
    pub secrets: Vec<SecretPattern>,
    #[serde(default)]
    pub recipients: Vec<Recipient>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            version: constants::CONFIG_VERSION,
            backend: Backend::Age,
            secrets: vec![constants::DEFAULT_SECRET_PATTERN.to_string()],
            recipients: Vec::new(),
        }
    }
}

impl ProjectConfig {
    /// Path to the configuration file under `root`
    pub fn path(root: &Path) -> PathBuf {
        root.join(constants::CONFIG_FILE)
    }

    /// Check if a configuration file exists under `root`
    pub fn exists(root: &Path) -> bool {
        Self::path(root).exists()
    }

    /// Load configuration from `<root>/.podx.toml`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if the file doesn't exist,
    /// or `ConfigError::Parse` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotInitialized.into());
        }
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        let config = Self::parse(&contents)?;

        debug!(
            secrets = config.secrets.len(),
            recipients = config.recipients.len(),
            backend = %config.backend,
            "config loaded"
        );
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize with the header banner.
    pub fn render(&self) -> Result<String> {
        let body = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        Ok(format!("{}{}", constants::CONFIG_HEADER, body))
    }

    /// Save configuration to `<root>/.podx.toml`
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = Self::path(root);
        debug!(path = %path.display(), "saving config");
        write_with_mode(&path, self.render()?.as_bytes(), constants::PUBLIC_MODE)
    }

    /// Validate the configuration structure and contents
    ///
    /// Checks:
    /// - Version is known
    /// - Recipient keys parse for the age backend and are unique
    /// - Secret patterns are valid globs and unique
    ///
    /// An empty recipient list is valid here; batch encryption reports it.
    pub fn validate(&self) -> Result<()> {
        debug!("validating config");

        if self.version == 0 || self.version > constants::CONFIG_VERSION {
            return Err(ConfigError::InvalidValue {
                field: "version",
                reason: format!(
                    "unsupported version {} (expected {})",
                    self.version,
                    constants::CONFIG_VERSION
                ),
            }
            .into());
        }

        let mut keys = HashSet::new();
        for recipient in &self.recipients {
            if self.backend == Backend::Age {
                cipher::parse_recipient(&recipient.key)?;
            } else if recipient.key.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "recipients",
                    reason: format!("empty key for recipient '{}'", recipient.name),
                }
                .into());
            }
            if !keys.insert(recipient.key.as_str()) {
                return Err(ConfigError::DuplicateRecipient(recipient.key.clone()).into());
            }
        }

        let mut patterns = HashSet::new();
        for pattern in &self.secrets {
            glob::Pattern::new(pattern)?;
            if !patterns.insert(pattern.as_str()) {
                return Err(ConfigError::DuplicateSecretPattern(pattern.clone()).into());
            }
        }

        Ok(())
    }

    /// Append a recipient after validating the key.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::InvalidRecipient` for a malformed key or
    /// `ConfigError::DuplicateRecipient` if the key is already listed.
    pub fn add_recipient(&mut self, name: &str, key: &str) -> Result<()> {
        let key = key.trim();
        if self.backend == Backend::Age {
            cipher::parse_recipient(key)?;
        }
        if self.recipients.iter().any(|r| r.key == key) {
            return Err(ConfigError::DuplicateRecipient(key.to_string()).into());
        }
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "name",
                reason: "recipient name cannot be empty".to_string(),
            }
            .into());
        }

        self.recipients.push(Recipient {
            name: name.trim().to_string(),
            key: key.to_string(),
        });
        Ok(())
    }

    /// Append a secret glob pattern.
    pub fn add_secret(&mut self, pattern: &str) -> Result<()> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "secrets",
                reason: "pattern cannot be empty".to_string(),
            }
            .into());
        }
        glob::Pattern::new(pattern)?;
        if self.secrets.iter().any(|p| p == pattern) {
            return Err(ConfigError::DuplicateSecretPattern(pattern.to_string()).into());
        }

        self.secrets.push(pattern.to_string());
        Ok(())
    }

    /// Encoded public keys of every recipient, in order.
    pub fn recipient_keys(&self) -> Vec<&str> {
        self.recipients.iter().map(|r| r.key.as_str()).collect()
    }

    /// Batch operations only run on the age backend.
    pub fn require_age_backend(&self) -> Result<()> {
        match self.backend {
            Backend::Age => Ok(()),
            other => Err(ConfigError::UnsupportedBackend(other.to_string()).into()),
        }
    }
}

/// Ensure `<root>/.gitignore` lists every secret pattern.
///
/// Missing patterns are appended below a header comment; present ones are
/// compared line-exact after trimming. Returns how many lines were added.
///
/// # Errors
///
/// Returns error if file operations fail.
pub fn update_gitignore(root: &Path, patterns: &[SecretPattern]) -> Result<usize> {
    let gitignore = root.join(constants::GITIGNORE_FILE);

    let existing = if gitignore.exists() {
        std::fs::read_to_string(&gitignore)?
    } else {
        String::new()
    };

    let present: HashSet<&str> = existing.lines().map(str::trim).collect();
    let mut missing: Vec<&str> = Vec::new();
    for pattern in patterns {
        let pattern = pattern.trim();
        if !present.contains(pattern) && !missing.contains(&pattern) {
            missing.push(pattern);
        }
    }

    if missing.is_empty() {
        return Ok(0);
    }

    let mut updated = existing.clone();
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    if !present.contains(constants::GITIGNORE_HEADER) {
        if !updated.is_empty() {
            updated.push('\n');
        }
        updated.push_str(constants::GITIGNORE_HEADER);
        updated.push('\n');
    }
    for pattern in &missing {
        updated.push_str(pattern);
        updated.push('\n');
    }

    std::fs::write(&gitignore, updated)?;
    debug!(added = missing.len(), path = %gitignore.display(), "updated gitignore");
    Ok(missing.len())
}
