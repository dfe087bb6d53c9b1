//! Filesystem-based key storage implementation.
//!
//! Layout under `~/.config/podx/`:
//!
//! ```text
//! age-keys.txt                 append-only identity history (0600)
//! age-recipients/default.txt   latest public key (0644)
//! ```
//!
//! Every identity in `age-keys.txt` is preceded by `# created:` and
//! `# public key:` comments. The last parsable key is the current one.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::KeyStore;
use crate::core::cipher::{self, Identity};
use crate::core::constants;
use crate::core::file::write_with_mode;
use crate::core::types::PublicKey;
use crate::error::{Result, StoreError};

/// Warn when a private key file is readable by anyone but its owner.
#[cfg(unix)]
fn check_private_mode(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = fs::metadata(path) {
        let mode = metadata.permissions().mode() & 0o777;
        if mode != constants::PRIVATE_MODE {
            warn!(
                path = %path.display(),
                mode = %format!("{:o}", mode),
                "key file permissions are too open, run: chmod 600 {}",
                path.display()
            );
        }
    }
}

#[cfg(not(unix))]
fn check_private_mode(_path: &Path) {}

/// Filesystem-based key storage.
#[derive(Debug, Clone)]
pub struct Filesystem {
    dir: PathBuf,
}

impl Filesystem {
    /// Store rooted at an explicit directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at `~/.config/podx`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::HomeDirUnavailable` if HOME cannot be resolved.
    pub fn default_location() -> Result<Self> {
        let home = dirs::home_dir().ok_or(StoreError::HomeDirUnavailable)?;
        Ok(Self::new(home.join(constants::KEY_DIR)))
    }

    pub fn keys_path(&self) -> PathBuf {
        self.dir.join(constants::KEYS_FILE)
    }

    pub fn public_key_path(&self) -> PathBuf {
        self.dir
            .join(constants::RECIPIENTS_DIR)
            .join(constants::DEFAULT_RECIPIENT_FILE)
    }

    fn create_dir(path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(StoreError::WriteFailed)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(constants::KEY_DIR_MODE))
                .map_err(StoreError::WriteFailed)?;
        }
        Ok(())
    }

    fn append_identity(&self, secret: &str, public: &str) -> Result<()> {
        let path = self.keys_path();

        let mut options = fs::OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(constants::PRIVATE_MODE);
        }

        let mut file = options.open(&path).map_err(StoreError::WriteFailed)?;
        let entry = format!(
            "# created: {}\n# public key: {}\n{}\n",
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            public,
            secret
        );
        file.write_all(entry.as_bytes())
            .map_err(StoreError::WriteFailed)?;
        Ok(())
    }
}

/// Last parsable identity line in a key history file.
fn last_identity(contents: &str) -> Option<Identity> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("AGE-SECRET-KEY-"))
        .filter_map(|line| cipher::parse_identity(line).ok())
        .last()
}

impl KeyStore for Filesystem {
    fn load_identity(&self) -> Result<Identity> {
        let path = self.keys_path();
        if !path.exists() {
            return Err(StoreError::NoIdentity(path.display().to_string()).into());
        }
        check_private_mode(&path);

        let contents = fs::read_to_string(&path).map_err(StoreError::ReadFailed)?;
        let identity = last_identity(&contents)
            .ok_or_else(|| StoreError::NoIdentity(path.display().to_string()))?;

        debug!(path = %path.display(), "loaded identity");
        Ok(identity)
    }

    fn load_public_key(&self) -> Result<PublicKey> {
        let path = self.public_key_path();
        if path.exists() {
            let contents = fs::read_to_string(&path).map_err(StoreError::ReadFailed)?;
            let key = contents.trim();
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }

        // Fall back to the current identity when the recipient file is gone.
        self.load_identity()
            .map(|identity| identity.to_public().to_string())
            .map_err(|_| StoreError::NoPublicKey(path.display().to_string()).into())
    }

    fn generate(&self) -> Result<(PublicKey, Identity)> {
        let identity = cipher::generate_identity();
        let (secret, public) = cipher::encode_identity(&identity);

        Self::create_dir(&self.dir)?;
        Self::create_dir(&self.dir.join(constants::RECIPIENTS_DIR))?;

        self.append_identity(&secret, &public)?;
        write_with_mode(
            &self.public_key_path(),
            format!("{}\n", public).as_bytes(),
            constants::PUBLIC_MODE,
        )?;

        debug!(dir = %self.dir.display(), "generated identity");
        Ok((public, identity))
    }
}
