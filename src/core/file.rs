//! Single-file password encryption.
//!
//! Binary files become symmetric envelopes; `.env` files keep their shape
//! and only their values are sealed. Encrypting consumes the input,
//! decrypting keeps the ciphertext.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::cipher::{envelope, Algorithm};
use crate::core::constants;
use crate::core::env::EnvFile;
use crate::error::{Error, Result};

/// Result of an env file transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvWritten {
    pub output: PathBuf,
    /// Number of values sealed or opened.
    pub values: usize,
}

/// Write `bytes` to `path`, creating or truncating it with `mode`.
///
/// The mode is also applied to files that already existed.
pub(crate) fn write_with_mode(path: &Path, bytes: &[u8], mode: u32) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}

/// `path` with `suffix` appended to its file name.
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// `path` without `suffix`, if its file name ends with it and is longer.
pub fn strip_suffix(path: &Path, suffix: &str) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(suffix).filter(|s| !s.is_empty())?;
    Some(path.with_file_name(stem))
}

/// Default output of a password encryption: `<input>.enc`.
pub fn default_encrypt_output(input: &Path) -> PathBuf {
    with_suffix(input, constants::PASSWORD_EXT)
}

/// Default output of an env encryption: `<input>.podx`.
pub fn default_env_encrypt_output(input: &Path) -> PathBuf {
    with_suffix(input, constants::ENCRYPTED_EXT)
}

/// Default output of a decryption.
///
/// Strips `.enc`, `.podx` or `.age`; otherwise appends `.dec`.
pub fn default_decrypt_output(input: &Path) -> PathBuf {
    [constants::PASSWORD_EXT, constants::ENCRYPTED_EXT, ".age"]
        .iter()
        .find_map(|ext| strip_suffix(input, ext))
        .unwrap_or_else(|| with_suffix(input, constants::DECRYPTED_EXT))
}

/// Absolute form of a path whose file may not exist yet.
fn resolve(path: &Path) -> Result<PathBuf> {
    if let Ok(canonical) = path.canonicalize() {
        return Ok(canonical);
    }
    let absolute = std::path::absolute(path)?;
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => match parent.canonicalize() {
            Ok(parent) => Ok(parent.join(name)),
            Err(_) => Ok(absolute),
        },
        _ => Ok(absolute),
    }
}

/// Fail with `PathCollision` if both paths name the same file.
pub fn ensure_distinct(input: &Path, output: &Path) -> Result<()> {
    let resolved = resolve(input)?;
    if resolved == resolve(output)? {
        return Err(Error::PathCollision(resolved));
    }
    Ok(())
}

fn remove_plaintext(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "failed to remove plaintext");
    }
}

/// Encrypt any file into a symmetric envelope, then delete the input.
///
/// # Errors
///
/// Returns `Error::PathCollision` before reading if input and output are the
/// same file.
pub fn encrypt_file(
    input: &Path,
    output: Option<&Path>,
    password: &[u8],
    algorithm: Algorithm,
) -> Result<PathBuf> {
    let output = output.map_or_else(|| default_encrypt_output(input), Path::to_path_buf);
    ensure_distinct(input, &output)?;

    let plaintext = fs::read(input).map_err(|e| Error::from(e).at(input))?;
    let sealed = envelope::seal(&plaintext, password, algorithm).map_err(|e| e.at(input))?;
    write_with_mode(&output, &sealed, constants::PRIVATE_MODE).map_err(|e| e.at(&output))?;
    remove_plaintext(input);

    debug!(input = %input.display(), output = %output.display(), "encrypted file");
    Ok(output)
}

/// Decrypt a symmetric envelope; the input is kept.
pub fn decrypt_file(input: &Path, output: Option<&Path>, password: &[u8]) -> Result<PathBuf> {
    let output = output.map_or_else(|| default_decrypt_output(input), Path::to_path_buf);
    ensure_distinct(input, &output)?;

    let sealed = fs::read(input).map_err(|e| Error::from(e).at(input))?;
    let plaintext = envelope::open(&sealed, password).map_err(|e| e.at(input))?;
    write_with_mode(&output, &plaintext, constants::PRIVATE_MODE).map_err(|e| e.at(&output))?;

    debug!(input = %input.display(), output = %output.display(), "decrypted file");
    Ok(output)
}

/// Encrypt the values of an env file with a password, then delete the input.
pub fn encrypt_env_file(
    input: &Path,
    output: Option<&Path>,
    password: &[u8],
    algorithm: Algorithm,
) -> Result<EnvWritten> {
    let output = output.map_or_else(|| default_env_encrypt_output(input), Path::to_path_buf);
    ensure_distinct(input, &output)?;

    let mut env = EnvFile::load(input).map_err(|e| e.at(input))?;
    let values = env
        .encrypt_with_password(password, algorithm)
        .map_err(|e| e.at(input))?;
    write_with_mode(&output, env.render().as_bytes(), constants::PRIVATE_MODE)
        .map_err(|e| e.at(&output))?;
    remove_plaintext(input);

    Ok(EnvWritten { output, values })
}

/// Decrypt the values of a password-encrypted env file; the input is kept.
pub fn decrypt_env_file(input: &Path, output: Option<&Path>, password: &[u8]) -> Result<EnvWritten> {
    let output = output.map_or_else(|| default_decrypt_output(input), Path::to_path_buf);
    ensure_distinct(input, &output)?;

    let mut env = EnvFile::load(input).map_err(|e| e.at(input))?;
    let values = env.decrypt_with_password(password).map_err(|e| e.at(input))?;
    write_with_mode(&output, env.render().as_bytes(), constants::PRIVATE_MODE)
        .map_err(|e| e.at(&output))?;

    Ok(EnvWritten { output, values })
}
