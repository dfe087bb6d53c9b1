//! Single-file encrypt and decrypt commands.

use tracing::info;

use crate::cli::password::{self, Confirm};
use crate::cli::{output, DecryptArgs, EncryptArgs};
use crate::core::file;
use crate::error::Result;

/// Encrypt one file into a password envelope.
pub fn encrypt(args: EncryptArgs) -> Result<()> {
    let password = password::obtain(args.password, Confirm::Yes)?;
    info!(input = %args.input.display(), algorithm = %args.algorithm, "encrypting file");

    let output_path = file::encrypt_file(
        &args.input,
        args.output.as_deref(),
        password.as_bytes(),
        args.algorithm,
    )?;

    output::success(&format!(
        "encrypted {} → {} ({})",
        output::path(&args.input),
        output::path(&output_path),
        args.algorithm
    ));
    Ok(())
}

/// Decrypt one password envelope.
pub fn decrypt(args: DecryptArgs) -> Result<()> {
    let password = password::obtain(args.password, Confirm::No)?;
    let output_path = file::decrypt_file(&args.input, args.output.as_deref(), password.as_bytes())?;

    output::success(&format!(
        "decrypted {} → {}",
        output::path(&args.input),
        output::path(&output_path)
    ));
    Ok(())
}
