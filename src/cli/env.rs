//! `.env` value encryption commands.

use crate::cli::password::{self, Confirm};
use crate::cli::{output, DecryptArgs, EncryptArgs};
use crate::core::file;
use crate::error::Result;

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Encrypt the values of an env file.
pub fn encrypt(args: EncryptArgs) -> Result<()> {
    let password = password::obtain(args.password, Confirm::Yes)?;
    let written = file::encrypt_env_file(
        &args.input,
        args.output.as_deref(),
        password.as_bytes(),
        args.algorithm,
    )?;

    output::success(&format!(
        "encrypted {} value{} → {}",
        written.values,
        plural(written.values),
        output::path(&written.output)
    ));
    Ok(())
}

/// Decrypt the values of an env file.
pub fn decrypt(args: DecryptArgs) -> Result<()> {
    let password = password::obtain(args.password, Confirm::No)?;
    let written = file::decrypt_env_file(&args.input, args.output.as_deref(), password.as_bytes())?;

    output::success(&format!(
        "decrypted {} value{} → {}",
        written.values,
        plural(written.values),
        output::path(&written.output)
    ));
    Ok(())
}
