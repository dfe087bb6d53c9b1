//! Keygen command - generate a new local age identity.

use crate::cli::output;
use crate::core::store::{Filesystem, KeyStore};
use crate::error::Result;

/// Generate and persist a new identity; prints the public key.
pub fn execute() -> Result<()> {
    let store = Filesystem::default_location()?;
    let had_identity = store.has_identity();
    let (public, _) = store.generate()?;

    output::success("generated age identity");
    output::kv("public key", &public);
    output::kv("stored in", output::path(&store.keys_path()));
    if had_identity {
        output::dimmed("previous keys are kept in the history file");
    }
    Ok(())
}
