//! Recipient management.

use tracing::info;

use crate::cli::output;
use crate::core::project::Project;
use crate::error::Result;

/// Add a recipient by name and age public key.
pub fn add(name: &str, key: &str) -> Result<()> {
    info!("Adding recipient: {}", name);
    let mut project = Project::load(std::env::current_dir()?)?;
    project.add_recipient(name, key)?;

    output::success(&format!("added {}", name));
    output::hint(&format!(
        "run: {} to re-encrypt for the new recipient",
        output::cmd("podx encrypt-all")
    ));
    Ok(())
}
