//! Init command - create `.podx.toml` in the current directory.

use tracing::info;

use crate::cli::output;
use crate::core::project::Project;
use crate::core::store::Filesystem;
use crate::error::Result;

/// Initialize podx in the current directory.
pub fn execute() -> Result<()> {
    let root = std::env::current_dir()?;
    let store = Filesystem::default_location()?;

    info!(root = %root.display(), "initializing project");
    let project = Project::init(&root, &store)?;

    output::success("initialized .podx.toml");
    match project.config().recipients.first() {
        Some(owner) => output::kv("recipient", &owner.name),
        None => {
            output::warn("no local identity found, project has no recipients yet");
            output::hint(&format!(
                "run: {} then {}",
                output::cmd("podx keygen"),
                output::cmd("podx add-recipient --name <name> --key <age1...>")
            ));
        }
    }
    Ok(())
}
