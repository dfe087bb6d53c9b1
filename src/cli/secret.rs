//! Secret pattern management.

use crate::cli::output;
use crate::core::project::Project;
use crate::error::Result;

/// Declare a secret glob pattern.
pub fn add(pattern: &str) -> Result<()> {
    let mut project = Project::load(std::env::current_dir()?)?;
    project.add_secret(pattern)?;
    output::success(&format!("added secret pattern {}", pattern.trim()));
    Ok(())
}
