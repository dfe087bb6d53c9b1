//! Quick status overview command.

use crate::cli::output;
use crate::core::project::Project;
use crate::error::Result;

/// Show recipients and secret file counts.
pub fn execute(json: bool) -> Result<()> {
    let project = Project::load(std::env::current_dir()?)?;
    let status = project.status();

    if json {
        let rendered = serde_json::to_string_pretty(&status)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        println!("{}", rendered);
        return Ok(());
    }

    output::section("Podx Status");
    output::kv("root", output::path(&status.root));
    output::kv("backend", status.backend);

    output::section("Recipients");
    if status.recipients.is_empty() {
        output::dimmed("no recipients configured");
    }
    for recipient in &status.recipients {
        output::list_item(&format!("{}  {}", recipient.name, recipient.key));
    }

    output::section("Secrets");
    for pattern in &status.patterns {
        output::list_item(&format!(
            "{}  {} plaintext, {} encrypted",
            pattern.pattern, pattern.plaintext, pattern.encrypted
        ));
    }
    Ok(())
}
