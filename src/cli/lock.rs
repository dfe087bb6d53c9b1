//! Encrypt-all and decrypt-all commands.

use crate::cli::output;
use crate::core::project::{BatchReport, Project};
use crate::core::store::Filesystem;
use crate::error::Result;

/// Print per-file lines and the `N of M` summary, then surface any failure.
fn report(report: BatchReport, verb: &str) -> Result<()> {
    for processed in &report.processed {
        output::list_item(&format!(
            "{} → {} ({})",
            output::path(&processed.source),
            output::path(&processed.output),
            processed.kind
        ));
    }
    for skipped in &report.skipped {
        output::warn(&format!("skipped {}", output::path(skipped)));
    }

    let summary = format!("{} of {} {}", report.count(), report.total, verb);
    if report.is_complete() {
        if report.total == 0 {
            output::dimmed(&format!("nothing to do: {}", summary));
        } else {
            output::success(&summary);
        }
    } else {
        output::warn(&summary);
    }

    report.into_result().map(|_| ())
}

/// Encrypt every secret file for all recipients.
pub fn encrypt_all() -> Result<()> {
    let project = Project::load(std::env::current_dir()?)?;
    report(project.encrypt_all()?, "encrypted")
}

/// Decrypt every secret file with the local identity.
pub fn decrypt_all() -> Result<()> {
    let project = Project::load(std::env::current_dir()?)?;
    let store = Filesystem::default_location()?;
    report(project.decrypt_all(&store)?, "decrypted")
}
