//! Report generation command
//!
//! The default action: load settings, then render the outline into the report file.

use crate::cli::{Output, RunArgs};
use crate::config::Settings;
use crate::report;
use anyhow::Result;

/// Execute a report run
pub async fn execute(args: &RunArgs, output: &Output) -> Result<()> {
    let settings = Settings::load(args.settings.as_deref(), Some(args.overrides()))?;
    output.verbose(&format!("Outline: {}", args.config.display()));

    let outcome = report::generate(&settings, &args.config).await?;

    output.verbose(&format!(
        "Rendered {} section(s) into {}",
        outcome.summary.sections_rendered,
        outcome.path.display()
    ));
    Ok(())
}
