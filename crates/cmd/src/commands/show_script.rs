use crate::commands::Finished;
use crate::config::Settings;
use anyhow::{Context, Result};
use std::io::Write;

/// Print the script `load-table` would submit. Needs no credentials.
pub fn show_script_command(settings: &Settings, out: &mut dyn Write) -> Result<Finished> {
    let script = settings
        .livy
        .job
        .render()
        .context("Failed to render the Spark job script")?;
    out.write_all(script.as_bytes())?;
    Ok(Finished::Clean)
}
