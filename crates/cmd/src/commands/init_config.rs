use crate::commands::Finished;
use crate::config::Settings;
use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::path::Path;

const HEADER: &str = "\
# e911 pipeline settings. Every field is optional.
# Secrets come from the environment: LIVY_KNOX_BEARER_TOKEN,
# LIVY_KNOX_PASSCODE_TOKEN, KNOX_BEARER_TOKEN, AWS_ACCESS_KEY_ID and
# AWS_SECRET_ACCESS_KEY.
";

/// Write the default settings as YAML to `path`.
pub fn init_config_command(path: &Path, force: bool, out: &mut dyn Write) -> Result<Finished> {
    if path.exists() && !force {
        return Err(anyhow!(
            "{} already exists, use --force to overwrite it",
            path.display()
        ));
    }

    let yaml = serde_yaml_ng::to_string(&Settings::default())?;
    std::fs::write(path, format!("{HEADER}{yaml}"))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    writeln!(out, "Wrote {}", path.display())?;
    Ok(Finished::Clean)
}
