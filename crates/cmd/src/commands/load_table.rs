use crate::commands::Finished;
use crate::config::{Pipeline, Settings};
use anyhow::{Context, Result};
use diagnostics::*;
use livy::{Cleanup, HttpSessionApi, JobController, SessionApi};
use std::io::Write;

/// Submit the table-loading script to Livy and print its output.
pub fn load_table_command(settings: &Settings, out: &mut dyn Write) -> Result<Finished> {
    settings.require(Pipeline::LoadTable)?;

    let code = settings
        .livy
        .job
        .render()
        .context("Failed to render the Spark job script")?;
    let api = HttpSessionApi::new(&settings.livy).context("Failed to set up the Livy client")?;
    let controller = JobController::new(api, &settings.livy);

    run_job(&controller, &settings.livy.kind, &code, out)
}

pub fn run_job<A: SessionApi>(
    controller: &JobController<A>,
    kind: &str,
    code: &str,
    out: &mut dyn Write,
) -> Result<Finished> {
    let outcome = controller.run(kind, code).context("Livy job failed")?;

    // Livy reports Python exceptions as an available statement.
    if outcome.output.get("status").and_then(|s| s.as_str()) == Some("error") {
        let ename = outcome
            .output
            .get("ename")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown");
        warn!("Statement finished with a Python error: {ename}", ename: ename);
    }

    writeln!(out, "{}", serde_json::to_string_pretty(&outcome.output)?)?;

    match outcome.cleanup {
        Cleanup::Released => Ok(Finished::Clean),
        Cleanup::Failed(reason) => {
            let session = outcome.session.to_string();
            warn!("Session {session} was not deleted: {reason}", session: session, reason: reason);
            Ok(Finished::SessionLeaked)
        }
    }
}
