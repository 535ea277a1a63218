use crate::commands::{Finished, open_bucket};
use crate::config::{Pipeline, Settings};
use anyhow::{Context, Result};
use hdfs::{DfsShell, HdfsCli, HdfsConfig, SyncReport, Syncer};
use objstore::{ObjectStore, json_objects};
use std::io::Write;

/// Stage every JSON object in the bucket locally and copy it into HDFS.
pub fn sync_command(settings: &Settings, out: &mut dyn Write) -> Result<Finished> {
    settings.require(Pipeline::Sync)?;

    let store = open_bucket(&settings.s3).context("Failed to open the source bucket")?;
    let shell = HdfsCli::new(settings.hdfs.program.clone());
    let report = sync_bucket(&store, &shell, &settings.hdfs)?;

    writeln!(
        out,
        "Copied {} files to HDFS {} ({} invalid JSON skipped)",
        report.copied, settings.hdfs.hdfs_dir, report.invalid
    )?;
    Ok(Finished::Clean)
}

pub fn sync_bucket<S, D>(store: &S, shell: &D, config: &HdfsConfig) -> Result<SyncReport>
where
    S: ObjectStore,
    D: DfsShell,
{
    Syncer::new(shell, config)
        .sync(json_objects(store))
        .with_context(|| format!("Sync from bucket {} failed", store.name()))
}
