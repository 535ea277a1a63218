use crate::config::{CopyMode, HdfsConfig};
use crate::error::{HdfsError, Result};
use crate::shell::DfsShell;
use crate::stage::Stager;
use diagnostics::*;
use objstore::RemoteObject;
use std::path::PathBuf;

/// Counts for one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub staged: usize,
    pub invalid: usize,
    pub copied: usize,
}

/// Stages objects locally, then copies them into HDFS.
pub struct Syncer<'a, S> {
    shell: S,
    config: &'a HdfsConfig,
}

impl<'a, S: DfsShell> Syncer<'a, S> {
    pub fn new(shell: S, config: &'a HdfsConfig) -> Self {
        Self { shell, config }
    }

    pub fn sync<I>(&self, objects: I) -> Result<SyncReport>
    where
        I: IntoIterator<Item = objstore::Result<RemoteObject>>,
    {
        let stager = Stager::new(&self.config.local_dir);
        let dir_str = stager.dir().display().to_string();
        info!("Downloading files to '{dir}'...", dir: dir_str.as_str());

        let staged = stager.stage(objects)?;
        if staged.staged.is_empty() {
            return Err(HdfsError::NothingStaged {
                dir: self.config.local_dir.clone(),
            });
        }

        let target = self.config.hdfs_dir.as_str();
        info!("Ensuring HDFS directory {target} exists...", target: target);
        self.shell.mkdir_p(target)?;

        info!("Uploading {count} files to HDFS {target}...", count: staged.staged.len(), target: target);
        let copied = match self.config.copy_mode {
            CopyMode::Bulk => {
                self.shell.copy_from_local(&staged.staged, target)?;
                staged.staged.len()
            }
            CopyMode::PerFile => self.copy_each(&staged.staged, target)?,
        };

        info!("Sync complete: {copied} files copied to {target}", copied: copied, target: target);
        Ok(SyncReport {
            staged: staged.staged.len(),
            invalid: staged.invalid,
            copied,
        })
    }

    fn copy_each(&self, files: &[PathBuf], target: &str) -> Result<usize> {
        let mut copied = 0;
        let mut failed = Vec::new();
        for file in files {
            match self.shell.copy_from_local(std::slice::from_ref(file), target) {
                Ok(()) => copied += 1,
                Err(err) => {
                    let file_str = file.display().to_string();
                    let error_str = err.to_string();
                    error!("Failed to copy {file}: {error}", file: file_str.as_str(), error: error_str);
                    failed.push(file_str);
                }
            }
        }

        if failed.is_empty() {
            Ok(copied)
        } else {
            Err(HdfsError::PartialCopy { copied, failed })
        }
    }
}
