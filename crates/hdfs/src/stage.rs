use crate::error::{HdfsError, Result};
use diagnostics::*;
use objstore::RemoteObject;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Files written by one staging pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    /// In source order, without duplicates.
    pub staged: Vec<PathBuf>,
    /// Payloads skipped because they were not valid JSON.
    pub invalid: usize,
}

/// Writes valid JSON objects into a local directory, one file per object
/// named after the last component of its key.
pub struct Stager {
    dir: PathBuf,
}

impl Stager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the staging directory and any missing parents.
    pub fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|source| HdfsError::Io {
            path: self.dir.clone(),
            source,
        })
    }

    /// Write one object. Returns `None` when the payload is not JSON.
    pub fn stage_object(&self, object: &RemoteObject) -> Result<Option<PathBuf>> {
        let key = object.key.as_str();
        if object.parse_json().is_none() {
            warn!("Invalid JSON skipped: {key}", key: key);
            return Ok(None);
        }

        let path = self.dir.join(object.file_name());
        std::fs::write(&path, &object.payload).map_err(|source| HdfsError::Io {
            path: path.clone(),
            source,
        })?;
        info!("Downloaded {key}", key: key);
        Ok(Some(path))
    }

    pub fn stage<I>(&self, objects: I) -> Result<StageReport>
    where
        I: IntoIterator<Item = objstore::Result<RemoteObject>>,
    {
        self.prepare()?;

        let mut report = StageReport::default();
        let mut seen = HashSet::new();
        for object in objects {
            let object = object?;
            match self.stage_object(&object)? {
                Some(path) if !seen.insert(path.clone()) => {
                    let path_str = path.display().to_string();
                    warn!("{key} overwrote {path}, staged earlier from another key", key: object.key.as_str(), path: path_str);
                }
                Some(path) => report.staged.push(path),
                None => report.invalid += 1,
            }
        }
        Ok(report)
    }
}
