use crate::error::{HdfsError, Result};
use diagnostics::*;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

/// The `hdfs dfs` operations the syncer needs.
pub trait DfsShell {
    /// `mkdir -p`; succeeds when the directory already exists.
    fn mkdir_p(&self, dir: &str) -> Result<()>;

    /// `copyFromLocal -f`, overwriting existing files.
    fn copy_from_local(&self, files: &[PathBuf], dir: &str) -> Result<()>;
}

impl<T: DfsShell + ?Sized> DfsShell for &T {
    fn mkdir_p(&self, dir: &str) -> Result<()> {
        (**self).mkdir_p(dir)
    }

    fn copy_from_local(&self, files: &[PathBuf], dir: &str) -> Result<()> {
        (**self).copy_from_local(files, dir)
    }
}

/// Runs the Hadoop command-line client. The exit status is the only
/// success signal.
pub struct HdfsCli {
    program: String,
}

impl HdfsCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub(crate) fn dfs_args(op: &str, flags: &[&str], operands: &[OsString]) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["dfs".into(), op.into()];
        args.extend(flags.iter().map(OsString::from));
        args.extend(operands.iter().cloned());
        args
    }

    fn run(&self, args: Vec<OsString>) -> Result<()> {
        let command = std::iter::once(self.program.clone())
            .chain(args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ");
        debug!("Running {command}", command: command.as_str());

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| HdfsError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(HdfsError::Command {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl DfsShell for HdfsCli {
    fn mkdir_p(&self, dir: &str) -> Result<()> {
        self.run(Self::dfs_args("-mkdir", &["-p"], &[dir.into()]))
    }

    fn copy_from_local(&self, files: &[PathBuf], dir: &str) -> Result<()> {
        let mut operands: Vec<OsString> = files.iter().map(|f| f.clone().into_os_string()).collect();
        operands.push(dir.into());
        self.run(Self::dfs_args("-copyFromLocal", &["-f"], &operands))
    }
}
