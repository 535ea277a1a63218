// Error types for staging and copying into HDFS
use objstore::ObjectStoreError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum HdfsError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}: {stderr}", exit_code_display(.code))]
    Command {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("No JSON files staged in {}", .dir.display())]
    NothingStaged { dir: PathBuf },

    #[error("Copied {copied} files but {} failed: {}", .failed.len(), .failed.join(", "))]
    PartialCopy { copied: usize, failed: Vec<String> },

    #[error("Reading source objects failed: {0}")]
    Source(#[from] ObjectStoreError),
}

fn exit_code_display(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, HdfsError>;
