use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How staged files are pushed to HDFS.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CopyMode {
    /// One `copyFromLocal` for every staged file; all or nothing.
    #[default]
    Bulk,
    /// One `copyFromLocal` per file; every file is attempted.
    PerFile,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct HdfsConfig {
    /// Local staging directory.
    pub local_dir: PathBuf,
    /// Target directory in HDFS.
    pub hdfs_dir: String,
    /// The `hdfs` executable.
    pub program: String,
    pub copy_mode: CopyMode,
}

impl Default for HdfsConfig {
    fn default() -> Self {
        Self {
            local_dir: PathBuf::from("/tmp/e911_s3/"),
            hdfs_dir: "/tmp/e911/".to_string(),
            program: "hdfs".to_string(),
            copy_mode: CopyMode::Bulk,
        }
    }
}
