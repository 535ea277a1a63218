//! Copy JSON objects into HDFS through a local staging directory.
//!
//! Objects are validated and written to the staging directory first, then
//! pushed with `hdfs dfs -copyFromLocal`. Nothing is copied when no file was
//! staged.

pub mod config;
pub mod error;
pub mod shell;
pub mod stage;
pub mod sync;

pub use config::{CopyMode, HdfsConfig};
pub use error::{HdfsError, Result};
pub use shell::{DfsShell, HdfsCli};
pub use stage::{StageReport, Stager};
pub use sync::{SyncReport, Syncer};
