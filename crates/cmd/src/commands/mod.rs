pub mod index;
pub mod init_config;
pub mod load_table;
pub mod show_script;
pub mod sync;

pub use index::{index_bucket, index_command};
pub use init_config::init_config_command;
pub use load_table::{load_table_command, run_job};
pub use show_script::show_script_command;
pub use sync::{sync_bucket, sync_command};

use objstore::{Retrying, S3Store};
use std::process::ExitCode;

/// How a command that did its work ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finished {
    Clean,
    /// The job succeeded but its Livy session could not be deleted.
    SessionLeaked,
}

impl Finished {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Finished::Clean => ExitCode::SUCCESS,
            Finished::SessionLeaked => ExitCode::from(2),
        }
    }
}

pub(crate) fn open_bucket(config: &objstore::S3Config) -> objstore::Result<Retrying<S3Store>> {
    Ok(Retrying::new(S3Store::new(config)?, config.retry.clone()))
}
