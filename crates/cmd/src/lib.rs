//! Commands behind the `e911` binary.

pub mod commands;
pub mod config;

pub use commands::Finished;
pub use config::{ConfigError, Pipeline, Settings};
