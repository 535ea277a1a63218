//! Run a single statement in a remote Livy session.
//!
//! [`JobController`] creates a session, waits for it to become idle,
//! submits the statement, waits for its output and deletes the session.
//! Statements are only reachable through an [`IdleSession`], so nothing is
//! submitted to or polled from a session that has not reached `idle`.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod poll;
pub mod script;

pub use client::{HttpSessionApi, SessionApi};
pub use config::LivyConfig;
pub use controller::{Cleanup, IdleSession, JobController, JobOutcome};
pub use error::{LivyError, Result};
pub use models::{SessionId, SessionState, StatementId, StatementReport, StatementState};
pub use poll::PollPolicy;
pub use script::SparkJob;
