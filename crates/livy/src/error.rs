// Error types for Livy session and statement handling
use crate::models::{SessionId, SessionState, StatementId, StatementState};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum LivyError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} returned HTTP {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Unparseable response from {url}: {source}")]
    Response {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid Livy URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Session {session} failed with state: {state}")]
    SessionFailed {
        session: SessionId,
        state: SessionState,
    },

    #[error("Statement {statement} in session {session} failed with state {state}: {detail}")]
    StatementFailed {
        session: SessionId,
        statement: StatementId,
        state: StatementState,
        detail: String,
    },

    #[error("Timed out after {waited:?} waiting for {what}")]
    TimedOut { what: String, waited: Duration },

    #[error("Job script template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LivyError {
    /// True when the remote session or statement reached a failure state.
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            LivyError::SessionFailed { .. } | LivyError::StatementFailed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LivyError>;
