use crate::client::SessionApi;
use crate::config::LivyConfig;
use crate::error::{LivyError, Result};
use crate::models::{SessionId, SessionState, StatementId, StatementState};
use crate::poll::{PollPolicy, Poller};
use diagnostics::*;
use std::time::Duration;

/// Proof that a session was observed `idle`. Statements can only be
/// submitted and polled through one of these.
#[derive(Debug)]
pub struct IdleSession {
    id: SessionId,
}

impl IdleSession {
    pub fn id(&self) -> &SessionId {
        &self.id
    }
}

/// Outcome of releasing a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleanup {
    Released,
    /// The DELETE failed; the session may still hold cluster resources.
    Failed(String),
}

impl Cleanup {
    pub fn is_released(&self) -> bool {
        matches!(self, Cleanup::Released)
    }
}

/// A completed job. `output` is the statement output; `cleanup` reports
/// whether the session was released afterwards.
#[derive(Debug)]
pub struct JobOutcome {
    pub session: SessionId,
    pub statement: StatementId,
    pub output: serde_json::Value,
    pub cleanup: Cleanup,
}

/// Drives one session and one statement through their lifecycles.
pub struct JobController<A> {
    api: A,
    session_poll: PollPolicy,
    statement_poll: PollPolicy,
    sleep: Box<dyn Fn(Duration)>,
}

impl<A: SessionApi> JobController<A> {
    pub fn new(api: A, config: &LivyConfig) -> Self {
        Self::with_policies(api, config.session_poll.clone(), config.statement_poll.clone())
    }

    pub fn with_policies(api: A, session_poll: PollPolicy, statement_poll: PollPolicy) -> Self {
        Self {
            api,
            session_poll,
            statement_poll,
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace `std::thread::sleep` between polls.
    pub fn with_sleeper(mut self, sleep: impl Fn(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn create_session(&self, kind: &str) -> Result<SessionId> {
        let session = self.api.create_session(kind)?;
        info!("Created Livy session {session} of kind {kind}", session: session.as_str(), kind: kind);
        Ok(session)
    }

    /// Poll until the session is `idle`.
    pub fn await_idle(&self, session: &SessionId) -> Result<IdleSession> {
        let mut poller = Poller::new(format!("session {session}"), &self.session_poll, &*self.sleep);
        loop {
            let state = self.api.session_state(session)?;
            debug!("Session {session} is {state}", session: session.as_str(), state: state.as_str());

            if state == SessionState::Idle {
                info!("Session {session} is idle", session: session.as_str());
                return Ok(IdleSession {
                    id: session.clone(),
                });
            }
            if state.is_failure() {
                error!("Session {session} failed with state {state}", session: session.as_str(), state: state.as_str());
                return Err(LivyError::SessionFailed {
                    session: session.clone(),
                    state,
                });
            }
            poller.pause()?;
        }
    }

    pub fn submit_statement(&self, session: &IdleSession, code: &str) -> Result<StatementId> {
        let statement = self.api.submit_statement(&session.id, code)?;
        info!("Submitted statement {statement} to session {session}", statement: statement.as_str(), session: session.id.as_str());
        Ok(statement)
    }

    /// Poll until the statement is `available` and return its output.
    pub fn await_result(
        &self,
        session: &IdleSession,
        statement: &StatementId,
    ) -> Result<serde_json::Value> {
        let mut poller = Poller::new(
            format!("statement {statement} in session {}", session.id),
            &self.statement_poll,
            &*self.sleep,
        );
        loop {
            let report = self.api.statement(&session.id, statement)?;
            debug!("Statement {statement} is {state}", statement: statement.as_str(), state: report.state.as_str());

            if report.state == StatementState::Available {
                return Ok(report
                    .output
                    .unwrap_or_else(|| serde_json::Value::Object(Default::default())));
            }
            if report.state.is_failure() {
                return Err(LivyError::StatementFailed {
                    session: session.id.clone(),
                    statement: statement.clone(),
                    state: report.state,
                    detail: report.body,
                });
            }
            poller.pause()?;
        }
    }

    /// Delete the session. Failures are reported, never raised.
    pub fn destroy_session(&self, session: &SessionId) -> Cleanup {
        match self.api.delete_session(session) {
            Ok(()) => {
                info!("Deleted session {session}", session: session.as_str());
                Cleanup::Released
            }
            Err(err) => {
                let reason = err.to_string();
                warn!("Failed to delete session {session}: {reason}", session: session.as_str(), reason: reason.as_str());
                Cleanup::Failed(reason)
            }
        }
    }

    /// Run `code` in a fresh session of `kind`, then delete the session.
    ///
    /// The session is deleted even when the job fails; the job error is
    /// returned in that case.
    pub fn run(&self, kind: &str, code: &str) -> Result<JobOutcome> {
        let session = self.create_session(kind)?;

        let result = self.await_idle(&session).and_then(|idle| {
            let statement = self.submit_statement(&idle, code)?;
            let output = self.await_result(&idle, &statement)?;
            Ok((statement, output))
        });

        let cleanup = self.destroy_session(&session);
        let (statement, output) = result?;

        Ok(JobOutcome {
            session,
            statement,
            output,
            cleanup,
        })
    }
}
