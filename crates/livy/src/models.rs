use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Livy hands out integer ids; they are kept opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StatementId(String);

macro_rules! opaque_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                #[derive(Deserialize)]
                #[serde(untagged)]
                enum Raw {
                    Number(i64),
                    Text(String),
                }
                Ok(match Raw::deserialize(deserializer)? {
                    Raw::Number(n) => Self(n.to_string()),
                    Raw::Text(s) => Self(s),
                })
            }
        }
    };
}

opaque_id!(SessionId);
opaque_id!(StatementId);

/// Session lifecycle as reported by `GET /sessions/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    Starting,
    Recovering,
    Idle,
    Running,
    Busy,
    ShuttingDown,
    Error,
    Dead,
    Killed,
    Success,
    #[default]
    #[serde(other)]
    Unknown,
}

impl SessionState {
    /// Absorbing states; a session here is abandoned.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            SessionState::Dead | SessionState::Error | SessionState::Killed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::NotStarted => "not_started",
            SessionState::Starting => "starting",
            SessionState::Recovering => "recovering",
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Busy => "busy",
            SessionState::ShuttingDown => "shutting_down",
            SessionState::Error => "error",
            SessionState::Dead => "dead",
            SessionState::Killed => "killed",
            SessionState::Success => "success",
            SessionState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statement lifecycle as reported by `GET /sessions/{id}/statements/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementState {
    Waiting,
    Running,
    Available,
    Error,
    Cancelling,
    Cancelled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl StatementState {
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            StatementState::Error | StatementState::Cancelling | StatementState::Cancelled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatementState::Waiting => "waiting",
            StatementState::Running => "running",
            StatementState::Available => "available",
            StatementState::Error => "error",
            StatementState::Cancelling => "cancelling",
            StatementState::Cancelled => "cancelled",
            StatementState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StatementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /sessions`.
#[derive(Serialize, Debug)]
pub struct CreateSession<'a> {
    pub kind: &'a str,
}

/// Body of `POST /sessions/{id}/statements`.
#[derive(Serialize, Debug)]
pub struct SubmitStatement<'a> {
    pub code: &'a str,
}

#[derive(Deserialize, Debug)]
pub struct SessionCreated {
    pub id: SessionId,
}

#[derive(Deserialize, Debug)]
pub struct SessionInfo {
    #[serde(default)]
    pub state: SessionState,
}

#[derive(Deserialize, Debug)]
pub struct StatementCreated {
    pub id: StatementId,
}

#[derive(Deserialize, Debug)]
pub struct StatementInfo {
    #[serde(default)]
    pub state: StatementState,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
}

/// A polled statement together with the raw response body, which is
/// reported verbatim when the statement fails.
#[derive(Debug, Clone)]
pub struct StatementReport {
    pub state: StatementState,
    pub output: Option<serde_json::Value>,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_accept_numbers_and_strings() {
        let created: SessionCreated = serde_json::from_str(r#"{"id": 42, "state": "starting"}"#)
            .expect("numeric id");
        assert_eq!(created.id.as_str(), "42");

        let created: StatementCreated =
            serde_json::from_str(r#"{"id": "s-7"}"#).expect("string id");
        assert_eq!(created.id.to_string(), "s-7");
    }

    #[test]
    fn test_session_states() {
        let info: SessionInfo = serde_json::from_str(r#"{"state": "shutting_down"}"#).expect("state");
        assert_eq!(info.state, SessionState::ShuttingDown);

        let info: SessionInfo = serde_json::from_str(r#"{"state": "hibernating"}"#).expect("other");
        assert_eq!(info.state, SessionState::Unknown);

        let info: SessionInfo = serde_json::from_str("{}").expect("missing");
        assert_eq!(info.state, SessionState::Unknown);

        for state in [SessionState::Dead, SessionState::Error, SessionState::Killed] {
            assert!(state.is_failure());
        }
        assert!(!SessionState::Idle.is_failure());
        assert!(!SessionState::Starting.is_failure());
    }

    #[test]
    fn test_statement_states() {
        let info: StatementInfo = serde_json::from_str(
            r#"{"id": 0, "state": "available", "output": {"status": "ok", "execution_count": 0}}"#,
        )
        .expect("statement");
        assert_eq!(info.state, StatementState::Available);
        assert_eq!(info.output.expect("output")["status"], "ok");

        assert!(StatementState::Error.is_failure());
        assert!(StatementState::Cancelling.is_failure());
        assert!(!StatementState::Running.is_failure());
        assert_eq!(StatementState::Cancelling.to_string(), "cancelling");
    }
}
