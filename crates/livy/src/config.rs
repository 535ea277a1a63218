use crate::poll::PollPolicy;
use crate::script::SparkJob;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Settings for submitting the table-loading job through Livy.
///
/// The bearer token and passcode are supplied by the environment and never
/// serialized.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LivyConfig {
    /// Livy endpoint, usually behind a Knox proxy path.
    pub url: String,
    /// Session kind, e.g. `pyspark`.
    pub kind: String,
    pub request_timeout_secs: u64,
    pub insecure_tls: bool,
    /// Fields left out of a configuration file keep their defaults.
    #[serde(deserialize_with = "session_poll")]
    pub session_poll: PollPolicy,
    #[serde(deserialize_with = "statement_poll")]
    pub statement_poll: PollPolicy,
    pub job: SparkJob,
    #[serde(skip)]
    pub bearer_token: Option<String>,
    #[serde(skip)]
    pub passcode: Option<String>,
}

impl Default for LivyConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            kind: "pyspark".to_string(),
            request_timeout_secs: 60,
            insecure_tls: false,
            session_poll: default_session_poll(),
            statement_poll: default_statement_poll(),
            job: SparkJob::default(),
            bearer_token: None,
            passcode: None,
        }
    }
}

fn default_session_poll() -> PollPolicy {
    PollPolicy::fixed(Duration::from_secs(3)).with_deadline(Duration::from_secs(10 * 60))
}

fn default_statement_poll() -> PollPolicy {
    PollPolicy::fixed(Duration::from_secs(2)).with_deadline(Duration::from_secs(60 * 60))
}

fn session_poll<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PollPolicy, D::Error> {
    PollPolicy::deserialize_over(default_session_poll(), deserializer)
}

fn statement_poll<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PollPolicy, D::Error> {
    PollPolicy::deserialize_over(default_statement_poll(), deserializer)
}
