use backon::ExponentialBuilder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the source bucket.
///
/// Credentials are never read from or written to configuration files;
/// the binary fills them in from the environment.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint (MinIO, Ceph). Enables path-style addressing.
    pub endpoint: Option<String>,
    /// Only keys under this prefix are listed.
    pub prefix: String,
    pub retry: RetryConfig,
    #[serde(skip)]
    pub access_key: Option<String>,
    #[serde(skip)]
    pub secret_key: Option<String>,
}

/// Retry policy for listing and fetching objects.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt; 0 disables retrying.
    pub max_times: usize,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryConfig {
    pub fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(self.min_delay_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
            .with_max_times(self.max_times)
            .with_jitter()
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_times: 3,
            min_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: "e911-fake-calls".to_string(),
            region: "us-gov-west-1".to_string(),
            endpoint: None,
            prefix: String::new(),
            retry: RetryConfig::default(),
            access_key: None,
            secret_key: None,
        }
    }
}
