//! Settings for every pipeline: an optional YAML file overlaid with
//! environment variables.
//!
//! Secrets only ever come from the environment. The environment is read
//! through a lookup function so callers can supply their own.

use hdfs::HdfsConfig;
use livy::LivyConfig;
use objstore::S3Config;
use serde::{Deserialize, Serialize};
use solr::SolrConfig;
use std::path::{Path, PathBuf};

pub const LIVY_URL: &str = "LIVY_URL";
pub const LIVY_KNOX_BEARER_TOKEN: &str = "LIVY_KNOX_BEARER_TOKEN";
pub const LIVY_KNOX_PASSCODE_TOKEN: &str = "LIVY_KNOX_PASSCODE_TOKEN";
pub const SOLR_URL: &str = "SOLR_URL";
pub const KNOX_BEARER_TOKEN: &str = "KNOX_BEARER_TOKEN";
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_REGION: &str = "AWS_REGION";
pub const S3_BUCKET: &str = "S3_BUCKET";
pub const S3_ENDPOINT: &str = "S3_ENDPOINT";
pub const E911_LOCAL_DIR: &str = "E911_LOCAL_DIR";
pub const E911_HDFS_DIR: &str = "E911_HDFS_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// The pipelines, each with its own required settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    LoadTable,
    Index,
    Sync,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub livy: LivyConfig,
    pub solr: SolrConfig,
    pub s3: S3Config,
    pub hdfs: HdfsConfig,
}

/// Reads the process environment. Empty values count as unset.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

impl Settings {
    /// Load the YAML file at `path`, or the defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml_ng::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay values found through `lookup` on top of the current ones.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        if let Some(url) = get(LIVY_URL) {
            self.livy.url = url;
        }
        if let Some(token) = get(LIVY_KNOX_BEARER_TOKEN) {
            self.livy.bearer_token = Some(token);
        }
        if let Some(passcode) = get(LIVY_KNOX_PASSCODE_TOKEN) {
            self.livy.passcode = Some(passcode);
        }

        if let Some(url) = get(SOLR_URL) {
            self.solr.url = url;
        }
        if let Some(token) = get(KNOX_BEARER_TOKEN) {
            self.solr.bearer_token = Some(token);
        }

        if let Some(key) = get(AWS_ACCESS_KEY_ID) {
            self.s3.access_key = Some(key);
        }
        if let Some(secret) = get(AWS_SECRET_ACCESS_KEY) {
            self.s3.secret_key = Some(secret);
        }
        if let Some(region) = get(AWS_REGION) {
            self.s3.region = region;
        }
        if let Some(bucket) = get(S3_BUCKET) {
            self.s3.bucket = bucket;
        }
        if let Some(endpoint) = get(S3_ENDPOINT) {
            self.s3.endpoint = Some(endpoint);
        }

        if let Some(dir) = get(E911_LOCAL_DIR) {
            self.hdfs.local_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(E911_HDFS_DIR) {
            self.hdfs.hdfs_dir = dir;
        }
    }

    /// Fail on the first setting `pipeline` cannot run without, naming the
    /// environment variable that supplies it.
    pub fn require(&self, pipeline: Pipeline) -> Result<(), ConfigError> {
        match pipeline {
            Pipeline::LoadTable => {
                present(!self.livy.url.is_empty(), LIVY_URL)?;
                present(self.livy.bearer_token.is_some(), LIVY_KNOX_BEARER_TOKEN)?;
                present(self.livy.passcode.is_some(), LIVY_KNOX_PASSCODE_TOKEN)
            }
            Pipeline::Index => {
                present(!self.solr.url.is_empty(), SOLR_URL)?;
                present(self.solr.bearer_token.is_some(), KNOX_BEARER_TOKEN)?;
                self.require_s3()
            }
            Pipeline::Sync => self.require_s3(),
        }
    }

    fn require_s3(&self) -> Result<(), ConfigError> {
        present(self.s3.access_key.is_some(), AWS_ACCESS_KEY_ID)?;
        present(self.s3.secret_key.is_some(), AWS_SECRET_ACCESS_KEY)
    }
}

fn present(ok: bool, name: &'static str) -> Result<(), ConfigError> {
    if ok { Ok(()) } else { Err(ConfigError::Missing(name)) }
}
