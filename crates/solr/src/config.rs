use serde::{Deserialize, Serialize};

/// What to do when the collection listing cannot be interpreted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownExistence {
    /// Attempt creation anyway (at-least-once provisioning).
    #[default]
    Create,
    /// Stop before touching the cluster.
    Abort,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SolrConfig {
    /// Solr base URL, usually behind a Knox proxy path.
    pub url: String,
    pub collection: String,
    pub num_shards: u32,
    pub replication_factor: u32,
    pub on_unknown_existence: UnknownExistence,
    pub request_timeout_secs: u64,
    pub insecure_tls: bool,
    #[serde(skip)]
    pub bearer_token: Option<String>,
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            collection: "e911_demo_collection".to_string(),
            num_shards: 1,
            replication_factor: 1,
            on_unknown_existence: UnknownExistence::Create,
            request_timeout_secs: 60,
            insecure_tls: false,
            bearer_token: None,
        }
    }
}
