// Error types for Solr provisioning and indexing
use objstore::ObjectStoreError;

#[derive(Debug, thiserror::Error)]
pub enum SolrError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{action} for collection '{collection}' returned HTTP {status}: {body}")]
    Status {
        action: &'static str,
        collection: String,
        status: u16,
        body: String,
    },

    #[error("Cannot determine whether collection '{collection}' exists")]
    ExistenceUnknown { collection: String },

    #[error("Invalid Solr URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Reading source objects failed: {0}")]
    Source(#[from] ObjectStoreError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, SolrError>;
