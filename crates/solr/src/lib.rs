//! Provision a Solr collection and index JSON objects into it.

pub mod client;
pub mod config;
pub mod error;
pub mod indexer;
pub mod provision;

pub use client::{HttpSolrApi, Reply, SolrApi};
pub use config::{SolrConfig, UnknownExistence};
pub use error::{Result, SolrError};
pub use indexer::{DocumentOutcome, IndexReport, Indexer};
pub use provision::{AUTO_CREATE_FIELDS, Existence, Provisioned, Provisioner};
