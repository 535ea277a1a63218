use crate::client::SolrApi;
use crate::error::Result;
use diagnostics::*;
use objstore::RemoteObject;

/// Counts for one indexing run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub indexed: usize,
    /// Payloads that were not valid JSON.
    pub invalid: usize,
    /// Documents Solr answered with a non-success status.
    pub failed: usize,
}

/// Result of offering one object to the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    Indexed,
    Invalid,
    Rejected { status: u16, body: String },
}

/// Posts JSON objects to a collection one document at a time.
pub struct Indexer<A> {
    api: A,
    collection: String,
}

impl<A: SolrApi> Indexer<A> {
    pub fn new(api: A, collection: impl Into<String>) -> Self {
        Self {
            api,
            collection: collection.into(),
        }
    }

    /// Only transport failures are errors; invalid JSON and rejected
    /// documents are reported in the outcome.
    pub fn index_object(&self, object: &RemoteObject) -> Result<DocumentOutcome> {
        let key = object.key.as_str();
        let Some(document) = object.parse_json() else {
            error!("Invalid JSON in file: {key}", key: key);
            return Ok(DocumentOutcome::Invalid);
        };

        let reply = self.api.add_document(&self.collection, &document)?;
        if reply.is_success() {
            info!("Document indexed from {key}", key: key);
            Ok(DocumentOutcome::Indexed)
        } else {
            error!("Failed to index document from {key}: {status} {body}", key: key, status: reply.status, body: reply.body.as_str());
            Ok(DocumentOutcome::Rejected {
                status: reply.status,
                body: reply.body,
            })
        }
    }

    /// Index every object. A source error aborts the run.
    pub fn index_all<I>(&self, objects: I) -> Result<IndexReport>
    where
        I: IntoIterator<Item = objstore::Result<RemoteObject>>,
    {
        let mut report = IndexReport::default();
        for object in objects {
            let object = object?;
            info!("Loading file: {key}", key: object.key.as_str());
            match self.index_object(&object)? {
                DocumentOutcome::Indexed => report.indexed += 1,
                DocumentOutcome::Invalid => report.invalid += 1,
                DocumentOutcome::Rejected { .. } => report.failed += 1,
            }
        }
        Ok(report)
    }
}
