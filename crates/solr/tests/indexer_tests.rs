use anyhow::Result;
use objstore::{MemoryStore, ObjectStoreError, RemoteObject, json_objects};
use serde_json::json;
use solr::{DocumentOutcome, IndexReport, Indexer, SolrError};

use fake_solr::FakeSolr;

const COLLECTION: &str = "e911_demo_collection";

/// a.json is posted, b.txt is never looked at
#[test]
fn test_indexes_only_json_objects() -> Result<()> {
    let bucket = MemoryStore::new("e911-fake-calls")
        .with_object("a.json", r#"{"id":1}"#)
        .with_object("b.txt", "hello");
    let solr = FakeSolr::new().with_collection(COLLECTION);

    let report = Indexer::new(&solr, COLLECTION).index_all(json_objects(&bucket))?;

    assert_eq!(
        report,
        IndexReport {
            indexed: 1,
            invalid: 0,
            failed: 0
        }
    );
    assert_eq!(solr.documents(), vec![(COLLECTION.to_string(), json!({"id": 1}))]);
    assert_eq!(bucket.fetched(), vec!["a.json".to_string()]);
    Ok(())
}

/// Invalid payloads are skipped and the run continues
#[test]
fn test_invalid_json_is_skipped() -> Result<()> {
    let bucket = MemoryStore::new("calls")
        .with_object("1.json", "{invalid")
        .with_object("2.json", r#"{"id":2,"caller":"555-0100"}"#)
        .with_object("3.json", "");
    let solr = FakeSolr::new().with_collection(COLLECTION);

    let report = Indexer::new(&solr, COLLECTION).index_all(json_objects(&bucket))?;

    assert_eq!(report.indexed, 1);
    assert_eq!(report.invalid, 2);
    assert_eq!(solr.count("add"), 1);
    Ok(())
}

/// A rejected document is counted and the next one still goes out
#[test]
fn test_rejected_document_does_not_stop_the_run() -> Result<()> {
    let bucket = MemoryStore::new("calls")
        .with_object("1.json", r#"{"id":1}"#)
        .with_object("2.json", r#"{"id":2}"#)
        .with_object("3.json", r#"{"id":3}"#);
    let solr = FakeSolr::new().with_collection(COLLECTION).rejecting(2);

    let report = Indexer::new(&solr, COLLECTION).index_all(json_objects(&bucket))?;

    assert_eq!(
        report,
        IndexReport {
            indexed: 2,
            invalid: 0,
            failed: 1
        }
    );
    assert_eq!(solr.count("add"), 3);
    Ok(())
}

#[test]
fn test_index_object_outcomes() -> Result<()> {
    let solr = FakeSolr::new().with_collection(COLLECTION).rejecting(9);
    let indexer = Indexer::new(&solr, COLLECTION);

    assert_eq!(
        indexer.index_object(&RemoteObject::new("ok.json", r#"{"id":1}"#))?,
        DocumentOutcome::Indexed
    );
    assert_eq!(
        indexer.index_object(&RemoteObject::new("bad.json", "{invalid"))?,
        DocumentOutcome::Invalid
    );
    assert!(matches!(
        indexer.index_object(&RemoteObject::new("no.json", r#"{"id":9}"#))?,
        DocumentOutcome::Rejected { status: 400, .. }
    ));
    Ok(())
}

/// Failing to read the bucket aborts indexing
#[test]
fn test_source_error_is_fatal() {
    let bucket = MemoryStore::new("calls").with_object("1.json", r#"{"id":1}"#);
    bucket.fail_next(ObjectStoreError::ListStatus {
        bucket: "calls".to_string(),
        status: 403,
    });
    let solr = FakeSolr::new().with_collection(COLLECTION);

    let err = Indexer::new(&solr, COLLECTION)
        .index_all(json_objects(&bucket))
        .expect_err("listing failed");

    assert!(matches!(err, SolrError::Source(_)));
    assert_eq!(solr.count("add"), 0);
}
