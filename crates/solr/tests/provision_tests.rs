use anyhow::Result;
use solr::{
    AUTO_CREATE_FIELDS, Existence, Provisioned, Provisioner, SolrConfig, SolrError,
    UnknownExistence,
};

use fake_solr::FakeSolr;

fn config() -> SolrConfig {
    SolrConfig {
        url: "https://solr.example/solr/".to_string(),
        collection: "e911_demo_collection".to_string(),
        ..SolrConfig::default()
    }
}

/// A missing collection is created and configured once
#[test]
fn test_creates_missing_collection() -> Result<()> {
    let solr = FakeSolr::new().with_collection("other");
    let config = config();
    let provisioner = Provisioner::new(&solr, &config);

    assert_eq!(provisioner.exists()?, Existence::Absent);
    assert_eq!(provisioner.ensure()?, Provisioned::Created);

    assert_eq!(solr.count("create e911_demo_collection 1 1"), 1);
    assert_eq!(solr.count("config"), 1);
    assert_eq!(
        solr.property("e911_demo_collection", AUTO_CREATE_FIELDS).as_deref(),
        Some("true")
    );
    Ok(())
}

/// Running twice takes the already-exists branch the second time
#[test]
fn test_ensure_is_idempotent() -> Result<()> {
    let solr = FakeSolr::new();
    let config = config();
    let provisioner = Provisioner::new(&solr, &config);

    assert_eq!(provisioner.ensure()?, Provisioned::Created);
    assert_eq!(provisioner.ensure()?, Provisioned::AlreadyExisted);
    assert_eq!(provisioner.ensure()?, Provisioned::AlreadyExisted);

    assert_eq!(solr.count("create"), 1);
    assert_eq!(solr.count("config"), 1);
    assert_eq!(solr.count("list"), 3);
    Ok(())
}

#[test]
fn test_shards_and_replicas_come_from_config() -> Result<()> {
    let solr = FakeSolr::new();
    let config = SolrConfig {
        num_shards: 2,
        replication_factor: 3,
        ..config()
    };

    Provisioner::new(&solr, &config).ensure()?;

    assert_eq!(solr.count("create e911_demo_collection 2 3"), 1);
    Ok(())
}

/// Garbage from LIST is "unknown" and, by default, provisioning proceeds
#[test]
fn test_malformed_listing_defaults_to_create() -> Result<()> {
    let solr = FakeSolr::new().with_list_reply(200, "<html>Knox login</html>");
    let config = config();
    let provisioner = Provisioner::new(&solr, &config);

    assert_eq!(provisioner.exists()?, Existence::Unknown);
    assert_eq!(provisioner.ensure()?, Provisioned::Created);
    assert_eq!(solr.count("create"), 1);
    Ok(())
}

#[test]
fn test_failed_listing_is_unknown() -> Result<()> {
    let solr = FakeSolr::new().with_list_reply(503, r#"{"error": "unavailable"}"#);
    let config = config();

    assert_eq!(Provisioner::new(&solr, &config).exists()?, Existence::Unknown);
    Ok(())
}

/// With abort, an unknown answer stops before any create call
#[test]
fn test_unknown_existence_can_abort() {
    let solr = FakeSolr::new().with_list_reply(200, "not json");
    let config = SolrConfig {
        on_unknown_existence: UnknownExistence::Abort,
        ..config()
    };

    let err = Provisioner::new(&solr, &config).ensure().expect_err("abort");

    assert!(matches!(err, SolrError::ExistenceUnknown { .. }));
    assert_eq!(solr.count("create"), 0);
}

/// A broken LIST followed by a rejected create re-reads the listing and
/// goes on when the collection is there
#[test]
fn test_rejected_create_of_existing_collection_proceeds() -> Result<()> {
    let solr = FakeSolr::new()
        .with_collection("e911_demo_collection")
        .with_list_reply_times(500, "boom", 1);
    let config = config();

    assert_eq!(Provisioner::new(&solr, &config).ensure()?, Provisioned::AlreadyExisted);

    assert_eq!(solr.count("list"), 2);
    assert_eq!(solr.count("create"), 1);
    assert_eq!(solr.count("config"), 0);
    Ok(())
}

/// The create rejection stands when the collection still cannot be seen
#[test]
fn test_rejected_create_without_collection_fails() {
    let solr = FakeSolr::new()
        .with_collection("e911_demo_collection")
        .with_list_reply(500, "boom");
    let config = config();

    let err = Provisioner::new(&solr, &config).ensure().expect_err("create rejected");

    match err {
        SolrError::Status { action, status, .. } => {
            assert_eq!(action, "CREATE");
            assert_eq!(status, 400);
        }
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(solr.count("list"), 2);
    assert_eq!(solr.count("config"), 0);
}

#[test]
fn test_config_yaml() -> Result<()> {
    let config: SolrConfig = serde_yaml_ng::from_str(
        "url: https://solr.example/solr\ncollection: calls\non_unknown_existence: abort\n",
    )?;
    assert_eq!(config.collection, "calls");
    assert_eq!(config.num_shards, 1);
    assert_eq!(config.on_unknown_existence, UnknownExistence::Abort);
    assert!(config.bearer_token.is_none());
    Ok(())
}
