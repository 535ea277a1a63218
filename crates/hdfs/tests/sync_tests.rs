use anyhow::Result;
use hdfs::{CopyMode, HdfsConfig, HdfsError, Stager, SyncReport, Syncer};
use objstore::{MemoryStore, ObjectStoreError, json_objects};
use tempfile::TempDir;

use recording_shell::RecordingShell;

fn config(staging: &TempDir) -> HdfsConfig {
    HdfsConfig {
        local_dir: staging.path().join("e911_s3"),
        hdfs_dir: "/tmp/e911/".to_string(),
        ..HdfsConfig::default()
    }
}

/// bad.json never reaches the staging directory and staging continues
#[test]
fn test_invalid_json_is_not_staged() -> Result<()> {
    let staging = tempfile::tempdir()?;
    let bucket = MemoryStore::new("calls")
        .with_object("bad.json", "{invalid")
        .with_object("good.json", r#"{"id":2}"#);
    let stager = Stager::new(staging.path().join("nested/dir"));

    let report = stager.stage(json_objects(&bucket))?;

    assert_eq!(report.invalid, 1);
    assert_eq!(report.staged, vec![stager.dir().join("good.json")]);
    assert!(!stager.dir().join("bad.json").exists());
    assert_eq!(std::fs::read_to_string(stager.dir().join("good.json"))?, r#"{"id":2}"#);
    Ok(())
}

/// Nothing valid to copy: fail before running any HDFS command
#[test]
fn test_nothing_staged_fails_fast() -> Result<()> {
    let staging = tempfile::tempdir()?;
    let bucket = MemoryStore::new("calls")
        .with_object("bad.json", "{invalid")
        .with_object("notes.txt", "{}");
    let shell = RecordingShell::new();
    let config = config(&staging);

    let err = Syncer::new(&shell, &config)
        .sync(json_objects(&bucket))
        .expect_err("nothing staged");

    assert!(matches!(err, HdfsError::NothingStaged { .. }));
    assert!(shell.commands().is_empty());
    Ok(())
}

/// Staged files are copied with a single command
#[test]
fn test_bulk_copy() -> Result<()> {
    let staging = tempfile::tempdir()?;
    let bucket = MemoryStore::new("calls")
        .with_object("2024/01/a.json", r#"{"id":1}"#)
        .with_object("2024/01/b.JSON", r#"{"id":2}"#)
        .with_object("2024/01/c.csv", "id\n3");
    let shell = RecordingShell::new();
    let config = config(&staging);

    let report = Syncer::new(&shell, &config).sync(json_objects(&bucket))?;

    assert_eq!(
        report,
        SyncReport {
            staged: 2,
            invalid: 0,
            copied: 2
        }
    );
    assert_eq!(
        shell.commands(),
        vec!["mkdir -p /tmp/e911/", "copyFromLocal -f a.json b.JSON /tmp/e911/"]
    );
    assert!(config.local_dir.join("a.json").exists());
    assert!(!config.local_dir.join("c.csv").exists());
    Ok(())
}

/// A failed bulk copy fails the whole run
#[test]
fn test_bulk_copy_failure_is_fatal() -> Result<()> {
    let staging = tempfile::tempdir()?;
    let bucket = MemoryStore::new("calls")
        .with_object("a.json", "{}")
        .with_object("b.json", "{}");
    let shell = RecordingShell::new().failing_copy_of("b.json");
    let config = config(&staging);

    let err = Syncer::new(&shell, &config)
        .sync(json_objects(&bucket))
        .expect_err("copy failed");

    assert!(matches!(err, HdfsError::Command { code: Some(1), .. }));
    Ok(())
}

/// Per-file mode attempts every file and reports the failures
#[test]
fn test_per_file_copy_attempts_every_file() -> Result<()> {
    let staging = tempfile::tempdir()?;
    let bucket = MemoryStore::new("calls")
        .with_object("a.json", "{}")
        .with_object("b.json", "{}")
        .with_object("c.json", "[]");
    let shell = RecordingShell::new().failing_copy_of("b.json");
    let config = HdfsConfig {
        copy_mode: CopyMode::PerFile,
        ..config(&staging)
    };

    let err = Syncer::new(&shell, &config)
        .sync(json_objects(&bucket))
        .expect_err("one copy failed");

    match err {
        HdfsError::PartialCopy { copied, failed } => {
            assert_eq!(copied, 2);
            assert_eq!(failed.len(), 1);
            assert!(failed[0].ends_with("b.json"));
        }
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(shell.commands().len(), 4);
    Ok(())
}

#[test]
fn test_mkdir_failure_prevents_copy() -> Result<()> {
    let staging = tempfile::tempdir()?;
    let bucket = MemoryStore::new("calls").with_object("a.json", "{}");
    let shell = RecordingShell::new().failing_mkdir();
    let config = config(&staging);

    assert!(Syncer::new(&shell, &config).sync(json_objects(&bucket)).is_err());
    assert_eq!(shell.commands(), vec!["mkdir -p /tmp/e911/"]);
    Ok(())
}

/// Keys with the same basename land in one file, copied once
#[test]
fn test_duplicate_basenames_are_copied_once() -> Result<()> {
    let staging = tempfile::tempdir()?;
    let bucket = MemoryStore::new("calls")
        .with_object("east/call.json", r#"{"region":"east"}"#)
        .with_object("west/call.json", r#"{"region":"west"}"#);
    let shell = RecordingShell::new();
    let config = config(&staging);

    let report = Syncer::new(&shell, &config).sync(json_objects(&bucket))?;

    assert_eq!(report.staged, 1);
    assert_eq!(
        std::fs::read_to_string(config.local_dir.join("call.json"))?,
        r#"{"region":"west"}"#
    );
    Ok(())
}

/// Stale files from an earlier run are not swept into the copy
#[test]
fn test_only_this_runs_files_are_copied() -> Result<()> {
    let staging = tempfile::tempdir()?;
    let config = config(&staging);
    std::fs::create_dir_all(&config.local_dir)?;
    std::fs::write(config.local_dir.join("stale.json"), "{}")?;
    let bucket = MemoryStore::new("calls").with_object("fresh.json", "{}");
    let shell = RecordingShell::new();

    Syncer::new(&shell, &config).sync(json_objects(&bucket))?;

    assert_eq!(shell.commands()[1], "copyFromLocal -f fresh.json /tmp/e911/");
    Ok(())
}

#[test]
fn test_source_error_aborts_staging() -> Result<()> {
    let staging = tempfile::tempdir()?;
    let bucket = MemoryStore::new("calls").with_object("a.json", "{}");
    bucket.fail_next(ObjectStoreError::ListStatus {
        bucket: "calls".to_string(),
        status: 500,
    });
    let shell = RecordingShell::new();
    let config = config(&staging);

    let err = Syncer::new(&shell, &config)
        .sync(json_objects(&bucket))
        .expect_err("listing failed");

    assert!(matches!(err, HdfsError::Source(_)));
    assert!(shell.commands().is_empty());
    Ok(())
}

#[test]
fn test_config_yaml() -> Result<()> {
    let config: HdfsConfig = serde_yaml_ng::from_str("hdfs_dir: /data/e911\ncopy_mode: per-file\n")?;
    assert_eq!(config.hdfs_dir, "/data/e911");
    assert_eq!(config.copy_mode, CopyMode::PerFile);
    assert_eq!(config.program, "hdfs");
    Ok(())
}

/// Repeated basenames across many keys keep first-seen order, once each
#[test]
fn test_stage_dedupes_interleaved_basenames() -> Result<()> {
    let staging = tempfile::tempdir()?;
    let mut bucket = MemoryStore::new("calls");
    for region in ["a", "b", "c", "d"] {
        for name in ["x", "y", "z"] {
            bucket = bucket.with_object(format!("{region}/{name}.json"), format!(r#"{{"region":"{region}"}}"#));
        }
    }
    let stager = Stager::new(staging.path());

    let report = stager.stage(json_objects(&bucket))?;

    let names: Vec<String> = report
        .staged
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    assert_eq!(names, vec!["x.json", "y.json", "z.json"]);
    assert_eq!(
        std::fs::read_to_string(stager.dir().join("y.json"))?,
        r#"{"region":"d"}"#
    );
    Ok(())
}
