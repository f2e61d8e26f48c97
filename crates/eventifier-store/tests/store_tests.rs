#![allow(clippy::unwrap_used, clippy::expect_used)]

use eventifier_core::baseline::BaselineSource;
use eventifier_core::errors::{ExErrorKind, Stage};
use eventifier_core::model::UserId;
use eventifier_store::{load_config, load_queue, load_snapshot, FsBaselineStore};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

#[test]
fn test_baseline_canonical_then_scan() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "campus_21/user_7.json", r#"{"id": 7, "wallet": 21}"#);
    write(dir.path(), "campus_9/user_7.json", r#"{"id": 7, "wallet": 9}"#);
    write(dir.path(), "campus_1/user_8.json", r#"{"id": 8, "wallet": 1}"#);

    let store = FsBaselineStore::new(dir.path());

    let canonical = store.resolve(&UserId::Number(7), Some(21)).unwrap();
    assert_eq!(canonical.wallet, Some(serde_json::json!(21)));

    // no campus: sorted scan, "campus_21" sorts before "campus_9"
    let scanned = store.resolve(&UserId::Number(7), None).unwrap();
    assert_eq!(scanned.wallet, Some(serde_json::json!(21)));

    // canonical miss falls back to scan
    let fallback = store.resolve(&UserId::Number(8), Some(21)).unwrap();
    assert_eq!(fallback.wallet, Some(serde_json::json!(1)));

    assert!(store.resolve(&UserId::Number(99), Some(21)).is_none());
}

#[test]
fn test_baseline_missing_root_is_none() {
    let store = FsBaselineStore::new("/nonexistent/eventifier/baselines");
    assert!(store.resolve(&UserId::Number(1), Some(21)).is_none());
}

#[test]
fn test_snapshot_must_be_array() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("users.json");
    fs::write(&good, r#"[{"id": 1}, "garbage", {"id": 2}]"#).unwrap();
    assert_eq!(load_snapshot(&good).unwrap().len(), 3);

    let object = dir.path().join("object.json");
    fs::write(&object, r#"{"id": 1}"#).unwrap();
    let err = load_snapshot(&object).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::SnapshotUnreadable);
    assert_eq!(err.stage(), Some(Stage::Snapshot));
    assert!(err.kind().is_fatal());

    let err = load_snapshot(&dir.path().join("missing.json")).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::SnapshotUnreadable);
}

#[test]
fn test_config_loading_errors() {
    let dir = TempDir::new().unwrap();

    let err = load_config(&dir.path().join("missing.json"), 21).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidConfiguration);

    let no_keys = dir.path().join("no_keys.json");
    fs::write(&no_keys, r#"{"internals": {"fields": ["wallet"]}}"#).unwrap();
    let err = load_config(&no_keys, 21).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ConfigurationMissing);
    assert_eq!(err.stage(), Some(Stage::Config));

    let full = dir.path().join("full.json");
    fs::write(
        &full,
        r#"{"internals": {"fields": ["wallet"]}, "hmac_keys": {"internal": "a", "external": "b"}}"#,
    )
    .unwrap();
    let config = load_config(&full, 42).unwrap();
    assert_eq!(config.internal_campus_id, 42);
    assert_eq!(config.external.fields, vec!["wallet"]);
}

#[test]
fn test_queue_skips_bad_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("queue.jsonl");
    fs::write(
        &path,
        concat!(
            r#"{"user_id": 1, "campus_id": 21, "changes": [{"path": "wallet", "old": 1, "new": 2}]}"#,
            "\n",
            "not json\n",
            "\n",
            r#"{"user_id": 2, "first_snapshot": true}"#,
            "\n"
        ),
    )
    .unwrap();

    let load = load_queue(&path).unwrap();
    assert_eq!(load.entries.len(), 2);
    assert_eq!(load.skipped_lines, vec![2]);
    assert_eq!(load.entries[0].changes[0].field, "wallet");
    assert!(load.entries[1].is_baseline_only());
}
