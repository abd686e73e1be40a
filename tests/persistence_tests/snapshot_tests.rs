//! Tests for Snapshot
//!
//! These tests verify:
//! - JSON file layout
//! - Atomic replacement via the temp file
//! - Load fallbacks (missing, corrupt, wrong shape)

use std::fs;

use linekv::persistence::{LoadOutcome, Snapshot, SnapshotMap};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_snapshot() -> (TempDir, Snapshot) {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = Snapshot::new(temp_dir.path().join("db.json"));
    (temp_dir, snapshot)
}

fn map_of(pairs: &[(&str, &str)]) -> SnapshotMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// Save Tests
// =============================================================================

#[test]
fn test_snapshot_tmp_path_is_sibling() {
    let (temp_dir, snapshot) = setup_snapshot();

    assert_eq!(snapshot.path(), temp_dir.path().join("db.json"));
    assert_eq!(snapshot.tmp_path(), temp_dir.path().join("db.json.tmp"));
}

#[test]
fn test_snapshot_save_writes_flat_json_object() {
    let (_temp, snapshot) = setup_snapshot();

    snapshot.save(&map_of(&[("foo", "bar"), ("a", "1")])).unwrap();

    let raw = fs::read_to_string(snapshot.path()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, serde_json::json!({"foo": "bar", "a": "1"}));
}

#[test]
fn test_snapshot_save_removes_tmp_file() {
    let (_temp, snapshot) = setup_snapshot();

    snapshot.save(&map_of(&[("k", "v")])).unwrap();

    assert!(snapshot.path().exists());
    assert!(!snapshot.tmp_path().exists());
    assert_eq!(snapshot.save_count(), 1);
}

#[test]
fn test_snapshot_save_keeps_non_ascii_verbatim() {
    let (_temp, snapshot) = setup_snapshot();

    snapshot.save(&map_of(&[("clé", "valeur ñ 日本")])).unwrap();

    let raw = fs::read_to_string(snapshot.path()).unwrap();
    assert!(raw.contains("valeur ñ 日本"));
    assert_eq!(snapshot.load().get("clé"), Some(&"valeur ñ 日本".to_string()));
}

#[test]
fn test_snapshot_save_replaces_previous_contents() {
    let (_temp, snapshot) = setup_snapshot();

    snapshot.save(&map_of(&[("old", "1"), ("shared", "x")])).unwrap();
    snapshot.save(&map_of(&[("shared", "y")])).unwrap();

    assert_eq!(snapshot.load(), map_of(&[("shared", "y")]));
}

#[test]
fn test_snapshot_save_empty_map() {
    let (_temp, snapshot) = setup_snapshot();

    snapshot.save(&SnapshotMap::new()).unwrap();

    assert_eq!(fs::read_to_string(snapshot.path()).unwrap(), "{}");
    assert_eq!(snapshot.recover().1, LoadOutcome::Loaded { keys: 0 });
}

#[test]
fn test_snapshot_save_ignores_stale_tmp_file() {
    let (_temp, snapshot) = setup_snapshot();

    // Leftover from an interrupted save
    fs::write(snapshot.tmp_path(), b"{\"half").unwrap();
    snapshot.save(&map_of(&[("k", "v")])).unwrap();

    assert_eq!(snapshot.load(), map_of(&[("k", "v")]));
    assert!(!snapshot.tmp_path().exists());
}

#[test]
fn test_snapshot_save_into_missing_dir_fails() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = Snapshot::new(temp_dir.path().join("nope").join("db.json"));

    let err = snapshot.save(&map_of(&[("k", "v")])).unwrap_err();

    assert_eq!(err.kind(), "FileNotFoundError");
    assert_eq!(snapshot.save_count(), 0);
}

#[test]
fn test_snapshot_save_onto_directory_fails() {
    let (_temp, snapshot) = setup_snapshot();
    fs::create_dir(snapshot.path()).unwrap();

    let err = snapshot.save(&map_of(&[("k", "v")])).unwrap_err();

    assert_eq!(err.kind(), "IsADirectoryError");
}

#[test]
fn test_snapshot_save_under_file_parent_fails() {
    let temp_dir = TempDir::new().unwrap();
    let not_a_dir = temp_dir.path().join("plain_file");
    fs::write(&not_a_dir, b"x").unwrap();
    let snapshot = Snapshot::new(not_a_dir.join("db.json"));

    let err = snapshot.save(&map_of(&[("k", "v")])).unwrap_err();

    assert_eq!(err.kind(), "NotADirectoryError");
}

#[cfg(target_os = "linux")]
#[test]
fn test_snapshot_full_disk_label_independent_of_size() {
    let (_temp, snapshot) = setup_snapshot();
    std::os::unix::fs::symlink("/dev/full", snapshot.tmp_path()).unwrap();

    let small = map_of(&[("k", "v")]);
    let large: SnapshotMap = (0..2000)
        .map(|i| (format!("key{}", i), format!("value{}", i)))
        .collect();

    let small_err = snapshot.save(&small).unwrap_err();
    let large_err = snapshot.save(&large).unwrap_err();

    assert_eq!(small_err.kind(), "OSError");
    assert_eq!(large_err.kind(), "OSError");
    assert_eq!(snapshot.save_count(), 0);
    assert!(!snapshot.path().exists());
}

// =============================================================================
// Load Tests
// =============================================================================

#[test]
fn test_snapshot_load_missing_file() {
    let (_temp, snapshot) = setup_snapshot();

    let (map, outcome) = snapshot.recover();

    assert!(map.is_empty());
    assert_eq!(outcome, LoadOutcome::Missing);
}

#[test]
fn test_snapshot_load_corrupt_file_is_empty() {
    let (_temp, snapshot) = setup_snapshot();
    fs::write(snapshot.path(), b"{not json at all").unwrap();

    let (map, outcome) = snapshot.recover();

    assert!(map.is_empty());
    assert_eq!(outcome, LoadOutcome::Corrupt);
}

#[test]
fn test_snapshot_load_truncated_file_is_empty() {
    let (_temp, snapshot) = setup_snapshot();
    fs::write(snapshot.path(), b"{\"a\": \"1\", \"b\":").unwrap();

    assert!(snapshot.load().is_empty());
}

#[test]
fn test_snapshot_load_non_string_values_is_corrupt() {
    let (_temp, snapshot) = setup_snapshot();
    fs::write(snapshot.path(), br#"{"a": 1, "b": [true]}"#).unwrap();

    assert_eq!(snapshot.recover().1, LoadOutcome::Corrupt);
}

#[test]
fn test_snapshot_load_array_is_corrupt() {
    let (_temp, snapshot) = setup_snapshot();
    fs::write(snapshot.path(), b"[\"a\", \"b\"]").unwrap();

    assert_eq!(snapshot.recover().1, LoadOutcome::Corrupt);
}

#[test]
fn test_snapshot_load_written_by_hand() {
    let (_temp, snapshot) = setup_snapshot();
    fs::write(snapshot.path(), "{\n  \"foo\": \"bar\",\n  \"x\": \"with spaces\"\n}\n").unwrap();

    let (map, outcome) = snapshot.recover();

    assert_eq!(outcome, LoadOutcome::Loaded { keys: 2 });
    assert_eq!(map, map_of(&[("foo", "bar"), ("x", "with spaces")]));
}
