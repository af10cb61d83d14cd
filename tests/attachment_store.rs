// tests/attachment_store.rs
use std::fs;

use lead_search::{
    attachment::{Attachment, AttachmentStore, SessionStore},
    error::StorageWarning,
};

fn sheet() -> Attachment {
    Attachment::new(b"Name,City\nJane,Austin\n".to_vec(), "leads.csv", "")
}

#[test]
fn survives_reopen_within_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SessionStore::in_dir(dir.path(), 1024);
    store.save(&sheet()).unwrap();

    let reopened = SessionStore::in_dir(dir.path(), 1024);
    let back = reopened.load().expect("restored");
    assert_eq!(back, sheet());
    assert_eq!(back.mime_type, "text/csv");
}

#[test]
fn clear_empties_the_slot() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SessionStore::in_dir(dir.path(), 1024);
    store.save(&sheet()).unwrap();
    store.clear().unwrap();
    assert!(store.load().is_none());
    // clearing twice is fine
    store.clear().unwrap();
}

#[test]
fn too_large_warns_and_drops_the_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SessionStore::in_dir(dir.path(), 64);
    store.save(&sheet()).unwrap();

    let big = Attachment::new(vec![b'x'; 100], "big.csv", "");
    let err = store.save(&big).unwrap_err();
    assert!(matches!(err, StorageWarning::TooLarge { limit: 64, .. }));
    assert!(store.load().is_none());
}

#[test]
fn corrupt_record_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::in_dir(dir.path(), 1024);
    fs::write(store.path(), "{ not json").unwrap();
    assert!(store.load().is_none());
}

#[test]
fn record_keeps_the_data_uri_shape() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = SessionStore::in_dir(dir.path(), 1024);
    store.save(&sheet()).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw["fileName"], "leads.csv");
    assert!(raw["data"].as_str().unwrap().starts_with("data:text/csv;base64,"));
}
