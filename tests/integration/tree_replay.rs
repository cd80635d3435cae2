//! Loading trees and event scripts from disk and replaying them.

use tempfile::TempDir;
use when_engine::context::ResolverSettings;
use when_engine::error::ApiError;
use when_engine::registry::ElementNode;
use when_engine::session::{ScriptedEvent, Session};

const TREE: &str = r#"{"id":"root","type":"root","children":[
    {"id":"qty","type":"textfield","parent":"root",
     "do":[{"actionType":"input","interactionType":"context","policy":"(qty,_value)"}]},
    {"id":"buy","type":"button","parent":"root",
     "do":[
        {"actionType":"click","interactionType":"callback","policy":"order(_context_value(qty))"},
        {"actionType":"click","interactionType":"update","policy":"(buy,enabled,false)"}
     ]}
]}"#;

const SCRIPT: &str = r#"[
    {"target":"qty","kind":"input","value":"12"},
    {"target":"buy","kind":"click"}
]"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_replay_from_files() {
    let dir = TempDir::new().unwrap();
    let root = ElementNode::from_path(&write(&dir, "tree.json", TREE)).unwrap();
    let script = ScriptedEvent::load_script(&write(&dir, "events.json", SCRIPT)).unwrap();
    assert_eq!(script.len(), 2);

    let session = Session::from_tree(&root, ResolverSettings::default());
    session.replay(&script);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.submissions[0].function, "order(12)");
    let buy = snapshot.elements.iter().find(|e| e.id == "buy").unwrap();
    assert_eq!(buy.attributes[0].key, "enabled");
    assert_eq!(buy.attributes[0].value, "false");
}

#[test]
fn test_snapshot_serializes_for_the_cli() {
    let root = ElementNode::from_json(TREE).unwrap();
    let session = Session::from_tree(&root, ResolverSettings::default());
    let script: Vec<ScriptedEvent> = serde_json::from_str(SCRIPT).unwrap();
    session.replay(&script);

    let value = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(value["context"][0]["key"], "qty");
    assert_eq!(value["context"][0]["value"], "12");
    assert_eq!(value["submissions"][0]["context"][0]["value"], "12");
}

#[test]
fn test_malformed_tree_is_rejected() {
    let dir = TempDir::new().unwrap();
    let result = ElementNode::from_path(&write(&dir, "tree.json", r#"{"id":"root"}"#));
    assert!(matches!(result, Err(ApiError::InvalidTree(_))));
}

#[test]
fn test_malformed_script_is_rejected() {
    let dir = TempDir::new().unwrap();
    let result = ScriptedEvent::load_script(&write(
        &dir,
        "events.json",
        r#"[{"target":"a","kind":"hover"}]"#,
    ));
    assert!(matches!(result, Err(ApiError::InvalidScript(_))));
}

#[test]
fn test_missing_script_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let result = ScriptedEvent::load_script(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(ApiError::IoError(_))));
}
