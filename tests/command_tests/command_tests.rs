//! Tests for Command/Response
//!
//! These tests verify:
//! - Field parsing from key=value pairs
//! - RecordStore::execute routing for every command
//! - Mapping of outcomes onto response statuses

use serde_json::json;
use taskdb::command::{parse_fields, Command, CommandType, Response, Status};
use taskdb::engine::RecordStore;
use taskdb::record::Filter;
use taskdb::StoreError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store() -> (TempDir, RecordStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = RecordStore::open_path(temp_dir.path()).unwrap();
    (temp_dir, store)
}

fn insert(store: &RecordStore, pairs: &[&str]) -> String {
    let response = store
        .execute(Command::Insert {
            collection: "tasks".to_string(),
            fields: parse_fields(pairs).unwrap(),
        })
        .unwrap();
    response.payload.unwrap()["id"].as_str().unwrap().to_string()
}

// =============================================================================
// parse_fields Tests
// =============================================================================

#[test]
fn test_parse_fields_types() {
    let fields = parse_fields([
        "title=Buy milk",
        "description=2%",
        "priority=3",
        "urgent=true",
        "tags=[\"a\",\"b\"]",
        "note=null",
        "quoted=\"42\"",
        "expr=a=b",
    ])
    .unwrap();

    assert_eq!(fields["title"], json!("Buy milk"));
    assert_eq!(fields["description"], json!("2%"));
    assert_eq!(fields["priority"], json!(3));
    assert_eq!(fields["urgent"], json!(true));
    assert_eq!(fields["tags"], json!(["a", "b"]));
    assert_eq!(fields["note"], json!(null));
    assert_eq!(fields["quoted"], json!("42"));
    assert_eq!(fields["expr"], json!("a=b"));
}

#[test]
fn test_parse_fields_rejects_bad_pairs() {
    assert!(matches!(
        parse_fields(["novalue"]),
        Err(StoreError::InvalidCommand(_))
    ));
    assert!(matches!(
        parse_fields(["=value"]),
        Err(StoreError::InvalidCommand(_))
    ));
    assert!(parse_fields(Vec::<String>::new()).unwrap().is_empty());
}

// =============================================================================
// Command Metadata Tests
// =============================================================================

#[test]
fn test_command_type_and_collection() {
    let command = Command::Delete {
        collection: "notes".to_string(),
        id: "1".to_string(),
    };

    assert_eq!(command.command_type(), CommandType::Delete);
    assert_eq!(command.collection(), "notes");
    assert!(CommandType::Complete.is_mutation());
    assert!(!CommandType::Select.is_mutation());
    assert!(!CommandType::Get.is_mutation());
}

// =============================================================================
// Execute Tests
// =============================================================================

#[test]
fn test_execute_insert_is_created() {
    let (_temp, store) = setup_temp_store();

    let response = store
        .execute(Command::Insert {
            collection: "tasks".to_string(),
            fields: parse_fields(["title=Buy milk"]).unwrap(),
        })
        .unwrap();

    assert_eq!(response.status, Status::Created);
    assert_eq!(response.status.http_code(), 201);
    let payload = response.payload.unwrap();
    assert_eq!(payload["title"], json!("Buy milk"));
    assert!(payload["id"].is_string());
}

#[test]
fn test_execute_select_with_filter() {
    let (_temp, store) = setup_temp_store();
    insert(&store, &["title=Buy milk"]);
    insert(&store, &["title=Bake bread"]);

    let response = store
        .execute(Command::Select {
            collection: "tasks".to_string(),
            filter: Some(Filter::new().field("title", "MILK")),
        })
        .unwrap();

    assert_eq!(response.status, Status::Ok);
    let payload = response.payload.unwrap();
    let rows = payload.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], json!("Buy milk"));
}

#[test]
fn test_execute_get_update_complete_delete() {
    let (_temp, store) = setup_temp_store();
    let id = insert(&store, &["title=a", "description=b"]);

    let got = store
        .execute(Command::Get { collection: "tasks".to_string(), id: id.clone() })
        .unwrap();
    assert_eq!(got.payload.unwrap()["description"], json!("b"));

    let updated = store
        .execute(Command::Update {
            collection: "tasks".to_string(),
            id: id.clone(),
            fields: parse_fields(["description=c"]).unwrap(),
        })
        .unwrap();
    let payload = updated.payload.unwrap();
    assert_eq!(payload["title"], json!("a"));
    assert_eq!(payload["description"], json!("c"));

    let completed = store
        .execute(Command::Complete { collection: "tasks".to_string(), id: id.clone() })
        .unwrap();
    assert!(completed.payload.unwrap()["completed_at"].is_string());

    let deleted = store
        .execute(Command::Delete { collection: "tasks".to_string(), id: id.clone() })
        .unwrap();
    assert_eq!(deleted, Response::ok(None));

    let missing = store.execute(Command::Get { collection: "tasks".to_string(), id });
    assert!(missing.unwrap_err().is_not_found());
}

// =============================================================================
// Response Mapping Tests
// =============================================================================

#[test]
fn test_from_result_not_found() {
    let (_temp, store) = setup_temp_store();

    let response = Response::from_result(store.execute(Command::Complete {
        collection: "tasks".to_string(),
        id: "missing".to_string(),
    }));

    assert_eq!(response.status, Status::NotFound);
    assert_eq!(response.status.http_code(), 404);
    assert!(!response.is_success());
    assert!(response.payload.unwrap()["error"]
        .as_str()
        .unwrap()
        .contains("missing"));
}

#[test]
fn test_from_result_other_error() {
    let response = Response::from_result(Err(StoreError::InvalidCommand("bad".to_string())));

    assert_eq!(response.status, Status::Error);
    assert_eq!(response.status.http_code(), 500);
}

#[test]
fn test_from_result_passes_success_through() {
    let ok = Response::ok(Some(json!([])));

    assert_eq!(Response::from_result(Ok(ok.clone())), ok);
    assert!(ok.is_success());
}
