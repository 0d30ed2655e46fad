use serde_json::json;
use std::time::Duration;
use tablegate_client::{
    parse_import, persistence, ClientConfig, ConnectionRegistry, RegistryFile,
};
use tablegate_core::{ConnectionUpdate, NewConnection};
use tablegate_test_utils::fixtures::sample_connections;
use tempfile::TempDir;

fn config(dir: &TempDir) -> ClientConfig {
    ClientConfig {
        default_base_url: "http://localhost:5000".to_string(),
        request_timeout_ms: 1_000,
        registry_path: dir.path().join("connections.json"),
        default_page_size: 10,
    }
}

#[test]
fn missing_file_opens_empty() {
    let dir = TempDir::new().unwrap();
    let registry = ConnectionRegistry::open(dir.path().join("nested/connections.json")).unwrap();
    assert!(registry.connections().is_empty());
    assert!(registry.active().is_none());
}

#[test]
fn mutations_are_written_through() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/connections.json");

    let mut registry = ConnectionRegistry::open(&path).unwrap();
    let record = registry
        .add(NewConnection::new("Local", "http://localhost:5000", "users"))
        .unwrap();
    assert!(registry.set_active(&record.id).unwrap());

    let reopened = ConnectionRegistry::open(&path).unwrap();
    assert_eq!(reopened.connections().len(), 1);
    assert_eq!(reopened.active_id(), Some(record.id.as_str()));
    assert_eq!(reopened.active().unwrap().table_name, "users");
}

#[test]
fn update_merges_present_fields() {
    let dir = TempDir::new().unwrap();
    let mut registry = ConnectionRegistry::open(config(&dir).registry_path).unwrap();
    let record = registry
        .add(NewConnection::new("Local", "http://localhost:5000", "users").with_description("dev"))
        .unwrap();

    let update = ConnectionUpdate {
        table_name: Some("orders".to_string()),
        ..ConnectionUpdate::default()
    };
    assert!(registry.update(&record.id, update).unwrap());

    let updated = registry.get(&record.id).unwrap();
    assert_eq!(updated.table_name, "orders");
    assert_eq!(updated.name, "Local");
    assert_eq!(updated.description, "dev");
    assert!(updated.updated_at.is_some());

    assert!(!registry
        .update("missing", ConnectionUpdate::default())
        .unwrap());
}

#[test]
fn deleting_active_connection_clears_selection() {
    let dir = TempDir::new().unwrap();
    let mut registry = ConnectionRegistry::open(config(&dir).registry_path).unwrap();
    let a = registry
        .add(NewConnection::new("A", "http://a.local", "t"))
        .unwrap();
    let b = registry
        .add(NewConnection::new("B", "http://b.local", "t"))
        .unwrap();

    registry.set_active(&a.id).unwrap();
    assert!(registry.delete(&b.id).unwrap());
    assert_eq!(registry.active_id(), Some(a.id.as_str()));

    assert!(registry.delete(&a.id).unwrap());
    assert!(registry.active_id().is_none());
    assert!(!registry.delete(&a.id).unwrap());
    assert!(!registry.set_active(&a.id).unwrap());
}

#[test]
fn import_merges_or_replaces() {
    let dir = TempDir::new().unwrap();
    let mut registry = ConnectionRegistry::open(config(&dir).registry_path).unwrap();
    let existing = registry
        .add(NewConnection::new("Old", "http://old.local", "t"))
        .unwrap();
    registry.set_active(&existing.id).unwrap();

    assert_eq!(registry.import(sample_connections(), true).unwrap(), 2);
    assert_eq!(registry.connections().len(), 3);
    assert_eq!(registry.active_id(), Some(existing.id.as_str()));
    assert!(registry.connections()[1].id.ends_with("_0"));
    assert!(registry.connections()[2].id.ends_with("_1"));

    assert_eq!(registry.import(sample_connections(), false).unwrap(), 2);
    assert_eq!(registry.connections().len(), 2);
    assert!(registry.active_id().is_none());
    assert_eq!(registry.export()[0].name, "Local");
}

#[test]
fn clear_forgets_everything() {
    let dir = TempDir::new().unwrap();
    let path = config(&dir).registry_path;
    let mut registry = ConnectionRegistry::open(&path).unwrap();
    registry.import(sample_connections(), true).unwrap();
    registry.clear().unwrap();

    let reopened = ConnectionRegistry::open(&path).unwrap();
    assert!(reopened.connections().is_empty());
    assert!(reopened.active_id().is_none());
}

#[test]
fn parse_import_accepts_array_or_wrapper() {
    let array = json!([
        { "name": "A", "baseURL": "http://a.local", "tableName": "users", "id": "ignored" }
    ]);
    let wrapped = json!({ "connections": array.clone() });

    let from_array = parse_import(&array.to_string()).unwrap();
    let from_wrapper = parse_import(&wrapped.to_string()).unwrap();
    assert_eq!(from_array, from_wrapper);
    assert_eq!(from_array[0].base_url, "http://a.local");
    assert!(parse_import("{\"connections\": 3}").is_err());
}

#[test]
fn server_format_file_without_active_id_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("connections.json");
    std::fs::write(
        &path,
        json!({
            "connections": [{
                "id": "1700000000000_0",
                "name": "Local",
                "baseURL": "http://localhost:5000",
                "tableName": "users",
                "description": "",
                "createdAt": "2024-01-02T03:04:05Z"
            }]
        })
        .to_string(),
    )
    .unwrap();

    let state: RegistryFile = persistence::load(&path).unwrap().unwrap();
    assert_eq!(state.connections.len(), 1);
    assert!(state.active_connection_id.is_none());
}

#[test]
fn clients_follow_saved_base_urls() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let mut registry = ConnectionRegistry::open(&config.registry_path).unwrap();
    let record = registry
        .add(NewConnection::new("Local", "http://localhost:5000/", "users"))
        .unwrap();

    assert!(registry.active_client(&config).unwrap().is_none());
    assert!(registry.client_for("missing", &config).unwrap().is_none());

    let client = registry.client_for(&record.id, &config).unwrap().unwrap();
    assert_eq!(client.base_url(), "http://localhost:5000");
    assert_eq!(config.request_timeout(), Duration::from_secs(1));
}
