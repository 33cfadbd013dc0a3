use tempfile::TempDir;

use sortable::{Query, Row, SortableBackend, Value, backend::database::InMemory};

#[tokio::test]
async fn test_in_memory_backend_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("table.json");

    {
        let backend = InMemory::new();
        for position in 1..=3 {
            let mut row = Row::new("id").with("position", position);
            backend.insert(&mut row).await.unwrap();
        }
        backend.save_to_file(&file_path).await.unwrap();
    }
    assert!(file_path.exists());

    let loaded = InMemory::load_from_file(&file_path, "id").await.unwrap();
    assert_eq!(loaded.len().await, 3);
    assert_eq!(loaded.max(&Query::new(), "position").await.unwrap(), Some(3));

    // The key sequence continues where it left off
    let mut row = Row::new("id");
    loaded.insert(&mut row).await.unwrap();
    assert_eq!(row.get("id"), Some(&Value::Integer(4)));

    // Loaded rows are clean
    let stored = loaded.find(&Value::Integer(1)).await.unwrap().unwrap();
    assert!(!stored.is_dirty());
}

#[tokio::test]
async fn test_load_non_existent_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.json");

    let backend = InMemory::load_from_file(&path, "id").await.unwrap();
    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn test_load_rejects_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = InMemory::load_from_file(&path, "id").await.unwrap_err();
    assert!(err.is_backend_error());
}

#[tokio::test]
async fn test_load_rejects_unknown_version() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("future.json");
    std::fs::write(&path, r#"{"_v": 7, "rows": [], "next_key": 1}"#).unwrap();

    assert!(InMemory::load_from_file(&path, "id").await.is_err());
}
