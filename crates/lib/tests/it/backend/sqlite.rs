//! SQLite-specific behavior of the sqlx backend.
//!
//! The shared scenarios also run here when TEST_BACKEND=sqlite; these tests
//! always use SQLite and cover what only the SQL backend does.

use tempfile::TempDir;

use sortable::{
    Collection, Direction, GroupScope, Operator, Query, Row, SortableBackend, SortableConfig,
    Value,
    backend::database::{
        DbKind, Sqlite, SqlxBackend,
        sql::schema::{self, ColumnType, TableSpec},
    },
};

async fn cards_backend(config: &SortableConfig) -> SqlxBackend {
    let backend = Sqlite::sqlite_in_memory()
        .await
        .unwrap()
        .for_table("cards", "id")
        .unwrap();
    let spec = TableSpec::for_config("cards", "id", config)
        .with_column_type("board_id", ColumnType::Integer)
        .with_extra_column("title", ColumnType::Text);
    schema::create_table(&backend, &spec).await.unwrap();
    backend
}

fn positions(rows: &[Row]) -> Vec<i64> {
    rows.iter()
        .filter_map(|row| row.get("position").and_then(Value::as_integer))
        .collect()
}

#[tokio::test]
async fn test_sqlite_backend_kind() {
    let backend = Sqlite::sqlite_in_memory().await.unwrap();
    assert_eq!(backend.kind(), DbKind::Sqlite);
    assert!(backend.is_sqlite());
    assert!(!backend.is_postgres());
    assert_eq!(backend.table(), "items");
    assert_eq!(backend.key_column(), "id");
}

#[tokio::test]
async fn test_create_table_is_idempotent() {
    let config = SortableConfig::default().with_group_by(["board_id"]);
    let backend = cards_backend(&config).await;
    let spec = TableSpec::for_config("cards", "id", &config);
    schema::create_table(&backend, &spec).await.unwrap();
}

#[tokio::test]
async fn test_for_table_rejects_bad_identifiers() {
    let backend = Sqlite::sqlite_in_memory().await.unwrap();
    let err = backend.for_table("cards; DROP TABLE x", "id").unwrap_err();
    assert!(err.is_validation_error());
    assert!(backend.for_table("cards", "1id").is_err());
}

#[tokio::test]
async fn test_connect_rejects_unknown_scheme() {
    let err = SqlxBackend::connect("mysql://localhost/db").await.unwrap_err();
    assert!(err.is_store_error());
}

#[tokio::test]
async fn test_filter_rejects_bad_column_names() {
    let backend = cards_backend(&SortableConfig::default()).await;
    let query = Query::new().where_eq("lane\" OR 1=1 --", "x");
    assert!(backend.fetch(&query).await.unwrap_err().is_validation_error());
}

#[tokio::test]
async fn test_insert_returns_generated_key() {
    let backend = cards_backend(&SortableConfig::default()).await;

    let mut first = Row::new("id").with("title", "a").with("position", 1);
    backend.insert(&mut first).await.unwrap();
    let mut second = Row::new("id");
    backend.insert(&mut second).await.unwrap();

    assert_eq!(first.get("id"), Some(&Value::Integer(1)));
    assert_eq!(second.get("id"), Some(&Value::Integer(2)));

    let stored = backend.find(&Value::Integer(2)).await.unwrap().unwrap();
    assert_eq!(stored.get("position"), Some(&Value::Null));
    assert!(backend.find(&Value::Integer(3)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_values_round_trip_with_types() {
    let config = SortableConfig::default().with_group_by(["board_id", "lane"]);
    let backend = cards_backend(&config).await;

    let mut row = Row::new("id")
        .with("board_id", 7)
        .with("lane", "todo")
        .with("position", 1);
    backend.insert(&mut row).await.unwrap();

    let stored = backend.find(&Value::Integer(1)).await.unwrap().unwrap();
    assert_eq!(stored.get("board_id"), Some(&Value::Integer(7)));
    assert_eq!(stored.get("lane"), Some(&Value::from("todo")));
    assert!(!stored.is_dirty());
}

#[tokio::test]
async fn test_shift_and_max_statements() {
    let config = SortableConfig::default().with_group_by(["lane"]);
    let backend = cards_backend(&config).await;
    for (lane, position) in [("todo", 1), ("todo", 2), ("todo", 3), ("done", 1)] {
        let mut row = Row::new("id").with("lane", lane).with("position", position);
        backend.insert(&mut row).await.unwrap();
    }

    let todo = Query::new().where_eq("lane", "todo");
    assert_eq!(backend.max(&todo, "position").await.unwrap(), Some(3));
    let empty = Query::new().where_eq("lane", "archive");
    assert_eq!(backend.max(&empty, "position").await.unwrap(), None);

    let tail = todo.clone().filter("position", Operator::Ge, 2);
    assert_eq!(backend.increment(&tail, "position", 1).await.unwrap(), 2);

    let ordered = backend
        .fetch(&todo.clone().order_by("position", Direction::Desc))
        .await
        .unwrap();
    assert_eq!(positions(&ordered), vec![4, 3, 1]);
}

#[tokio::test]
async fn test_not_equal_matches_null_rows() {
    let backend = cards_backend(&SortableConfig::default()).await;
    let mut keyed = Row::new("id").with("title", "a").with("position", 1);
    let mut untitled = Row::new("id").with("position", 2);
    backend.insert(&mut keyed).await.unwrap();
    backend.insert(&mut untitled).await.unwrap();

    let query = Query::new().filter("title", Operator::Ne, "a");
    let rows = backend.fetch(&query).await.unwrap();
    assert_eq!(positions(&rows), vec![2]);

    let nulls = Query::new().where_eq("title", Value::Null);
    assert_eq!(backend.fetch(&nulls).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_can_clear_a_column() {
    let backend = cards_backend(&SortableConfig::default()).await;
    let mut row = Row::new("id").with("title", "a").with("position", 1);
    backend.insert(&mut row).await.unwrap();
    row.sync_original();

    row.set("title", Value::Null);
    backend.update(&row).await.unwrap();

    let stored = backend.find(&Value::Integer(1)).await.unwrap().unwrap();
    assert_eq!(stored.get("title"), Some(&Value::Null));
    assert_eq!(stored.get("position"), Some(&Value::Integer(1)));
}

#[tokio::test]
async fn test_update_and_delete_missing_rows() {
    let backend = cards_backend(&SortableConfig::default()).await;
    let mut ghost = Row::new("id").with("id", 42);
    ghost.sync_original();
    ghost.set("title", "boo");

    assert!(backend.update(&ghost).await.unwrap_err().is_not_found());
    assert!(backend.delete(&ghost).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_collection_scenarios_on_sqlite() {
    let config = SortableConfig::default().with_group_by(["board_id"]);
    let cards = Collection::new(cards_backend(&config).await, config);

    let mut created = Vec::new();
    for title in ["1", "2", "3", "4", "5"] {
        let row = Row::new("id").with("board_id", 1).with("title", title);
        created.push(cards.create(row).await.unwrap());
    }
    assert_eq!(positions(&created), vec![1, 2, 3, 4, 5]);

    cards.delete(&created[2]).await.unwrap();
    let board = GroupScope::from_pairs([("board_id", Value::Integer(1))]);
    let rows = cards.ordered(&board, Direction::Asc).await.unwrap();
    assert_eq!(positions(&rows), vec![1, 2, 3, 4]);

    let mut moving = rows[0].clone();
    moving.set("board_id", 2);
    cards.save(&mut moving).await.unwrap();

    let rows = cards.ordered(&board, Direction::Asc).await.unwrap();
    assert_eq!(positions(&rows), vec![1, 2, 3]);
    let other = cards.ordered(&cards.group_of(&moving), Direction::Asc).await.unwrap();
    assert_eq!(positions(&other), vec![1]);
}

#[tokio::test]
async fn test_insert_first_scenario_on_sqlite() {
    let config = SortableConfig::default().with_insert_first(true);
    let cards = Collection::new(cards_backend(&config).await, config);

    for title in ["A", "B", "C"] {
        cards
            .create(Row::new("id").with("title", title))
            .await
            .unwrap();
    }

    let rows = cards
        .ordered(&GroupScope::default(), Direction::Asc)
        .await
        .unwrap();
    let titles: Vec<&str> = rows
        .iter()
        .filter_map(|row| row.get("title").and_then(Value::as_text))
        .collect();
    assert_eq!(titles, vec!["C", "B", "A"]);
    assert_eq!(positions(&rows), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_open_sqlite_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cards.db");

    let config = SortableConfig::default();
    {
        let backend = SqlxBackend::open_sqlite(&path).await.unwrap();
        schema::create_table(&backend, &TableSpec::for_config("items", "id", &config))
            .await
            .unwrap();
        let items = Collection::new(backend, config.clone());
        items.create(Row::new("id")).await.unwrap();
        items.create(Row::new("id")).await.unwrap();
    }
    assert!(path.exists());

    let backend = SqlxBackend::open_sqlite(&path).await.unwrap();
    assert_eq!(backend.max(&Query::new(), "position").await.unwrap(), Some(2));
}
