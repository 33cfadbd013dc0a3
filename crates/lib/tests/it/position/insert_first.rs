use sortable::{SortableConfig, Value};

use crate::helpers::*;

fn insert_first() -> SortableConfig {
    SortableConfig::default().with_insert_first(true)
}

#[tokio::test]
async fn test_insert_first_reverses_creation_order() {
    let collection = test_collection(insert_first()).await;
    let rows = create_items(&collection, &["A", "B", "C"], &[]).await;

    // Each returned row is the value written at its own creation
    for row in &rows {
        assert_eq!(row.get("position"), Some(&Value::Integer(1)));
    }

    assert_order(&collection, &[], &["C", "B", "A"]).await;
    assert_eq!(
        reload(&collection, &rows[0]).await.get("position"),
        Some(&Value::Integer(3))
    );
}

#[tokio::test]
async fn test_insert_first_only_shifts_own_group() {
    let config = insert_first().with_group_by(["lane"]);
    let collection = test_collection(config).await;

    let todo = [("lane", text("todo"))];
    let done = [("lane", text("done"))];
    create_items(&collection, &["t1", "t2"], &todo).await;
    create_items(&collection, &["d1", "d2", "d3"], &done).await;

    assert_order(&collection, &todo, &["t2", "t1"]).await;
    assert_order(&collection, &done, &["d3", "d2", "d1"]).await;
}

#[tokio::test]
async fn test_insert_first_then_delete() {
    let collection = test_collection(insert_first()).await;
    let rows = create_items(&collection, &["A", "B", "C", "D"], &[]).await;

    // B sits at position 3 of [D, C, B, A]
    let b = reload(&collection, &rows[1]).await;
    collection.delete(&b).await.unwrap();

    assert_order(&collection, &[], &["D", "C", "A"]).await;
}

#[tokio::test]
async fn test_insert_first_without_sort_on_create_skips_shift() {
    let config = insert_first().with_sort_on_create(false);
    let collection = test_collection(config).await;

    let a = collection
        .create(item("A", &[]).with("position", 1))
        .await
        .unwrap();
    collection
        .create(item("B", &[]).with("position", 2))
        .await
        .unwrap();

    assert_eq!(
        reload(&collection, &a).await.get("position"),
        Some(&Value::Integer(1))
    );
    assert_order(&collection, &[], &["A", "B"]).await;
}

#[tokio::test]
async fn test_delete_row_returned_by_create() {
    let collection = test_collection(insert_first()).await;
    let rows = create_items(&collection, &["A", "B", "C"], &[]).await;

    // A was created at position 1 but has since been shifted to 3
    collection.delete(&rows[0]).await.unwrap();
    assert_order(&collection, &[], &["C", "B"]).await;

    collection.delete(&rows[2]).await.unwrap();
    assert_order(&collection, &[], &["B"]).await;
}
