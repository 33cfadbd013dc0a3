use sortable::{SortableConfig, Value};

use crate::helpers::*;

#[tokio::test]
async fn test_delete_closes_gap() {
    let collection = test_collection(SortableConfig::default()).await;
    let rows = create_items(&collection, &["a", "b", "c", "d", "e"], &[]).await;

    collection.delete(&rows[2]).await.unwrap();

    assert_order(&collection, &[], &["a", "b", "d", "e"]).await;
}

#[tokio::test]
async fn test_delete_last_and_first() {
    let collection = test_collection(SortableConfig::default()).await;
    let rows = create_items(&collection, &["a", "b", "c"], &[]).await;

    collection.delete(&rows[2]).await.unwrap();
    assert_order(&collection, &[], &["a", "b"]).await;

    collection.delete(&rows[0]).await.unwrap();
    assert_order(&collection, &[], &["b"]).await;
}

#[tokio::test]
async fn test_delete_without_reorder_leaves_gap() {
    let config = SortableConfig::default().with_reorder_on_delete(false);
    let collection = test_collection(config).await;
    let rows = create_items(&collection, &["a", "b", "c"], &[]).await;

    collection.delete(&rows[1]).await.unwrap();

    assert_eq!(
        titles_and_positions(&collection, &[]).await,
        vec![("a".to_string(), 1), ("c".to_string(), 3)]
    );
}

#[tokio::test]
async fn test_delete_only_touches_own_group() {
    let config = SortableConfig::default().with_group_by(["lane"]);
    let collection = test_collection(config).await;

    let todo = [("lane", text("todo"))];
    let done = [("lane", text("done"))];
    let todo_rows = create_items(&collection, &["t1", "t2", "t3"], &todo).await;
    create_items(&collection, &["d1", "d2", "d3"], &done).await;

    collection.delete(&todo_rows[0]).await.unwrap();

    assert_order(&collection, &todo, &["t2", "t3"]).await;
    assert_order(&collection, &done, &["d1", "d2", "d3"]).await;
}

#[tokio::test]
async fn test_delete_unpositioned_row_is_noop_for_others() {
    let config = SortableConfig::default().with_sort_on_create(false);
    let collection = test_collection(config).await;

    let a = collection
        .create(item("a", &[]).with("position", 1))
        .await
        .unwrap();
    let loose = collection.create(item("loose", &[])).await.unwrap();

    collection.delete(&loose).await.unwrap();

    assert_eq!(
        reload(&collection, &a).await.get("position"),
        Some(&Value::Integer(1))
    );
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let collection = test_collection(SortableConfig::default()).await;
    let rows = create_items(&collection, &["a", "b"], &[]).await;

    collection.delete(&rows[0]).await.unwrap();
    let err = collection.delete(&rows[0]).await.unwrap_err();
    assert!(err.is_not_found());

    // The failed delete must not have shifted anything
    assert_order(&collection, &[], &["b"]).await;
}
