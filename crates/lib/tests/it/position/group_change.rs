use sortable::{SortableConfig, Value};

use crate::helpers::*;

#[tokio::test]
async fn test_group_change_appends_to_new_group() {
    let config = SortableConfig::default().with_group_by(["lane"]);
    let collection = test_collection(config).await;

    let todo = [("lane", text("todo"))];
    let done = [("lane", text("done"))];
    let rows = create_items(&collection, &["t1", "t2", "t3"], &todo).await;
    create_items(&collection, &["d1", "d2"], &done).await;

    let mut moving = reload(&collection, &rows[1]).await;
    moving.set("lane", "done");
    collection.save(&mut moving).await.unwrap();

    assert_eq!(moving.get("position"), Some(&Value::Integer(3)));
    assert!(!moving.is_dirty());
    assert_order(&collection, &todo, &["t1", "t3"]).await;
    assert_order(&collection, &done, &["d1", "d2", "t2"]).await;
}

#[tokio::test]
async fn test_group_change_insert_first() {
    let config = SortableConfig::default()
        .with_group_by(["lane"])
        .with_insert_first(true);
    let collection = test_collection(config).await;

    let todo = [("lane", text("todo"))];
    let done = [("lane", text("done"))];
    let rows = create_items(&collection, &["t1", "t2", "t3"], &todo).await;
    create_items(&collection, &["d1", "d2"], &done).await;
    assert_order(&collection, &todo, &["t3", "t2", "t1"]).await;

    let mut moving = reload(&collection, &rows[1]).await;
    moving.set("lane", "done");
    collection.save(&mut moving).await.unwrap();

    assert_order(&collection, &todo, &["t3", "t1"]).await;
    assert_order(&collection, &done, &["t2", "d2", "d1"]).await;
}

#[tokio::test]
async fn test_group_change_into_empty_group() {
    let config = SortableConfig::default().with_group_by(["lane"]);
    let collection = test_collection(config).await;

    let todo = [("lane", text("todo"))];
    let rows = create_items(&collection, &["t1", "t2"], &todo).await;

    let mut moving = reload(&collection, &rows[0]).await;
    moving.set("lane", "archive");
    collection.save(&mut moving).await.unwrap();

    assert_order(&collection, &todo, &["t2"]).await;
    assert_order(&collection, &[("lane", text("archive"))], &["t1"]).await;
}

#[tokio::test]
async fn test_group_change_on_one_of_several_columns() {
    let config = SortableConfig::default().with_group_by(["board_id", "lane"]);
    let collection = test_collection_with(config, &["board_id"]).await;

    let board1 = [("board_id", Value::Integer(1)), ("lane", text("todo"))];
    let board2 = [("board_id", Value::Integer(2)), ("lane", text("todo"))];
    let board1_done = [("board_id", Value::Integer(1)), ("lane", text("done"))];
    let rows = create_items(&collection, &["a", "b", "c"], &board1).await;
    create_items(&collection, &["x"], &board2).await;
    create_items(&collection, &["y"], &board1_done).await;

    let mut moving = reload(&collection, &rows[0]).await;
    moving.set("board_id", 2);
    collection.save(&mut moving).await.unwrap();

    assert_order(&collection, &board1, &["b", "c"]).await;
    assert_order(&collection, &board2, &["x", "a"]).await;
    assert_order(&collection, &board1_done, &["y"]).await;
}

#[tokio::test]
async fn test_group_change_from_null_group() {
    let config = SortableConfig::default().with_group_by(["lane"]);
    let collection = test_collection(config).await;

    let unfiled = [("lane", Value::Null)];
    let todo = [("lane", text("todo"))];
    let rows = create_items(&collection, &["u1", "u2", "u3"], &unfiled).await;
    create_items(&collection, &["t1"], &todo).await;

    let mut moving = reload(&collection, &rows[0]).await;
    moving.set("lane", "todo");
    collection.save(&mut moving).await.unwrap();

    assert_order(&collection, &unfiled, &["u2", "u3"]).await;
    assert_order(&collection, &todo, &["t1", "u1"]).await;
}

#[tokio::test]
async fn test_update_without_group_change_keeps_positions() {
    let config = SortableConfig::default().with_group_by(["lane"]);
    let collection = test_collection(config).await;

    let todo = [("lane", text("todo"))];
    let rows = create_items(&collection, &["t1", "t2", "t3"], &todo).await;

    let mut renamed = reload(&collection, &rows[0]).await;
    renamed.set("title", "first");
    collection.save(&mut renamed).await.unwrap();

    assert_order(&collection, &todo, &["first", "t2", "t3"]).await;
}

#[tokio::test]
async fn test_setting_same_group_value_is_not_a_move() {
    let config = SortableConfig::default().with_group_by(["lane"]);
    let collection = test_collection(config).await;

    let todo = [("lane", text("todo"))];
    let rows = create_items(&collection, &["t1", "t2"], &todo).await;

    let mut row = reload(&collection, &rows[0]).await;
    row.set("lane", "todo");
    collection.save(&mut row).await.unwrap();

    assert_order(&collection, &todo, &["t1", "t2"]).await;
}

#[tokio::test]
async fn test_ungrouped_table_ignores_attribute_changes() {
    let collection = test_collection(SortableConfig::default()).await;
    let rows = create_items(&collection, &["a", "b"], &[]).await;

    let mut row = reload(&collection, &rows[0]).await;
    row.set("title", "z");
    collection.save(&mut row).await.unwrap();

    assert_order(&collection, &[], &["z", "b"]).await;
}

#[tokio::test]
async fn test_group_change_of_row_with_stale_position() {
    let config = SortableConfig::default().with_group_by(["lane"]);
    let collection = test_collection(config).await;

    let todo = [("lane", text("todo"))];
    let done = [("lane", text("done"))];
    let mut rows = create_items(&collection, &["a", "b", "c"], &todo).await;
    collection.delete(&rows[0]).await.unwrap();

    // b still remembers position 2 and doesn't know c shifted down
    let mut moving = rows.swap_remove(1);
    moving.set("lane", "done");
    collection.save(&mut moving).await.unwrap();

    assert_eq!(moving.get("position"), Some(&Value::Integer(1)));
    assert!(!moving.is_dirty());
    assert_order(&collection, &todo, &["c"]).await;
    assert_order(&collection, &done, &["b"]).await;
}

#[tokio::test]
async fn test_update_of_stale_row_keeps_stored_position() {
    let config = SortableConfig::default().with_insert_first(true);
    let collection = test_collection(config).await;
    let mut rows = create_items(&collection, &["a", "b"], &[]).await;

    // a was returned at position 1, b has since taken its place
    let mut stale = rows.swap_remove(0);
    stale.set("title", "renamed");
    collection.save(&mut stale).await.unwrap();

    assert_eq!(stale.get("position"), Some(&Value::Integer(2)));
    assert_order(&collection, &[], &["b", "renamed"]).await;
}
