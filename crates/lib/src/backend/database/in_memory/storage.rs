//! Query evaluation and row storage for the in-memory table.

use crate::Result;
use crate::backend::errors::BackendError;
use crate::record::{Row, SortableRecord};
use crate::scope::Query;
use crate::value::Value;

use super::InMemory;

/// Largest integer value of `column` among matching rows.
pub(crate) async fn max(backend: &InMemory, query: &Query, column: &str) -> Result<Option<i64>> {
    let table = backend.table.read().await;
    Ok(table
        .rows
        .iter()
        .filter(|row| query.matches(*row))
        .filter_map(|row| row.attribute(column).as_integer())
        .max())
}

/// Add `delta` to `column` on every matching row holding an integer.
pub(crate) async fn shift(
    backend: &InMemory,
    query: &Query,
    column: &str,
    delta: i64,
) -> Result<u64> {
    let mut table = backend.table.write().await;
    let mut changed = 0;
    for row in table.rows.iter_mut().filter(|row| query.matches(&**row)) {
        // SQL arithmetic on NULL stays NULL
        if let Some(current) = row.attribute(column).as_integer() {
            row.set(column, current + delta);
            changed += 1;
        }
    }
    tracing::trace!(%column, delta, changed, "Shifted in-memory rows");
    Ok(changed)
}

/// Matching rows, sorted by the query's order keys.
pub(crate) async fn fetch(backend: &InMemory, query: &Query) -> Result<Vec<Row>> {
    let table = backend.table.read().await;
    let mut rows: Vec<Row> = table
        .rows
        .iter()
        .filter(|row| query.matches(*row))
        .map(|row| Row::from_stored(backend.key_column(), row.attributes().clone()))
        .collect();
    // Stable sort keeps insertion order between equal keys
    rows.sort_by(|a, b| query.compare(a, b));
    Ok(rows)
}

pub(crate) async fn find(backend: &InMemory, key: &Value) -> Result<Option<Row>> {
    let table = backend.table.read().await;
    Ok(table
        .rows
        .iter()
        .find(|row| row.attribute(backend.key_column()) == *key)
        .map(|row| Row::from_stored(backend.key_column(), row.attributes().clone())))
}

/// Store a new row, assigning the next integer key if it has none.
pub(crate) async fn insert(backend: &InMemory, row: &mut Row) -> Result<()> {
    let key_column = backend.key_column();
    let mut table = backend.table.write().await;

    let key = match row.attribute(key_column) {
        Value::Null => {
            let key = Value::Integer(table.next_key);
            row.set(key_column, key.clone());
            key
        }
        key => key,
    };

    if table
        .rows
        .iter()
        .any(|existing| existing.attribute(key_column) == key)
    {
        return Err(BackendError::DuplicateKey { key }.into());
    }

    if let Value::Integer(k) = key {
        table.next_key = table.next_key.max(k + 1);
    }

    table
        .rows
        .push(Row::from_stored(key_column, row.attributes().clone()));
    tracing::trace!(%key, "Inserted in-memory row");
    Ok(())
}

/// Apply the row's dirty attributes to the stored copy.
pub(crate) async fn update(backend: &InMemory, row: &Row) -> Result<()> {
    let key = key_of(backend, row)?;
    let mut table = backend.table.write().await;
    let stored = table
        .rows
        .iter_mut()
        .find(|stored| stored.attribute(backend.key_column()) == key)
        .ok_or_else(|| BackendError::RecordNotFound { key: key.clone() })?;

    for (name, value) in row.dirty_attributes() {
        stored.set(name, value.clone());
    }
    Ok(())
}

pub(crate) async fn delete(backend: &InMemory, row: &Row) -> Result<()> {
    let key = key_of(backend, row)?;
    let mut table = backend.table.write().await;
    let index = table
        .rows
        .iter()
        .position(|stored| stored.attribute(backend.key_column()) == key)
        .ok_or_else(|| BackendError::RecordNotFound { key: key.clone() })?;
    table.rows.remove(index);
    Ok(())
}

fn key_of(backend: &InMemory, row: &Row) -> Result<Value> {
    match row.attribute(backend.key_column()) {
        Value::Null => Err(BackendError::MissingKey {
            column: backend.key_column().to_string(),
        }
        .into()),
        key => Ok(key),
    }
}
