//! Row storage and bulk position statements for SQL backends.

use sqlx::Row as _;

use crate::Result;
use crate::backend::errors::BackendError;
use crate::record::{Row, SortableRecord};
use crate::scope::Query;
use crate::value::Value;

use super::render::{self, Params, quote_identifier};
use super::{SqlxBackend, SqlxResultExt};

/// `SELECT MAX(column) FROM table WHERE …`
pub async fn max(backend: &SqlxBackend, query: &Query, column: &str) -> Result<Option<i64>> {
    let table = quote_identifier(backend.table())?;
    let column = quote_identifier(column)?;
    let mut params = Params::default();
    let filter = render::where_clause(query, &mut params)?;

    // The cast keeps the result BIGINT on PostgreSQL whatever the column width
    let sql = format!("SELECT CAST(MAX({column}) AS BIGINT) FROM {table}{filter}");
    let row = params
        .bind_to(sqlx::query(&sql))
        .fetch_one(backend.pool())
        .await
        .sql_context("Failed to read max position")?;

    row.try_get::<Option<i64>, _>(0)
        .sql_context("Failed to decode max position")
}

/// `UPDATE table SET column = column + delta WHERE …`
pub async fn shift(backend: &SqlxBackend, query: &Query, column: &str, delta: i64) -> Result<u64> {
    let table = quote_identifier(backend.table())?;
    let column = quote_identifier(column)?;
    let mut params = Params::default();
    let delta_param = params.push(Value::Integer(delta));
    let filter = render::where_clause(query, &mut params)?;

    let sql = format!("UPDATE {table} SET {column} = {column} + {delta_param}{filter}");
    let result = params
        .bind_to(sqlx::query(&sql))
        .execute(backend.pool())
        .await
        .sql_context("Failed to shift positions")?;

    tracing::trace!(%sql, delta, rows = result.rows_affected(), "Shifted positions");
    Ok(result.rows_affected())
}

/// `SELECT * FROM table WHERE … ORDER BY …`
pub async fn fetch(backend: &SqlxBackend, query: &Query) -> Result<Vec<Row>> {
    let table = quote_identifier(backend.table())?;
    let mut params = Params::default();
    let filter = render::where_clause(query, &mut params)?;
    let order = render::order_clause(query)?;

    let sql = format!("SELECT * FROM {table}{filter}{order}");
    let rows = params
        .bind_to(sqlx::query(&sql))
        .fetch_all(backend.pool())
        .await
        .sql_context("Failed to fetch rows")?;

    rows.iter()
        .map(|row| render::decode_row(row, backend.key_column()))
        .collect()
}

/// Fetch a single row by primary key.
pub async fn find(backend: &SqlxBackend, key: &Value) -> Result<Option<Row>> {
    let query = Query::new().where_eq(backend.key_column(), key.clone());
    Ok(fetch(backend, &query).await?.into_iter().next())
}

/// Insert a row and write the stored key back into it.
///
/// Null attributes are left to the column defaults. A row without a key gets
/// the one generated by the database.
pub async fn insert(backend: &SqlxBackend, row: &mut Row) -> Result<()> {
    let table = quote_identifier(backend.table())?;
    let key_column = quote_identifier(backend.key_column())?;

    let mut params = Params::default();
    let mut columns = Vec::new();
    let mut placeholders = Vec::new();
    for (name, value) in row.attributes() {
        if value.is_null() {
            continue;
        }
        columns.push(quote_identifier(name)?);
        placeholders.push(params.push(value.clone()));
    }

    let sql = if columns.is_empty() {
        format!("INSERT INTO {table} DEFAULT VALUES RETURNING {key_column}")
    } else {
        format!(
            "INSERT INTO {table} ({}) VALUES ({}) RETURNING {key_column}",
            columns.join(", "),
            placeholders.join(", ")
        )
    };

    let inserted = params
        .bind_to(sqlx::query(&sql))
        .fetch_one(backend.pool())
        .await
        .sql_context("Failed to insert row")?;

    let key = render::decode_value(&inserted, 0)?;
    tracing::trace!(%key, table = backend.table(), "Inserted row");
    row.set(backend.key_column(), key);
    Ok(())
}

/// Write the row's dirty attributes.
pub async fn update(backend: &SqlxBackend, row: &Row) -> Result<()> {
    let key = key_of(backend, row)?;
    let dirty = row.dirty_attributes();
    if dirty.is_empty() {
        return Ok(());
    }

    let table = quote_identifier(backend.table())?;
    let key_column = quote_identifier(backend.key_column())?;
    let mut params = Params::default();
    let mut assignments = Vec::with_capacity(dirty.len());
    for (name, value) in dirty {
        let column = quote_identifier(name)?;
        // An untyped NULL parameter is rejected by PostgreSQL for non-text columns
        let rhs = if value.is_null() {
            "NULL".to_string()
        } else {
            params.push(value.clone())
        };
        assignments.push(format!("{column} = {rhs}"));
    }
    let key_param = params.push(key.clone());

    let sql = format!(
        "UPDATE {table} SET {} WHERE {key_column} = {key_param}",
        assignments.join(", ")
    );
    let result = params
        .bind_to(sqlx::query(&sql))
        .execute(backend.pool())
        .await
        .sql_context("Failed to update row")?;

    if result.rows_affected() == 0 {
        return Err(BackendError::RecordNotFound { key }.into());
    }
    Ok(())
}

pub async fn delete(backend: &SqlxBackend, row: &Row) -> Result<()> {
    let key = key_of(backend, row)?;
    let table = quote_identifier(backend.table())?;
    let key_column = quote_identifier(backend.key_column())?;
    let mut params = Params::default();
    let key_param = params.push(key.clone());

    let sql = format!("DELETE FROM {table} WHERE {key_column} = {key_param}");
    let result = params
        .bind_to(sqlx::query(&sql))
        .execute(backend.pool())
        .await
        .sql_context("Failed to delete row")?;

    if result.rows_affected() == 0 {
        return Err(BackendError::RecordNotFound { key }.into());
    }
    Ok(())
}

fn key_of(backend: &SqlxBackend, row: &Row) -> Result<Value> {
    match row.attribute(backend.key_column()) {
        Value::Null => Err(BackendError::MissingKey {
            column: backend.key_column().to_string(),
        }
        .into()),
        key => Ok(key),
    }
}
