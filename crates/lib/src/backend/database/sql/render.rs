//! Rendering of [`Query`] values to SQL, parameter binding and row decoding.

use std::collections::BTreeMap;

use sqlx::any::{AnyArguments, AnyRow};
use sqlx::{Any, Column, Row as _, ValueRef};

use crate::Result;
use crate::backend::errors::BackendError;
use crate::record::Row;
use crate::scope::{Operator, Query};
use crate::value::Value;

use super::SqlxResultExt;

pub(crate) type AnyQuery<'q> = sqlx::query::Query<'q, Any, AnyArguments<'q>>;

/// Validate a table or column name and return it double-quoted.
///
/// Only `[A-Za-z_][A-Za-z0-9_]*` is accepted, so quoting never needs escapes.
pub(crate) fn quote_identifier(name: &str) -> Result<String> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(BackendError::InvalidIdentifier {
            name: name.to_string(),
        }
        .into());
    }
    Ok(format!("\"{name}\""))
}

/// Positional parameters collected while rendering a statement.
#[derive(Debug, Default)]
pub(crate) struct Params {
    values: Vec<Value>,
}

impl Params {
    /// Register a value and return its placeholder.
    pub(crate) fn push(&mut self, value: Value) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }

    /// Bind every collected value, in order.
    pub(crate) fn bind_to<'q>(&self, mut query: AnyQuery<'q>) -> AnyQuery<'q> {
        for value in &self.values {
            query = match value {
                Value::Null => query.bind(None::<i64>),
                Value::Bool(b) => query.bind(*b),
                Value::Integer(i) => query.bind(*i),
                Value::Text(s) => query.bind(s.clone()),
            };
        }
        query
    }
}

/// Render the `WHERE` clause of a query, or an empty string if it has no
/// conditions.
pub(crate) fn where_clause(query: &Query, params: &mut Params) -> Result<String> {
    if query.conditions().is_empty() {
        return Ok(String::new());
    }

    let mut parts = Vec::with_capacity(query.conditions().len());
    for condition in query.conditions() {
        let column = quote_identifier(&condition.column)?;
        let part = match (condition.operator, &condition.value) {
            (Operator::Eq, Value::Null) => format!("{column} IS NULL"),
            (Operator::Ne, Value::Null) => format!("{column} IS NOT NULL"),
            // Ordering against NULL is never true
            (_, Value::Null) => "1 = 0".to_string(),
            // NULL differs from every value
            (Operator::Ne, value) => {
                let placeholder = params.push(value.clone());
                format!("({column} <> {placeholder} OR {column} IS NULL)")
            }
            (operator, value) => {
                let placeholder = params.push(value.clone());
                format!("{column} {} {placeholder}", operator.as_sql())
            }
        };
        parts.push(part);
    }
    Ok(format!(" WHERE {}", parts.join(" AND ")))
}

/// Render the `ORDER BY` clause of a query, or an empty string.
pub(crate) fn order_clause(query: &Query) -> Result<String> {
    if query.order().is_empty() {
        return Ok(String::new());
    }

    let keys = query
        .order()
        .iter()
        .map(|(column, direction)| {
            Ok(format!(
                "{} {}",
                quote_identifier(column)?,
                direction.as_sql()
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(format!(" ORDER BY {}", keys.join(", ")))
}

/// Decode one column of a result row.
pub(crate) fn decode_value(row: &AnyRow, index: usize) -> Result<Value> {
    let column = row.column(index).name().to_string();

    let is_null = row
        .try_get_raw(index)
        .map(|raw| raw.is_null())
        .sql_context(&format!("Failed to read column {column}"))?;
    if is_null {
        return Ok(Value::Null);
    }

    if let Ok(i) = row.try_get::<i64, _>(index) {
        return Ok(Value::Integer(i));
    }
    if let Ok(s) = row.try_get::<String, _>(index) {
        return Ok(Value::Text(s));
    }
    if let Ok(b) = row.try_get::<bool, _>(index) {
        return Ok(Value::Bool(b));
    }
    Err(BackendError::UnsupportedValue { column }.into())
}

/// Decode a full result row into a clean [`Row`].
pub(crate) fn decode_row(row: &AnyRow, key_column: &str) -> Result<Row> {
    let mut attributes = BTreeMap::new();
    for (index, column) in row.columns().iter().enumerate() {
        attributes.insert(column.name().to_string(), decode_value(row, index)?);
    }
    Ok(Row::from_stored(key_column, attributes))
}
