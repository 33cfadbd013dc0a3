//! Table creation for sortable SQL tables.
//!
//! Hosts normally own their schema. These helpers create a table with the
//! shape the position manager expects (a key, a nullable non-negative
//! position column and the group-by columns) for tests, tooling and quick
//! starts. They never alter an existing table.
//!
//! DDL differs between SQLite and PostgreSQL only in how the auto-generated
//! key is declared.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::config::SortableConfig;

use super::render::quote_identifier;
use super::{DbKind, SqlxBackend, SqlxResultExt};

/// SQL type of a group-by column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    #[default]
    Text,
}

impl ColumnType {
    fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Integer => "BIGINT",
            ColumnType::Text => "TEXT",
        }
    }
}

/// Shape of a sortable table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub table: String,
    pub key_column: String,
    pub position_column: String,
    pub group_columns: Vec<(String, ColumnType)>,
    /// Payload columns the host stores alongside the ordering columns.
    #[serde(default)]
    pub extra_columns: Vec<(String, ColumnType)>,
}

impl TableSpec {
    /// The table implied by a configuration, with text group columns.
    pub fn for_config(table: &str, key_column: &str, config: &SortableConfig) -> Self {
        Self {
            table: table.to_string(),
            key_column: key_column.to_string(),
            position_column: config.column.clone(),
            group_columns: config
                .group_columns()
                .iter()
                .map(|column| (column.clone(), ColumnType::default()))
                .collect(),
            extra_columns: Vec::new(),
        }
    }

    /// Add a payload column.
    pub fn with_extra_column(mut self, column: impl Into<String>, column_type: ColumnType) -> Self {
        self.extra_columns.push((column.into(), column_type));
        self
    }

    /// Change the type of one group or payload column.
    pub fn with_column_type(mut self, column: &str, column_type: ColumnType) -> Self {
        for (name, ty) in self.group_columns.iter_mut().chain(self.extra_columns.iter_mut()) {
            if name == column {
                *ty = column_type;
            }
        }
        self
    }

    /// `CREATE TABLE` and `CREATE INDEX` statements for the given dialect.
    pub fn statements(&self, kind: DbKind) -> Result<Vec<String>> {
        let table = quote_identifier(&self.table)?;
        let key = quote_identifier(&self.key_column)?;
        let position = quote_identifier(&self.position_column)?;

        let key_definition = match kind {
            DbKind::Sqlite => format!("{key} INTEGER PRIMARY KEY AUTOINCREMENT"),
            DbKind::Postgres => format!("{key} BIGSERIAL PRIMARY KEY"),
        };

        let mut columns = vec![
            key_definition,
            format!("{position} BIGINT CHECK ({position} >= 0)"),
        ];
        let mut index_columns = Vec::with_capacity(self.group_columns.len() + 1);
        for (name, column_type) in &self.group_columns {
            let name = quote_identifier(name)?;
            columns.push(format!("{name} {}", column_type.as_sql()));
            index_columns.push(name);
        }
        index_columns.push(position);
        for (name, column_type) in &self.extra_columns {
            columns.push(format!("{} {}", quote_identifier(name)?, column_type.as_sql()));
        }

        // Index names share the schema namespace on PostgreSQL
        let index = quote_identifier(&format!("idx_{}_{}", self.table, self.position_column))?;
        Ok(vec![
            format!(
                "CREATE TABLE IF NOT EXISTS {table} (\n    {}\n)",
                columns.join(",\n    ")
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS {index} ON {table}({})",
                index_columns.join(", ")
            ),
        ])
    }
}

/// Create the table described by `spec` if it does not exist.
pub async fn create_table(backend: &SqlxBackend, spec: &TableSpec) -> Result<()> {
    for statement in spec.statements(backend.kind())? {
        sqlx::query(&statement)
            .execute(backend.pool())
            .await
            .sql_context(&format!("Schema creation failed - SQL: {statement}"))?;
    }

    tracing::info!(
        table = %spec.table,
        groups = spec.group_columns.len(),
        "Sortable table ready"
    );
    Ok(())
}
