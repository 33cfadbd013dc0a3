//! In-memory table backend implementation
//!
//! This module provides an in-memory implementation of the `SortableBackend`
//! trait, suitable for testing, development, or hosts that keep their records
//! in process and only need the ordering behavior.

mod persistence;
mod storage;

use std::any::Any;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::Result;
use crate::backend::SortableBackend;
use crate::record::Row;
use crate::scope::Query;
use crate::value::Value;

/// Default primary key column for in-memory tables.
pub const DEFAULT_KEY_COLUMN: &str = "id";

/// Rows plus the key sequence, guarded together so that key assignment and
/// insertion happen under one lock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Table {
    pub(crate) rows: Vec<Row>,
    pub(crate) next_key: i64,
}

/// A single table held in memory.
///
/// Rows keep insertion order. Keys are assigned from an integer sequence
/// when a row is inserted without one.
///
/// It provides basic persistence via `save_to_file` and `load_from_file`,
/// serializing the table to JSON.
#[derive(Debug)]
pub struct InMemory {
    key_column: String,
    pub(crate) table: RwLock<Table>,
}

impl InMemory {
    /// Creates a new, empty table keyed by `id`.
    pub fn new() -> Self {
        Self::with_key_column(DEFAULT_KEY_COLUMN)
    }

    /// Creates a new, empty table keyed by `key_column`.
    pub fn with_key_column(key_column: impl Into<String>) -> Self {
        Self {
            key_column: key_column.into(),
            table: RwLock::new(Table {
                rows: Vec::new(),
                next_key: 1,
            }),
        }
    }

    /// Name of the primary key column.
    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    /// Number of rows currently stored.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Whether the table is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Saves the table to a file as JSON.
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path).await
    }

    /// Loads a table from a JSON file.
    ///
    /// If the file does not exist, a new, empty table is returned.
    pub async fn load_from_file<P: AsRef<Path>>(
        path: P,
        key_column: impl Into<String>,
    ) -> Result<Self> {
        persistence::load_from_file(path, key_column).await
    }
}

impl Default for InMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SortableBackend for InMemory {
    async fn max(&self, query: &Query, column: &str) -> Result<Option<i64>> {
        storage::max(self, query, column).await
    }

    async fn shift(&self, query: &Query, column: &str, delta: i64) -> Result<u64> {
        storage::shift(self, query, column, delta).await
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<Row>> {
        storage::fetch(self, query).await
    }

    async fn find(&self, key: &Value) -> Result<Option<Row>> {
        storage::find(self, key).await
    }

    async fn insert(&self, row: &mut Row) -> Result<()> {
        storage::insert(self, row).await
    }

    async fn update(&self, row: &Row) -> Result<()> {
        storage::update(self, row).await
    }

    async fn delete(&self, row: &Row) -> Result<()> {
        storage::delete(self, row).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
