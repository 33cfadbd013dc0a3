//! Backend implementations for sortable tables
//!
//! This module provides the core `SortableBackend` trait and its implementations
//! organized by category.
//!
//! The trait covers two concerns. The position manager only needs the scoped
//! bulk operations (`max`, `shift`, `fetch`); the host wiring in
//! [`Collection`](crate::Collection) additionally persists rows through
//! `insert`, `update` and `delete`.

use std::any::Any;

use async_trait::async_trait;

use crate::Result;
use crate::record::Row;
use crate::scope::Query;
use crate::value::Value;

pub mod database;
pub mod errors;

pub use errors::BackendError;

/// Storage abstraction for one sortable table.
///
/// All backends must be `Send` and `Sync` so a collection can be shared
/// across tasks, and implement `Any` to allow downcasting if needed.
///
/// Each method is a single statement against the store. Running a whole
/// lifecycle operation atomically is the caller's concern.
#[async_trait]
pub trait SortableBackend: Send + Sync + Any {
    /// Largest value of `column` among rows matching `query`.
    ///
    /// Returns `None` when no matching row has a value.
    async fn max(&self, query: &Query, column: &str) -> Result<Option<i64>>;

    /// Add `delta` to `column` on every row matching `query`.
    ///
    /// Returns the number of rows changed.
    async fn shift(&self, query: &Query, column: &str, delta: i64) -> Result<u64>;

    /// Increment `column` by `amount` on every row matching `query`.
    async fn increment(&self, query: &Query, column: &str, amount: i64) -> Result<u64> {
        self.shift(query, column, amount).await
    }

    /// Decrement `column` by `amount` on every row matching `query`.
    async fn decrement(&self, query: &Query, column: &str, amount: i64) -> Result<u64> {
        self.shift(query, column, -amount).await
    }

    /// Rows matching `query`, in the query's order.
    async fn fetch(&self, query: &Query) -> Result<Vec<Row>>;

    /// Look a row up by primary key.
    async fn find(&self, key: &Value) -> Result<Option<Row>>;

    /// Persist a new row.
    ///
    /// If the row has no key the backend assigns one and writes it back
    /// into `row`.
    async fn insert(&self, row: &mut Row) -> Result<()>;

    /// Write the row's dirty attributes.
    async fn update(&self, row: &Row) -> Result<()>;

    /// Remove the row.
    async fn delete(&self, row: &Row) -> Result<()>;

    /// Returns a reference to the backend as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Lets a backend picked at runtime stand in wherever a concrete one is
/// expected.
#[async_trait]
impl<T: SortableBackend + ?Sized> SortableBackend for Box<T> {
    async fn max(&self, query: &Query, column: &str) -> Result<Option<i64>> {
        (**self).max(query, column).await
    }

    async fn shift(&self, query: &Query, column: &str, delta: i64) -> Result<u64> {
        (**self).shift(query, column, delta).await
    }

    async fn fetch(&self, query: &Query) -> Result<Vec<Row>> {
        (**self).fetch(query).await
    }

    async fn find(&self, key: &Value) -> Result<Option<Row>> {
        (**self).find(key).await
    }

    async fn insert(&self, row: &mut Row) -> Result<()> {
        (**self).insert(row).await
    }

    async fn update(&self, row: &Row) -> Result<()> {
        (**self).update(row).await
    }

    async fn delete(&self, row: &Row) -> Result<()> {
        (**self).delete(row).await
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }
}
