//! Host wiring: a table plus the position manager that keeps it ordered.
//!
//! [`Collection`] is where the lifecycle hooks get called. It persists rows
//! through its backend and invokes the [`PositionManager`] hooks at the
//! points they are defined for, so callers never dispatch them by hand.

use tracing::debug;

use crate::Result;
use crate::backend::SortableBackend;
use crate::backend::errors::BackendError;
use crate::config::SortableConfig;
use crate::position::PositionManager;
use crate::record::{Row, SortableRecord};
use crate::scope::{Direction, GroupScope};
use crate::value::Value;

/// A sortable table.
///
/// # Example
///
/// ```
/// use sortable::backend::database::InMemory;
/// use sortable::{Collection, Direction, Row, SortableConfig, Value};
///
/// #[tokio::main]
/// async fn main() -> sortable::Result<()> {
///     let config = SortableConfig::default().with_group_by(["lane"]);
///     let cards = Collection::new(InMemory::new(), config);
///
///     let first = cards.create(Row::new("id").with("lane", "todo")).await?;
///     let second = cards.create(Row::new("id").with("lane", "todo")).await?;
///     assert_eq!(first.get("position"), Some(&Value::Integer(1)));
///     assert_eq!(second.get("position"), Some(&Value::Integer(2)));
///
///     let todo = cards.ordered(&cards.group_of(&first), Direction::Desc).await?;
///     assert_eq!(todo[0].get("id"), second.get("id"));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Collection<B> {
    manager: PositionManager,
    backend: B,
}

impl<B: SortableBackend> Collection<B> {
    /// Wrap `backend` with the ordering described by `config`.
    pub fn new(backend: B, config: SortableConfig) -> Self {
        Self {
            manager: PositionManager::new(config),
            backend,
        }
    }

    pub fn manager(&self) -> &PositionManager {
        &self.manager
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &SortableConfig {
        self.manager.config()
    }

    /// Insert a new row and return it as stored, key and position included.
    pub async fn create(&self, mut row: Row) -> Result<Row> {
        self.manager.creating(&self.backend, &mut row).await?;
        self.backend.insert(&mut row).await?;
        self.manager.created(&self.backend, &row).await?;
        row.sync_original();
        debug!(key = %row.key(), "Created sortable row");
        Ok(row)
    }

    /// Persist the row's pending changes.
    ///
    /// Does nothing when nothing changed. A change to any group-by column
    /// moves the row into its new group. The row's previous position and
    /// group are read from the store, so a row whose snapshot went stale
    /// after other rows shifted is still moved correctly.
    pub async fn save(&self, row: &mut Row) -> Result<()> {
        if !row.is_dirty() {
            return Ok(());
        }
        let stored = self.stored(row).await?;
        row.rebase(&stored);
        if !row.is_dirty() {
            return Ok(());
        }
        let moved = self.manager.updating(&self.backend, row).await?;
        self.backend.update(row).await?;
        self.manager.updated(&self.backend, &*row, moved).await?;
        row.sync_original();
        Ok(())
    }

    /// Delete the row and close the gap it leaves.
    ///
    /// Only the key of `row` is used; the gap is closed at the stored
    /// position.
    pub async fn delete(&self, row: &Row) -> Result<()> {
        let stored = self.stored(row).await?;
        self.backend.delete(&stored).await?;
        self.manager.deleted(&self.backend, &stored).await?;
        debug!(key = %stored.key(), "Deleted sortable row");
        Ok(())
    }

    /// Look a row up by key.
    pub async fn find(&self, key: &Value) -> Result<Option<Row>> {
        self.backend.find(key).await
    }

    /// All rows of one group, ordered by position.
    pub async fn ordered(&self, group: &GroupScope, direction: Direction) -> Result<Vec<Row>> {
        let query = self.manager.ordered(group.query(), direction);
        self.backend.fetch(&query).await
    }

    /// The stored copy of `row`.
    async fn stored(&self, row: &Row) -> Result<Row> {
        let key = row.key();
        if key.is_null() {
            return Err(BackendError::MissingKey {
                column: row.key_column().to_string(),
            }
            .into());
        }
        let stored = self.backend.find(&key).await?;
        stored.ok_or_else(|| BackendError::RecordNotFound { key }.into())
    }

    /// The group a row belongs to.
    pub fn group_of(&self, row: &Row) -> GroupScope {
        GroupScope::current(self.config(), row)
    }
}
