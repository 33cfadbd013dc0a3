//! Position maintenance.
//!
//! [`PositionManager`] keeps the position column of a table dense: within
//! every group the positions are exactly `1..=N`. It does so from five
//! lifecycle hooks, each issuing at most two bulk statements through a
//! [`SortableBackend`]:
//!
//! | hook       | when                      | effect                                              |
//! |------------|---------------------------|-----------------------------------------------------|
//! | `creating` | before insert             | set position to 1 or `max + 1` in the group         |
//! | `created`  | after insert              | insert-first only: shift the rest of the group up   |
//! | `updating` | before update             | on group change: set position in the new group      |
//! | `updated`  | after update              | on group change: close old gap, shift new group     |
//! | `deleted`  | after delete              | close the gap left behind                           |
//!
//! The hooks assume no other writer touches the same group concurrently.

use tracing::{debug, trace};

use crate::Result;
use crate::backend::SortableBackend;
use crate::backend::errors::BackendError;
use crate::config::SortableConfig;
use crate::record::SortableRecord;
use crate::scope::{Direction, GroupScope, Operator, Query};
use crate::value::Value;

/// State captured by [`PositionManager::updating`] when a record changes
/// group, consumed by [`PositionManager::updated`].
///
/// Capturing it before the update is written means the old group is closed
/// correctly even if the record's original snapshot has been refreshed by
/// the time the post-update hook runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMove {
    /// The group the record left.
    pub previous_group: GroupScope,
    /// The record's position in that group, if it had one.
    pub previous_position: Option<i64>,
}

/// Maintains dense positions for one sortable collection.
#[derive(Debug, Clone, Default)]
pub struct PositionManager {
    config: SortableConfig,
}

impl PositionManager {
    pub fn new(config: SortableConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SortableConfig {
        &self.config
    }

    /// Name of the position column.
    pub fn column(&self) -> &str {
        &self.config.column
    }

    /// The record's current position.
    pub fn position<R: SortableRecord + ?Sized>(&self, record: &R) -> Option<i64> {
        record.attribute(self.column()).as_integer()
    }

    /// Overwrite the record's position in memory.
    pub fn set_position<R: SortableRecord + ?Sized>(&self, record: &mut R, position: i64) {
        record.set_attribute(&self.config.column, Value::Integer(position));
    }

    /// Query selecting every record in the same group as `record`.
    pub fn group_query<R: SortableRecord + ?Sized>(&self, record: &R) -> Query {
        GroupScope::current(&self.config, record).query()
    }

    /// Add an order on the position column to `query`.
    pub fn ordered(&self, query: Query, direction: Direction) -> Query {
        query.order_by(self.column(), direction)
    }

    /// Whether any group-by column differs from its original value.
    pub fn group_changed<R: SortableRecord + ?Sized>(&self, record: &R) -> bool {
        self.config
            .group_columns()
            .iter()
            .any(|column| record.attribute(column) != record.original(column))
    }

    /// Position a new record would get in its current group.
    pub async fn next_position<B, R>(&self, backend: &B, record: &R) -> Result<i64>
    where
        B: SortableBackend + ?Sized,
        R: SortableRecord + ?Sized,
    {
        if self.config.insert_first {
            return Ok(1);
        }
        let max = backend
            .max(&self.group_query(record), self.column())
            .await?;
        Ok(max.unwrap_or(0) + 1)
    }

    /// Move the record to the next position of its current group.
    pub async fn set_next_position<B, R>(&self, backend: &B, record: &mut R) -> Result<i64>
    where
        B: SortableBackend + ?Sized,
        R: SortableRecord + ?Sized,
    {
        let position = self.next_position(backend, &*record).await?;
        self.set_position(record, position);
        Ok(position)
    }

    /// Pre-create hook: assign the new record's position.
    pub async fn creating<B, R>(&self, backend: &B, record: &mut R) -> Result<()>
    where
        B: SortableBackend + ?Sized,
        R: SortableRecord + ?Sized,
    {
        if !self.config.sort_on_create {
            return Ok(());
        }
        let position = self.set_next_position(backend, record).await?;
        trace!(position, "Assigned position to new record");
        Ok(())
    }

    /// Post-create hook: make room at position 1 for insert-first tables.
    pub async fn created<B, R>(&self, backend: &B, record: &R) -> Result<()>
    where
        B: SortableBackend + ?Sized,
        R: SortableRecord + ?Sized,
    {
        if !self.config.sort_on_create || !self.config.insert_first {
            return Ok(());
        }
        let query = self.others_in_group(record)?;
        let shifted = backend.increment(&query, self.column(), 1).await?;
        debug!(key = %record.key(), shifted, "Inserted record first");
        Ok(())
    }

    /// Pre-update hook.
    ///
    /// When a group-by column changed, positions the record in its new group
    /// and returns what [`updated`](Self::updated) needs to close the old
    /// group. Returns `None` otherwise.
    pub async fn updating<B, R>(&self, backend: &B, record: &mut R) -> Result<Option<GroupMove>>
    where
        B: SortableBackend + ?Sized,
        R: SortableRecord + ?Sized,
    {
        if !self.group_changed(&*record) {
            return Ok(None);
        }

        let moved = GroupMove {
            previous_group: GroupScope::original(&self.config, &*record),
            previous_position: record.original(self.column()).as_integer(),
        };
        let position = self.set_next_position(backend, record).await?;
        debug!(
            key = %record.key(),
            from = %moved.previous_group,
            to = %GroupScope::current(&self.config, &*record),
            position,
            "Record changed group"
        );
        Ok(Some(moved))
    }

    /// Post-update hook.
    ///
    /// Closes the gap in the group the record left, then for insert-first
    /// tables shifts the rest of the new group up. The order matters: the
    /// new group is only shifted once the old one no longer counts the
    /// record.
    pub async fn updated<B, R>(
        &self,
        backend: &B,
        record: &R,
        moved: Option<GroupMove>,
    ) -> Result<()>
    where
        B: SortableBackend + ?Sized,
        R: SortableRecord + ?Sized,
    {
        let Some(moved) = moved else {
            return Ok(());
        };

        if let Some(previous_position) = moved.previous_position {
            let query = moved.previous_group.query().filter(
                self.column(),
                Operator::Gt,
                previous_position,
            );
            let closed = backend.decrement(&query, self.column(), 1).await?;
            trace!(group = %moved.previous_group, closed, "Closed gap in previous group");
        }

        if self.config.insert_first {
            let query = self.others_in_group(record)?;
            let shifted = backend.increment(&query, self.column(), 1).await?;
            trace!(shifted, "Shifted new group");
        }
        Ok(())
    }

    /// Post-delete hook: close the gap the record left.
    pub async fn deleted<B, R>(&self, backend: &B, record: &R) -> Result<()>
    where
        B: SortableBackend + ?Sized,
        R: SortableRecord + ?Sized,
    {
        if !self.config.reorder_on_delete {
            return Ok(());
        }
        let Some(position) = self.position(record) else {
            return Ok(());
        };

        let query = self
            .group_query(record)
            .filter(self.column(), Operator::Gt, position);
        let closed = backend.decrement(&query, self.column(), 1).await?;
        debug!(key = %record.key(), position, closed, "Closed gap after delete");
        Ok(())
    }

    /// The record's group minus the record itself.
    fn others_in_group<R: SortableRecord + ?Sized>(&self, record: &R) -> Result<Query> {
        let key = record.key();
        if key.is_null() {
            return Err(BackendError::MissingKey {
                column: record.key_column().to_string(),
            }
            .into());
        }
        Ok(self
            .group_query(record)
            .filter(record.key_column(), Operator::Ne, key))
    }
}
