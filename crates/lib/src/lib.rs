//!
//! Sortable: dense, group-scoped positions for relational records.
//! This library keeps an integer position column gap-free while records are
//! created, moved between groups, and deleted.
//!
//! ## Core Concepts
//!
//! * **Position**: a 1-based rank of a record within its group. After every
//!   lifecycle operation the positions of a group are exactly `1..=N`.
//! * **Group (`scope::GroupScope`)**: the records sharing the same values for
//!   every configured `group_by` column. Without `group_by` the whole table
//!   is one group.
//! * **Configuration (`config::SortableConfig`)**: position column, insertion
//!   policy, grouping and delete behavior, merged from global defaults and a
//!   per-model override.
//! * **PositionManager (`position::PositionManager`)**: the lifecycle hooks
//!   (`creating`, `created`, `updating`, `updated`, `deleted`) that issue the
//!   bulk increment/decrement statements.
//! * **Backends (`backend::SortableBackend`)**: the storage a table lives
//!   in, either in memory or in a SQL database via sqlx.
//! * **Collection (`collection::Collection`)**: a backend plus a manager,
//!   calling each hook at its lifecycle point around inserts, updates and
//!   deletes.

pub mod backend;
pub mod collection;
pub mod config;
pub mod position;
pub mod record;
pub mod scope;
pub mod value;

pub use backend::SortableBackend;
pub use collection::Collection;
pub use config::{ConfigFile, SortableConfig, SortableOptions};
pub use position::{GroupMove, PositionManager};
pub use record::{Row, SortableRecord};
pub use scope::{Direction, GroupScope, Operator, Query};
pub use value::Value;

/// Result type used throughout the sortable library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the sortable library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured configuration errors from the config module
    #[error(transparent)]
    Config(config::ConfigError),

    /// Structured storage errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Backend(_) => "backend",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a record was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is a configuration mistake.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Check if this error is storage-related.
    pub fn is_backend_error(&self) -> bool {
        matches!(self, Error::Backend(_))
    }

    /// Check if this error was raised by the underlying store.
    pub fn is_store_error(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_store_error(),
            _ => false,
        }
    }

    /// Check if this error is validation-related.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Config(_) => true,
            Error::Backend(backend_err) => backend_err.is_validation_error(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
