//! Database-style backend implementations
//!
//! These backends store the rows of one sortable table and evaluate the
//! scoped bulk operations against them.

mod in_memory;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod sql;

pub use in_memory::{DEFAULT_KEY_COLUMN, InMemory};
#[cfg(feature = "postgres")]
pub use sql::Postgres;
#[cfg(feature = "sqlite")]
pub use sql::Sqlite;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub use sql::{DbKind, SqlxBackend};
