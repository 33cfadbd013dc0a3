//! Persistence operations for the in-memory table
//!
//! This module handles serialization and file I/O for saving/loading
//! the table to/from JSON files.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::RwLock;

use super::{InMemory, Table};
use crate::{Error, Result, backend::errors::BackendError, record::Row};

/// The current persistence file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const PERSISTENCE_VERSION: u8 = 0;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the persistence version during deserialization.
fn validate_persistence_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != PERSISTENCE_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported persistence version {version}, expected {PERSISTENCE_VERSION}"
        )));
    }
    Ok(version)
}

/// On-disk shape of a table.
#[derive(Serialize, Deserialize)]
struct SerializableTable {
    /// File format version for compatibility checking
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_persistence_version"
    )]
    version: u8,
    #[serde(flatten)]
    table: Table,
}

/// Saves the table to a file as pretty-printed JSON.
pub(crate) async fn save_to_file<P: AsRef<Path>>(backend: &InMemory, path: P) -> Result<()> {
    let table = backend.table.read().await.clone();
    let serializable = SerializableTable {
        version: PERSISTENCE_VERSION,
        table,
    };

    let json = serde_json::to_string_pretty(&serializable)
        .map_err(|e| -> Error { BackendError::SerializationFailed { source: e }.into() })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| -> Error { BackendError::FileIo { source: e }.into() })
}

/// Loads a table from a JSON file.
///
/// If the file does not exist, a new, empty table is returned.
pub(crate) async fn load_from_file<P: AsRef<Path>>(
    path: P,
    key_column: impl Into<String>,
) -> Result<InMemory> {
    let key_column = key_column.into();
    match tokio::fs::read_to_string(path).await {
        Ok(json) => {
            let serializable: SerializableTable = serde_json::from_str(&json).map_err(|e| -> Error {
                BackendError::DeserializationFailed { source: e }.into()
            })?;
            let mut table = serializable.table;
            // Stored rows are clean by definition
            table.rows = table
                .rows
                .into_iter()
                .map(|row| Row::from_stored(key_column.as_str(), row.attributes().clone()))
                .collect();
            Ok(InMemory {
                key_column,
                table: RwLock::new(table),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(InMemory::with_key_column(key_column))
        }
        Err(e) => Err(BackendError::FileIo { source: e }.into()),
    }
}
