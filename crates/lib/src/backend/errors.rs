//! Backend error types.
//!
//! Store failures are surfaced as-is; nothing in this crate retries them.

use thiserror::Error;

use crate::value::Value;

/// Errors that can occur during backend operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// No row with the given key.
    #[error("Record not found: {key}")]
    RecordNotFound {
        /// The key that was looked up
        key: Value,
    },

    /// An operation needed the record's primary key but it has none.
    #[error("Record has no value for key column {column}")]
    MissingKey {
        /// Name of the key column
        column: String,
    },

    /// A row with the same key already exists.
    #[error("Duplicate key: {key}")]
    DuplicateKey {
        /// The conflicting key
        key: Value,
    },

    /// A table or column name is not a plain SQL identifier.
    #[error("Invalid identifier: {name:?}")]
    InvalidIdentifier {
        /// The rejected name
        name: String,
    },

    /// Serialization of a persisted table failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization of a persisted table failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A stored value has a type this crate cannot represent.
    #[error("Unsupported value in column {column}")]
    UnsupportedValue {
        /// The column holding the value
        column: String,
    },

    /// SQL database error from sqlx.
    #[cfg(any(feature = "sqlite", feature = "postgres"))]
    #[error("SQL error: {reason}")]
    SqlxError {
        /// What was being attempted, with the driver message
        reason: String,
        /// The underlying sqlx error, when there is one
        #[source]
        source: Option<sqlx::Error>,
    },
}

impl BackendError {
    /// Check if this error indicates a record was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::RecordNotFound { .. })
    }

    /// Check if this error comes from the store itself rather than from
    /// bad input.
    pub fn is_store_error(&self) -> bool {
        match self {
            BackendError::FileIo { .. }
            | BackendError::SerializationFailed { .. }
            | BackendError::DeserializationFailed { .. } => true,
            #[cfg(any(feature = "sqlite", feature = "postgres"))]
            BackendError::SqlxError { .. } => true,
            _ => false,
        }
    }

    /// Check if this error was caused by invalid input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            BackendError::MissingKey { .. }
                | BackendError::DuplicateKey { .. }
                | BackendError::InvalidIdentifier { .. }
                | BackendError::UnsupportedValue { .. }
        )
    }
}

impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
