//! Sortable configuration.
//!
//! Every sortable collection is driven by a [`SortableConfig`]. It is built
//! once, at startup, by merging the global defaults with an optional
//! per-model [`SortableOptions`] override. Overrides win field by field.
//!
//! Overrides are usually read from JSON. Parsing rejects keys outside the
//! recognized set, since a misspelled key would otherwise silently fall back
//! to the default.
//!
//! ```
//! use sortable::config::{SortableConfig, SortableOptions};
//!
//! let overrides = SortableOptions::from_json(&serde_json::json!({
//!     "group_by": ["board_id", "lane"],
//!     "insert_first": true,
//! }))
//! .unwrap();
//!
//! let config = SortableConfig::default().merge(&overrides);
//! assert_eq!(config.column, "position");
//! assert!(config.insert_first);
//! assert_eq!(config.group_columns(), ["board_id", "lane"]);
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default name of the position column.
pub const DEFAULT_COLUMN: &str = "position";

/// Every configuration key understood by [`SortableConfig::resolve`] and
/// [`SortableOptions::from_json`].
pub const KEYS: &[&str] = &[
    "column",
    "insert_first",
    "group_by",
    "reorder_on_delete",
    "sort_on_create",
];

/// Errors raised while building or querying a configuration.
///
/// Both variants indicate a programmer or deployment mistake and are not
/// meant to be recovered from.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The key is not part of the sortable configuration.
    #[error("Unknown key {key} in sortable config")]
    UnknownKey {
        /// The key that was requested or supplied
        key: String,
    },

    /// The key is known but its value is unusable.
    #[error("Invalid value for sortable config key {key}: {reason}")]
    InvalidValue {
        /// The offending key
        key: String,
        /// Why the value was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Check if this error is about an unrecognized key.
    pub fn is_unknown_key(&self) -> bool {
        matches!(self, ConfigError::UnknownKey { .. })
    }

    /// The configuration key this error refers to.
    pub fn key(&self) -> &str {
        match self {
            ConfigError::UnknownKey { key } | ConfigError::InvalidValue { key, .. } => key,
        }
    }
}

impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Config(err)
    }
}

/// Fully resolved configuration of one sortable collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortableConfig {
    /// Name of the position attribute.
    pub column: String,
    /// Insert new records at position 1 instead of appending them.
    pub insert_first: bool,
    /// Columns partitioning the table into independently numbered groups.
    /// Empty means the whole table is a single group.
    pub group_by: Vec<String>,
    /// Close the gap left behind by a deleted record.
    pub reorder_on_delete: bool,
    /// Assign positions when records are created.
    pub sort_on_create: bool,
}

impl Default for SortableConfig {
    fn default() -> Self {
        Self {
            column: DEFAULT_COLUMN.to_string(),
            insert_first: false,
            group_by: Vec::new(),
            reorder_on_delete: true,
            sort_on_create: true,
        }
    }
}

impl SortableConfig {
    /// Set the position column name.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Set the insertion policy.
    pub fn with_insert_first(mut self, insert_first: bool) -> Self {
        self.insert_first = insert_first;
        self
    }

    /// Set the group-by columns.
    pub fn with_group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set whether deletes close the gap in their group.
    pub fn with_reorder_on_delete(mut self, reorder_on_delete: bool) -> Self {
        self.reorder_on_delete = reorder_on_delete;
        self
    }

    /// Set whether positions are assigned on create.
    pub fn with_sort_on_create(mut self, sort_on_create: bool) -> Self {
        self.sort_on_create = sort_on_create;
        self
    }

    /// Apply an override on top of this configuration.
    pub fn merge(&self, overrides: &SortableOptions) -> Self {
        Self {
            column: overrides
                .column
                .clone()
                .unwrap_or_else(|| self.column.clone()),
            insert_first: overrides.insert_first.unwrap_or(self.insert_first),
            group_by: overrides
                .group_by
                .clone()
                .unwrap_or_else(|| self.group_by.clone()),
            reorder_on_delete: overrides
                .reorder_on_delete
                .unwrap_or(self.reorder_on_delete),
            sort_on_create: overrides.sort_on_create.unwrap_or(self.sort_on_create),
        }
    }

    /// The configured group-by columns, in order.
    pub fn group_columns(&self) -> &[String] {
        &self.group_by
    }

    /// Whether the table is partitioned into groups at all.
    pub fn is_grouped(&self) -> bool {
        !self.group_by.is_empty()
    }

    /// Look a setting up by name.
    ///
    /// Intended for tooling that addresses settings by string. Code should
    /// read the fields directly.
    pub fn resolve(&self, key: &str) -> Result<serde_json::Value, ConfigError> {
        let value = match key {
            "column" => serde_json::Value::from(self.column.clone()),
            "insert_first" => serde_json::Value::from(self.insert_first),
            "group_by" => match self.group_by.as_slice() {
                [] => serde_json::Value::Bool(false),
                [single] => serde_json::Value::from(single.clone()),
                many => serde_json::Value::from(many.to_vec()),
            },
            "reorder_on_delete" => serde_json::Value::from(self.reorder_on_delete),
            "sort_on_create" => serde_json::Value::from(self.sort_on_create),
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                });
            }
        };
        Ok(value)
    }

    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.column.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "column".to_string(),
                reason: "position column name is empty".to_string(),
            });
        }

        for (i, column) in self.group_by.iter().enumerate() {
            if column.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "group_by".to_string(),
                    reason: "group column name is empty".to_string(),
                });
            }
            if *column == self.column {
                return Err(ConfigError::InvalidValue {
                    key: "group_by".to_string(),
                    reason: format!("cannot group by the position column {column}"),
                });
            }
            if self.group_by[..i].contains(column) {
                return Err(ConfigError::InvalidValue {
                    key: "group_by".to_string(),
                    reason: format!("column {column} listed twice"),
                });
            }
        }

        Ok(())
    }
}

/// A partial configuration. `None` fields fall through to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortableOptions {
    pub column: Option<String>,
    pub insert_first: Option<bool>,
    pub group_by: Option<Vec<String>>,
    pub reorder_on_delete: Option<bool>,
    pub sort_on_create: Option<bool>,
}

impl SortableOptions {
    /// Parse options from a JSON object.
    ///
    /// `group_by` accepts `false`/`null` (no grouping), a single column name,
    /// or a list of column names.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, ConfigError> {
        let map = match json {
            serde_json::Value::Object(map) => map,
            serde_json::Value::Null => return Ok(Self::default()),
            other => {
                return Err(ConfigError::InvalidValue {
                    key: "sortable".to_string(),
                    reason: format!("expected an object, found {other}"),
                });
            }
        };

        let mut options = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "column" => options.column = Some(expect_string(key, value)?),
                "insert_first" => options.insert_first = Some(expect_bool(key, value)?),
                "group_by" => options.group_by = Some(parse_group_by(value)?),
                "reorder_on_delete" => {
                    options.reorder_on_delete = Some(expect_bool(key, value)?)
                }
                "sort_on_create" => options.sort_on_create = Some(expect_bool(key, value)?),
                _ => return Err(ConfigError::UnknownKey { key: key.clone() }),
            }
        }
        Ok(options)
    }
}

impl<'de> Deserialize<'de> for SortableOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let json = serde_json::Value::deserialize(deserializer)?;
        SortableOptions::from_json(&json).map_err(serde::de::Error::custom)
    }
}

fn expect_string(key: &str, value: &serde_json::Value) -> Result<String, ConfigError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: format!("expected a string, found {value}"),
        })
}

fn expect_bool(key: &str, value: &serde_json::Value) -> Result<bool, ConfigError> {
    value.as_bool().ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: format!("expected a boolean, found {value}"),
    })
}

fn parse_group_by(value: &serde_json::Value) -> Result<Vec<String>, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: "group_by".to_string(),
        reason: format!("expected false, a column name or a list of column names, found {value}"),
    };

    match value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => Ok(Vec::new()),
        serde_json::Value::String(column) if column.is_empty() => Ok(Vec::new()),
        serde_json::Value::String(column) => Ok(vec![column.clone()]),
        serde_json::Value::Array(items) => items
            .iter()
            .filter(|item| item.as_str() != Some(""))
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        _ => Err(invalid()),
    }
}

/// On-disk configuration: global defaults plus per-model overrides.
///
/// ```json
/// {
///   "defaults": { "reorder_on_delete": true },
///   "models": { "cards": { "group_by": "lane", "insert_first": true } }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Overrides applied to every model.
    pub defaults: SortableOptions,
    /// Overrides for individual models, keyed by model (table) name.
    pub models: BTreeMap<String, SortableOptions>,
}

impl ConfigFile {
    /// Read a configuration file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let file: ConfigFile = serde_json::from_str(&contents)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            models = file.models.len(),
            "Loaded sortable config"
        );
        Ok(file)
    }

    /// Resolve the configuration of a model.
    ///
    /// Built-in defaults, then the file's `defaults`, then the model's own
    /// overrides.
    pub fn config_for(&self, model: &str) -> Result<SortableConfig, ConfigError> {
        let mut config = SortableConfig::default().merge(&self.defaults);
        if let Some(overrides) = self.models.get(model) {
            config = config.merge(overrides);
        }
        config.validate()?;
        Ok(config)
    }
}
