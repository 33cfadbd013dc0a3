//! The record capability consumed by the position manager.
//!
//! A type opts into position tracking by implementing [`SortableRecord`].
//! [`Row`] is the attribute-map implementation used by the bundled backends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A persisted record with named attributes and a pre-change snapshot.
///
/// The position manager reads and writes the position attribute, reads the
/// group-by attributes, and compares them against their original values to
/// detect group moves.
pub trait SortableRecord {
    /// Name of the primary key attribute.
    fn key_column(&self) -> &str;

    /// Current value of the primary key. [`Value::Null`] before insertion
    /// when the backend assigns keys.
    fn key(&self) -> Value {
        self.attribute(self.key_column())
    }

    /// Current value of an attribute. Missing attributes read as null.
    fn attribute(&self, name: &str) -> Value;

    /// Overwrite an attribute in memory.
    fn set_attribute(&mut self, name: &str, value: Value);

    /// Value of an attribute as it was last loaded from or written to the
    /// store.
    fn original(&self, name: &str) -> Value;
}

/// A record stored as an ordered attribute map.
///
/// `original` holds the attributes as of the last load or successful write;
/// attributes that differ from it are dirty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    key_column: String,
    attributes: BTreeMap<String, Value>,
    #[serde(skip)]
    original: BTreeMap<String, Value>,
}

impl Row {
    /// Creates an empty, unsaved row keyed by `key_column`.
    pub fn new(key_column: impl Into<String>) -> Self {
        Self {
            key_column: key_column.into(),
            attributes: BTreeMap::new(),
            original: BTreeMap::new(),
        }
    }

    /// Builds a clean row from stored attributes.
    pub fn from_stored(key_column: impl Into<String>, attributes: BTreeMap<String, Value>) -> Self {
        Self {
            key_column: key_column.into(),
            original: attributes.clone(),
            attributes,
        }
    }

    /// Sets an attribute, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets an attribute.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Current value of an attribute, or `None` if it was never set.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// All current attributes.
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Whether `name` differs from its original value.
    pub fn is_attribute_dirty(&self, name: &str) -> bool {
        self.attributes.get(name) != self.original.get(name)
    }

    /// Whether any attribute differs from its original value.
    pub fn is_dirty(&self) -> bool {
        self.attributes != self.original
    }

    /// Attributes that changed since the last snapshot, key column excluded.
    pub fn dirty_attributes(&self) -> Vec<(&str, &Value)> {
        self.attributes
            .iter()
            .filter(|(name, _)| *name != &self.key_column && self.is_attribute_dirty(name))
            .map(|(name, value)| (name.as_str(), value))
            .collect()
    }

    /// Marks the current attributes as persisted.
    pub fn sync_original(&mut self) {
        self.original = self.attributes.clone();
    }

    /// Replaces the snapshot with `stored`, keeping only this row's pending
    /// changes on top of it.
    ///
    /// Attributes that were clean here take their stored values, so a stale
    /// position or group is never written back.
    pub fn rebase(&mut self, stored: &Row) {
        let mut attributes = stored.attributes.clone();
        for (name, value) in &self.attributes {
            if self.is_attribute_dirty(name) {
                attributes.insert(name.clone(), value.clone());
            }
        }
        self.attributes = attributes;
        self.original = stored.attributes.clone();
    }
}

impl SortableRecord for Row {
    fn key_column(&self) -> &str {
        &self.key_column
    }

    fn attribute(&self, name: &str) -> Value {
        self.attributes.get(name).cloned().unwrap_or_default()
    }

    fn set_attribute(&mut self, name: &str, value: Value) {
        self.attributes.insert(name.to_string(), value);
    }

    fn original(&self, name: &str) -> Value {
        self.original.get(name).cloned().unwrap_or_default()
    }
}
