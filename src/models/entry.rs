//! Entry and Store data models
//!
//! A `Store` is the whole key-value mapping as it lives in the state file.
//! Each key maps to an `Entry` carrying the value plus optional metadata.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A single stored binding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    /// Stored payload
    pub value: String,

    /// Time of the last write (written as RFC 3339 UTC, `null` when unknown)
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created: Option<DateTime<Utc>>,

    /// Free-text annotation
    #[serde(default)]
    pub comment: Option<String>,
}

impl Entry {
    /// Create an entry stamped with the current time
    pub fn new(value: impl Into<String>) -> Self {
        Self::with_timestamp(value, Utc::now())
    }

    /// Create an entry with a specific timestamp
    pub fn with_timestamp(value: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            created: Some(created),
            comment: None,
        }
    }
}

/// Parse an ISO 8601 timestamp
///
/// Timestamps without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_timestamp(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

/// The full key to entry mapping, the unit of load and persist
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Store {
    pub mapping: BTreeMap<String, Entry>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `key`
    ///
    /// Returns the previous entry if the key was already bound.
    pub fn upsert(&mut self, key: impl Into<String>, entry: Entry) -> Option<Entry> {
        self.mapping.insert(key.into(), entry)
    }

    /// Bind `key` to `value`, refreshing the timestamp and dropping any comment
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<Entry> {
        self.upsert(key, Entry::new(value))
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.mapping.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.mapping.remove(key)
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.mapping.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.mapping.contains_key(key)
    }

    /// Keys in iteration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.mapping.keys().map(String::as_str)
    }

    /// Entries in iteration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.mapping.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}
