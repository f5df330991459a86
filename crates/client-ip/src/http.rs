// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Header containers a request may carry.
//!
//! Servers hand us headers in one of two shapes: a native multi-value map (`http::HeaderMap`),
//! which already knows how to look up a header by name, or a plain record of names to values
//! (typically decoded from JSON), where values may be a string, a list of strings, or null.
//! Values of any other shape are accepted but never match.
//! Both shapes implement [`HeaderLookup`], and [`RequestHeaders`] picks one of them per request.

use http::HeaderMap;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Single-value retrieval of a header by name
pub trait HeaderLookup {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Repeated headers yield their first value; values are not comma-joined.
impl HeaderLookup for HeaderMap {
    fn lookup(&self, name: &str) -> Option<String> {
        // Values that aren't visible ASCII are treated as missing
        self.get(name)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}

/// A value in a [`HeaderRecord`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    Single(String),
    Multiple(Vec<String>),
    /// Any other shape (numbers, objects, mixed lists). Kept as is, but never yields a value.
    Other(serde_json::Value),
}

impl RecordValue {
    fn first(&self) -> Option<&str> {
        match self {
            RecordValue::Single(value) => Some(value),
            RecordValue::Multiple(values) => values.first().map(String::as_str),
            RecordValue::Other(_) => None,
        }
    }

    // An empty string counts as unset, but a list (even an empty one) does not
    fn is_set(&self) -> bool {
        match self {
            RecordValue::Single(value) => !value.is_empty(),
            RecordValue::Multiple(_) => true,
            RecordValue::Other(_) => false,
        }
    }
}

impl From<&str> for RecordValue {
    fn from(value: &str) -> Self {
        RecordValue::Single(value.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(value: String) -> Self {
        RecordValue::Single(value)
    }
}

impl From<Vec<String>> for RecordValue {
    fn from(values: Vec<String>) -> Self {
        RecordValue::Multiple(values)
    }
}

impl<const N: usize> From<[&str; N]> for RecordValue {
    fn from(values: [&str; N]) -> Self {
        RecordValue::Multiple(values.iter().map(|value| value.to_string()).collect())
    }
}

/// Plain name-to-value header record. Keys keep the casing they were inserted with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderRecord {
    entries: IndexMap<String, Option<RecordValue>>,
}

impl HeaderRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RecordValue>) {
        self.entries.insert(name.into(), Some(value.into()));
    }

    /// Record a header that is present by name but carries no value
    pub fn insert_unset(&mut self, name: impl Into<String>) {
        self.entries.insert(name.into(), None);
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<RecordValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get_set(&self, key: &str) -> Option<&RecordValue> {
        self.entries
            .get(key)
            .and_then(Option::as_ref)
            .filter(|value| value.is_set())
    }
}

impl HeaderLookup for HeaderRecord {
    /// Look up `name` as given, then lowercased, then by ASCII case-insensitive comparison.
    /// For list values, the first element wins.
    fn lookup(&self, name: &str) -> Option<String> {
        let value = self
            .get_set(name)
            .or_else(|| self.get_set(&name.to_lowercase()))
            .or_else(|| {
                self.entries
                    .iter()
                    .filter(|(key, _)| key.eq_ignore_ascii_case(name))
                    .find_map(|(_, value)| value.as_ref().filter(|value| value.is_set()))
            })?;

        value.first().map(str::to_string)
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderRecord
where
    K: Into<String>,
    V: Into<RecordValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = HeaderRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl From<&HeaderMap> for HeaderRecord {
    fn from(map: &HeaderMap) -> Self {
        map.keys()
            .map(|name| {
                let mut values: Vec<String> = map
                    .get_all(name)
                    .iter()
                    .filter_map(|value| value.to_str().ok())
                    .map(str::to_string)
                    .collect();

                let value = if values.len() == 1 {
                    RecordValue::Single(values.remove(0))
                } else {
                    RecordValue::Multiple(values)
                };

                (name.as_str().to_string(), value)
            })
            .collect()
    }
}

/// The headers of a request, in whichever shape the server provided them
#[derive(Debug, Clone)]
pub enum RequestHeaders {
    Map(HeaderMap),
    Record(HeaderRecord),
}

impl Default for RequestHeaders {
    fn default() -> Self {
        RequestHeaders::Record(HeaderRecord::default())
    }
}

impl HeaderLookup for RequestHeaders {
    fn lookup(&self, name: &str) -> Option<String> {
        match self {
            RequestHeaders::Map(map) => map.lookup(name),
            RequestHeaders::Record(record) => record.lookup(name),
        }
    }
}

impl From<HeaderMap> for RequestHeaders {
    fn from(map: HeaderMap) -> Self {
        RequestHeaders::Map(map)
    }
}

impl From<HeaderRecord> for RequestHeaders {
    fn from(record: HeaderRecord) -> Self {
        RequestHeaders::Record(record)
    }
}

// Serialized form is always a record; a map is flattened into one.
impl Serialize for RequestHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RequestHeaders::Map(map) => HeaderRecord::from(map).serialize(serializer),
            RequestHeaders::Record(record) => record.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RequestHeaders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        HeaderRecord::deserialize(deserializer).map(RequestHeaders::Record)
    }
}
