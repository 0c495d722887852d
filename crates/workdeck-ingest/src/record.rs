//! The host's record store, seen as an ordered collection of key/value rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the host's record store.
pub trait RawRecord {
    /// Stable identifier of the row.
    fn record_id(&self) -> &str;

    /// Raw stored value of a column (string, number or null).
    fn get_value(&self, column: &str) -> Option<&Value>;

    /// Display-formatted value of a column, e.g. the label of a choice column.
    fn get_formatted_value(&self, column: &str) -> Option<&str>;

    /// Raw value as non-empty text, if it is a string.
    fn text_value(&self, column: &str) -> Option<String> {
        match self.get_value(column) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

/// An ordered, keyed collection of records.
pub trait RecordSource {
    /// Record ids in display order.
    fn sorted_record_ids(&self) -> &[String];

    fn record(&self, id: &str) -> Option<&dyn RawRecord>;
}

/// In-memory record, as exported by the host or built in tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    #[serde(default)]
    pub values: HashMap<String, Value>,
    #[serde(default, rename = "formattedValues", alias = "formatted_values")]
    pub formatted_values: HashMap<String, String>,
}

impl MemoryRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.values.insert(column.to_string(), value.into());
        self
    }

    pub fn with_formatted(mut self, column: &str, value: &str) -> Self {
        self.formatted_values
            .insert(column.to_string(), value.to_string());
        self
    }
}

impl RawRecord for MemoryRecord {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn get_value(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    fn get_formatted_value(&self, column: &str) -> Option<&str> {
        self.formatted_values.get(column).map(String::as_str)
    }
}

/// In-memory [`RecordSource`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    sorted_record_ids: Vec<String>,
    records: HashMap<String, MemoryRecord>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set preserving the order of `records`.
    pub fn from_records(records: Vec<MemoryRecord>) -> Self {
        let mut set = Self::new();
        for record in records {
            set.push(record);
        }
        set
    }

    /// Parse a JSON array of records, as exported by the host.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let records: Vec<MemoryRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Append a record, replacing any previous record with the same id in place.
    pub fn push(&mut self, record: MemoryRecord) {
        if !self.records.contains_key(&record.id) {
            self.sorted_record_ids.push(record.id.clone());
        }
        self.records.insert(record.id.clone(), record);
    }

    pub fn remove(&mut self, id: &str) -> Option<MemoryRecord> {
        self.sorted_record_ids.retain(|existing| existing != id);
        self.records.remove(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut MemoryRecord> {
        self.records.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.sorted_record_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_record_ids.is_empty()
    }
}

impl RecordSource for RecordSet {
    fn sorted_record_ids(&self) -> &[String] {
        &self.sorted_record_ids
    }

    fn record(&self, id: &str) -> Option<&dyn RawRecord> {
        self.records.get(id).map(|r| r as &dyn RawRecord)
    }
}
