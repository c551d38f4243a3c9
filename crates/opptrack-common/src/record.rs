//! The opportunity record type
//!
//! Opportunity records arrive from the remote search API with no fixed
//! schema: different pages may carry different key sets, and values may be
//! strings, numbers, booleans, nulls, or nested lists/mappings. The record
//! is therefore an open mapping over JSON values. The fixed-schema
//! persistence path uses the typed accessors and scalar coercion defined
//! here; the dynamic-schema path (CSV, field unions) treats the record as a
//! plain key set.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One procurement notice from the remote source.
///
/// Wraps a JSON object keyed by field name. Identity is by value: two
/// records with equal field sets and values compare equal, which the
/// organization search relies on for deduplication.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Opportunity {
    fields: Map<String, Value>,
}

impl Opportunity {
    /// Build a record from string key/value pairs, e.g. one CSV row zipped
    /// with its header.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        Self { fields }
    }

    /// Raw field lookup.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field value as `&str`, when the field exists and is a JSON string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Field value coerced to text; empty string when absent or null.
    pub fn text_field(&self, name: &str) -> String {
        self.fields.get(name).map(scalar_text).unwrap_or_default()
    }

    /// Field names, in the map's stable (sorted) order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// The natural (not strictly unique) key of an opportunity.
    pub fn solicitation_number(&self) -> Option<&str> {
        self.str_field("solicitationNumber")
    }

    /// The closer-to-unique key, when the source provides one.
    pub fn notice_id(&self) -> Option<&str> {
        self.str_field("noticeId")
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    /// Insert or replace a field.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }
}

impl From<Map<String, Value>> for Opportunity {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Coerce a JSON value to its textual form for scalar-only storage.
///
/// Strings pass through unquoted; booleans and numbers use their canonical
/// text; nested lists and mappings render as compact JSON so the value is
/// never lost, only flattened. Null renders empty.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Coerce an optional field for a nullable column: absent and null both
/// store as NULL, everything else as its textual form.
pub fn scalar_opt(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(v) => Some(scalar_text(v)),
    }
}
