//! Schema flattening for heterogeneous record batches
//!
//! Records from different pages or files may carry different key sets. The
//! [`FieldUnion`] accumulates every field name observed and projects any
//! record onto that union so rows line up under one header.

use opptrack_common::record::{scalar_text, Opportunity};
use std::collections::BTreeSet;

/// The set of all field names seen across a set of records.
///
/// Iteration order is a stable lexical sort, so repeated projections of the
/// same union are byte-stable. Updating is commutative and idempotent.
///
/// Every record in a batch is sampled, not just the first: batches are
/// usually schema-homogeneous, but a field present only on a later record
/// must still make it into the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldUnion {
    names: BTreeSet<String>,
}

impl FieldUnion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a union from a single pass over the given records.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Opportunity>,
    {
        let mut union = Self::new();
        union.update(records);
        union
    }

    /// Union in the field names of every record in the batch.
    pub fn update<'a, I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = &'a Opportunity>,
    {
        for record in batch {
            for name in record.field_names() {
                if !self.names.contains(name) {
                    self.names.insert(name.to_string());
                }
            }
        }
    }

    /// Field names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Project a record onto the union: one value per field in sorted
    /// order, empty string where the record has no such field. Fields on
    /// the record but not in the union are dropped.
    pub fn project(&self, record: &Opportunity) -> Vec<String> {
        self.names
            .iter()
            .map(|name| record.get(name).map(scalar_text).unwrap_or_default())
            .collect()
    }
}
