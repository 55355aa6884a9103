use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// Placeholder written into rows that lack the sort key.
pub const MISSING_SENTINEL: &str = "N/A";

/// One record of tabular data, keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, FieldValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful for tests and fixtures.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }

    /// Writes [`MISSING_SENTINEL`] under `key` if the row has no such field.
    ///
    /// Returns `true` if the row was modified.
    pub fn fill_missing(&mut self, key: &str) -> bool {
        if self.fields.contains_key(key) {
            return false;
        }
        self.fields
            .insert(key.to_string(), FieldValue::Text(MISSING_SENTINEL.to_string()));
        true
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Fills every row that lacks `key` with [`MISSING_SENTINEL`].
///
/// This is the normalization a sort applies as a side effect, exposed separately for callers
/// that order rows through [`crate::RowComparator::sorted_indices`]. Returns the number of rows
/// that were filled.
pub fn normalize_missing(rows: &mut [Row], key: &str) -> usize {
    let filled = rows
        .iter_mut()
        .map(|row| row.fill_missing(key))
        .filter(|filled| *filled)
        .count();
    if filled > 0 {
        log::debug!("filled {filled} row(s) missing `{key}` with {MISSING_SENTINEL:?}");
    }
    filled
}
