use thiserror::Error;

use crate::options::FieldShape;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SortError {
    /// The field does not have the layout the caller asked to sort by (a wrapped cell in a
    /// scalar sort, or a plain scalar in a wrapped sort).
    #[error("row {row}: field `{key}` holds a {found}, expected a {expected} field")]
    InvalidFieldShape {
        row: usize,
        key: String,
        expected: FieldShape,
        found: &'static str,
    },
    /// The field holds something with no ordering at all (lists, records, nulls).
    #[error("row {row}: field `{key}` holds a {found}, which cannot be ordered")]
    UncomparableType {
        row: usize,
        key: String,
        found: &'static str,
    },
}

impl SortError {
    /// Index of the offending row in the collection passed to the sort.
    pub fn row(&self) -> usize {
        match self {
            SortError::InvalidFieldShape { row, .. } | SortError::UncomparableType { row, .. } => {
                *row
            }
        }
    }
}
