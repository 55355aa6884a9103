//! Column-agnostic row ordering for tabular metrics.
//!
//! The rendering layer hands over a collection of rows, the field to order by, and a direction
//! token. Two field layouts are supported:
//! - plain scalars (numbers, booleans, strings), see [`sort_scalar`];
//! - wrapped validation cells `{ value, ...metadata }`, see [`sort_wrapped`].
//!
//! Rows lacking the sort key are filled with [`MISSING_SENTINEL`] as part of an in-place sort.
//! [`RowComparator::sorted_indices`] and [`normalize_missing`] split that into a read-only
//! ordering pass and an explicit normalization pass.

pub mod cli;
pub mod collation;
mod comparator;
mod error;
mod options;
mod order;
mod row;
mod value;

pub use crate::collation::{CaseFirst, Collator};
pub use crate::comparator::{sort_rows, sort_scalar, sort_wrapped, RowComparator};
pub use crate::error::SortError;
pub use crate::options::{
    ComparabilityGuard, FieldShape, ShapeSelection, SortDirection, SortOptions,
};
pub use crate::row::{normalize_missing, Row, MISSING_SENTINEL};
pub use crate::value::{FieldValue, WrappedScalar, WrappedValue};
