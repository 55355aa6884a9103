use std::borrow::Cow;
use std::cmp::Ordering;

use crate::collation::Collator;
use crate::error::SortError;
use crate::options::{ComparabilityGuard, FieldShape, SortDirection, SortOptions};
use crate::order::{apply_permutation, merge_sort_indices};
use crate::row::{normalize_missing, Row, MISSING_SENTINEL};
use crate::value::{number_to_text, text_to_number, FieldValue, WrappedScalar};

/// The comparable part of a field, resolved once per row before any comparison runs.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SortCell<'a> {
    Null,
    Number(f64),
    Bool(bool),
    Text(&'a str),
}

impl<'a> SortCell<'a> {
    fn is_truthy(self) -> bool {
        match self {
            SortCell::Null => false,
            SortCell::Number(n) => n != 0.0 && !n.is_nan(),
            SortCell::Bool(b) => b,
            SortCell::Text(s) => !s.is_empty(),
        }
    }

    fn to_number(self) -> f64 {
        match self {
            SortCell::Null => 0.0,
            SortCell::Number(n) => n,
            SortCell::Bool(b) => f64::from(u8::from(b)),
            SortCell::Text(s) => text_to_number(s),
        }
    }

    fn to_text(self) -> Cow<'a, str> {
        match self {
            SortCell::Null => Cow::Borrowed("null"),
            SortCell::Number(n) => Cow::Owned(number_to_text(n)),
            SortCell::Bool(true) => Cow::Borrowed("true"),
            SortCell::Bool(false) => Cow::Borrowed("false"),
            SortCell::Text(s) => Cow::Borrowed(s),
        }
    }
}

/// Signed-difference ordering; a NaN difference (e.g. a number against `"N/A"`) is a tie.
fn numeric_order(a: f64, b: f64) -> Ordering {
    let diff = a - b;
    if diff > 0.0 {
        Ordering::Greater
    } else if diff < 0.0 {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

/// Orders table rows by a single column.
///
/// The comparator is column-agnostic: it is configured with the field key, the layout of that
/// field ([`FieldShape`]), and a [`SortDirection`]. Scalar columns compare numbers and booleans
/// by signed difference and everything else with a locale-aware [`Collator`]; wrapped columns do
/// the same on the inner `value`.
///
/// Rows lacking the key are read as [`MISSING_SENTINEL`] and, when sorted in place, have the
/// sentinel written into them.
#[derive(Debug, Clone, PartialEq)]
pub struct RowComparator {
    key: String,
    shape: FieldShape,
    direction: SortDirection,
    guard: ComparabilityGuard,
    collator: Collator,
}

impl RowComparator {
    pub fn new(key: impl Into<String>, shape: FieldShape, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            shape,
            direction,
            guard: ComparabilityGuard::default(),
            collator: Collator::default(),
        }
    }

    pub fn scalar(key: impl Into<String>, direction: SortDirection) -> Self {
        Self::new(key, FieldShape::Scalar, direction)
    }

    pub fn wrapped(key: impl Into<String>, direction: SortDirection) -> Self {
        Self::new(key, FieldShape::Wrapped, direction)
    }

    /// Builds a comparator from [`SortOptions`], detecting the field shape from `rows` when the
    /// options leave it on `auto`.
    pub fn from_options(key: impl Into<String>, rows: &[Row], options: &SortOptions) -> Self {
        let key = key.into();
        let shape = options.shape.resolve(rows, &key);
        Self::new(key, shape, options.direction)
            .with_guard(options.guard)
            .with_collator(options.collation)
    }

    #[must_use]
    pub fn with_guard(mut self, guard: ComparabilityGuard) -> Self {
        self.guard = guard;
        self
    }

    #[must_use]
    pub fn with_collator(mut self, collator: Collator) -> Self {
        self.collator = collator;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn shape(&self) -> FieldShape {
        self.shape
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn guard(&self) -> ComparabilityGuard {
        self.guard
    }

    /// Compares two rows without modifying them.
    ///
    /// Errors report `a` as row 0 and `b` as row 1.
    pub fn compare(&self, a: &Row, b: &Row) -> Result<Ordering, SortError> {
        let left = self.resolve(0, a)?;
        let right = self.resolve(1, b)?;
        self.compare_cells(left, 0, right, 1)
    }

    /// Returns the sorted order as original row indices, leaving `rows` untouched.
    pub fn sorted_indices(&self, rows: &[Row]) -> Result<Vec<usize>, SortError> {
        let cells = rows
            .iter()
            .enumerate()
            .map(|(index, row)| self.resolve(index, row))
            .collect::<Result<Vec<_>, _>>()?;

        merge_sort_indices(cells.len(), |a, b| {
            self.compare_cells(cells[a], a, cells[b], b)
        })
    }

    /// Sorts `rows` in place and fills rows lacking the key with [`MISSING_SENTINEL`].
    ///
    /// Either the whole collection is sorted or, on error, nothing is changed.
    pub fn sort<'r>(&self, rows: &'r mut [Row]) -> Result<&'r mut [Row], SortError> {
        log::debug!(
            "sorting {} row(s) by `{}` ({} field, {})",
            rows.len(),
            self.key,
            self.shape,
            self.direction
        );

        let order = self.sorted_indices(rows)?;
        normalize_missing(rows, &self.key);
        apply_permutation(rows, &order);
        Ok(rows)
    }

    fn resolve<'a>(&self, index: usize, row: &'a Row) -> Result<SortCell<'a>, SortError> {
        let Some(value) = row.get(&self.key) else {
            return Ok(SortCell::Text(MISSING_SENTINEL));
        };

        match (self.shape, value) {
            (_, FieldValue::List(_) | FieldValue::Record(_)) => {
                Err(self.uncomparable(index, value))
            }

            (FieldShape::Scalar, FieldValue::Null) => Ok(SortCell::Null),
            (FieldShape::Scalar, FieldValue::Number(n)) => Ok(SortCell::Number(*n)),
            (FieldShape::Scalar, FieldValue::Bool(b)) => Ok(SortCell::Bool(*b)),
            (FieldShape::Scalar, FieldValue::Text(s)) => Ok(SortCell::Text(s)),
            (FieldShape::Scalar, FieldValue::Wrapped(_)) => Err(self.wrong_shape(index, value)),

            (FieldShape::Wrapped, FieldValue::Wrapped(w)) => Ok(match &w.value {
                WrappedScalar::Number(n) => SortCell::Number(*n),
                WrappedScalar::Text(s) => SortCell::Text(s),
            }),
            // A row normalized by an earlier sort holds the bare sentinel.
            (FieldShape::Wrapped, FieldValue::Text(s)) if s == MISSING_SENTINEL => {
                Ok(SortCell::Text(MISSING_SENTINEL))
            }
            (FieldShape::Wrapped, FieldValue::Null) => Err(self.uncomparable(index, value)),
            (
                FieldShape::Wrapped,
                FieldValue::Number(_) | FieldValue::Bool(_) | FieldValue::Text(_),
            ) => Err(self.wrong_shape(index, value)),
        }
    }

    fn compare_cells(
        &self,
        a: SortCell<'_>,
        a_index: usize,
        b: SortCell<'_>,
        b_index: usize,
    ) -> Result<Ordering, SortError> {
        let ordering = match self.shape {
            FieldShape::Scalar => {
                if !self.guard.both_comparable(a.is_truthy(), b.is_truthy()) {
                    return Ok(Ordering::Equal);
                }
                // Lets a numeric column holding `0` compare against falsy counterparts.
                let (a, b) = match (a, b) {
                    (SortCell::Number(_), other) if !other.is_truthy() => {
                        (a, SortCell::Number(0.0))
                    }
                    (other, SortCell::Number(_)) if !other.is_truthy() => {
                        (SortCell::Number(0.0), b)
                    }
                    _ => (a, b),
                };
                self.dispatch(a, a_index, b, b_index)?
            }
            FieldShape::Wrapped => self.dispatch(a, a_index, b, b_index)?,
        };

        Ok(match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        })
    }

    /// Picks numeric or string comparison from the left-hand value's type.
    ///
    /// A null on either side of a string comparison is an error.
    fn dispatch(
        &self,
        a: SortCell<'_>,
        a_index: usize,
        b: SortCell<'_>,
        b_index: usize,
    ) -> Result<Ordering, SortError> {
        match (a, b) {
            (SortCell::Number(_) | SortCell::Bool(_), _) => {
                Ok(numeric_order(a.to_number(), b.to_number()))
            }
            (SortCell::Null, _) => Err(self.uncomparable(a_index, &FieldValue::Null)),
            (SortCell::Text(_), SortCell::Null) => {
                Err(self.uncomparable(b_index, &FieldValue::Null))
            }
            (SortCell::Text(text), _) => Ok(self.collator.compare(text, &b.to_text())),
        }
    }

    fn wrong_shape(&self, index: usize, value: &FieldValue) -> SortError {
        SortError::InvalidFieldShape {
            row: index,
            key: self.key.clone(),
            expected: self.shape,
            found: value.kind(),
        }
    }

    fn uncomparable(&self, index: usize, value: &FieldValue) -> SortError {
        SortError::UncomparableType {
            row: index,
            key: self.key.clone(),
            found: value.kind(),
        }
    }
}

/// Sorts rows by a plain number/boolean/string column.
pub fn sort_scalar<'r>(
    rows: &'r mut [Row],
    key: &str,
    direction: SortDirection,
) -> Result<&'r mut [Row], SortError> {
    RowComparator::scalar(key, direction).sort(rows)
}

/// Sorts rows by a `{ value, ...metadata }` validation column.
pub fn sort_wrapped<'r>(
    rows: &'r mut [Row],
    key: &str,
    direction: SortDirection,
) -> Result<&'r mut [Row], SortError> {
    RowComparator::wrapped(key, direction).sort(rows)
}

/// Sorts rows according to `options`, detecting the field shape if needed.
pub fn sort_rows<'r>(
    rows: &'r mut [Row],
    key: &str,
    options: &SortOptions,
) -> Result<&'r mut [Row], SortError> {
    RowComparator::from_options(key, rows, options).sort(rows)
}
