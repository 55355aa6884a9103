use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::collation::Collator;
use crate::row::{Row, MISSING_SENTINEL};
use crate::value::FieldValue;

/// Ascending/descending order.
///
/// Callers pass the direction as a string token. Only `"asc"` (case-sensitive) means ascending;
/// every other token, including unknown ones, sorts descending. So does an absent token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub const ASCENDING_TOKEN: &'static str = "asc";
    pub const DESCENDING_TOKEN: &'static str = "desc";

    pub fn from_token(token: &str) -> Self {
        match token {
            Self::ASCENDING_TOKEN => SortDirection::Ascending,
            Self::DESCENDING_TOKEN => SortDirection::Descending,
            other => {
                log::warn!("unrecognized sort direction {other:?}; sorting descending");
                SortDirection::Descending
            }
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            SortDirection::Ascending => Self::ASCENDING_TOKEN,
            SortDirection::Descending => Self::DESCENDING_TOKEN,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl Serialize for SortDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_token())
    }
}

impl<'de> Deserialize<'de> for SortDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(SortDirection::from_token(&token))
    }
}

/// How the values stored under the sort key are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldShape {
    /// Plain numbers, booleans, or strings.
    Scalar,
    /// `{ value, ...metadata }` validation cells.
    Wrapped,
}

impl FieldShape {
    /// Guesses the shape from the first row that holds a real value under `key`.
    ///
    /// Rows lacking the key (or already holding the sentinel) are skipped. Returns `None` if no
    /// row holds a value.
    pub fn detect(rows: &[Row], key: &str) -> Option<Self> {
        rows.iter()
            .filter_map(|row| row.get(key))
            .find(|value| value.as_text() != Some(MISSING_SENTINEL))
            .map(|value| match value {
                FieldValue::Wrapped(_) => FieldShape::Wrapped,
                _ => FieldShape::Scalar,
            })
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldShape::Scalar => f.write_str("scalar"),
            FieldShape::Wrapped => f.write_str("wrapped"),
        }
    }
}

/// Shape selection in [`SortOptions`]; `Auto` defers to [`FieldShape::detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeSelection {
    #[default]
    Auto,
    Scalar,
    Wrapped,
}

impl ShapeSelection {
    pub fn resolve(self, rows: &[Row], key: &str) -> FieldShape {
        match self {
            ShapeSelection::Scalar => FieldShape::Scalar,
            ShapeSelection::Wrapped => FieldShape::Wrapped,
            ShapeSelection::Auto => FieldShape::detect(rows, key).unwrap_or(FieldShape::Scalar),
        }
    }
}

impl From<FieldShape> for ShapeSelection {
    fn from(shape: FieldShape) -> Self {
        match shape {
            FieldShape::Scalar => ShapeSelection::Scalar,
            FieldShape::Wrapped => ShapeSelection::Wrapped,
        }
    }
}

/// Decides whether a pair of scalar values takes part in ordering at all.
///
/// Pairs rejected by the guard compare as equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparabilityGuard {
    /// Compare only when both sides are truthy. `0`, `false`, `""` and `null` never move
    /// relative to their neighbours.
    #[default]
    Truthy,
    /// Compare every pair; falsy values opposite a number are read as `0`.
    Present,
}

impl ComparabilityGuard {
    pub fn both_comparable(self, a_truthy: bool, b_truthy: bool) -> bool {
        match self {
            ComparabilityGuard::Truthy => a_truthy && b_truthy,
            ComparabilityGuard::Present => true,
        }
    }
}

/// Everything needed to sort a column apart from the key itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SortOptions {
    pub direction: SortDirection,
    pub shape: ShapeSelection,
    pub guard: ComparabilityGuard,
    pub collation: Collator,
}
