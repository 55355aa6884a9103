use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single field of a table row.
///
/// Rows arrive as loosely-shaped JSON objects, so a field is either a plain scalar, a
/// "wrapped" value that carries validation metadata next to its displayable `value`, or
/// something that cannot be ordered at all (series, nested records).
#[derive(Clone, Debug, PartialEq, Default)]
pub enum FieldValue {
    /// Present but explicitly `null`. Distinct from an absent field.
    #[default]
    Null,
    Number(f64),
    Bool(bool),
    Text(String),
    /// Validation cell: `{ "value": <number|string>, ...metadata }`.
    Wrapped(WrappedValue),
    /// Arrays, e.g. a 14-day score history.
    List(Vec<FieldValue>),
    /// Objects without a scalar `value` member.
    Record(BTreeMap<String, FieldValue>),
}

/// Displayable payload of a wrapped field.
#[derive(Clone, Debug, PartialEq)]
pub enum WrappedScalar {
    Number(f64),
    Text(String),
}

/// A field shaped as `{ value, ...metadata }`.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedValue {
    pub value: WrappedScalar,
    /// Everything except `value` (e.g. `valid`, `message`).
    pub metadata: BTreeMap<String, FieldValue>,
}

impl WrappedValue {
    pub fn new(value: impl Into<WrappedScalar>) -> Self {
        Self {
            value: value.into(),
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl From<f64> for WrappedScalar {
    fn from(value: f64) -> Self {
        WrappedScalar::Number(value)
    }
}

impl From<i64> for WrappedScalar {
    fn from(value: i64) -> Self {
        WrappedScalar::Number(value as f64)
    }
}

impl From<i32> for WrappedScalar {
    fn from(value: i32) -> Self {
        WrappedScalar::Number(f64::from(value))
    }
}

impl From<&str> for WrappedScalar {
    fn from(value: &str) -> Self {
        WrappedScalar::Text(value.to_string())
    }
}

impl From<String> for WrappedScalar {
    fn from(value: String) -> Self {
        WrappedScalar::Text(value)
    }
}

impl FieldValue {
    /// Short human-readable name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Number(_) => "number",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Text(_) => "string",
            FieldValue::Wrapped(_) => "wrapped value",
            FieldValue::List(_) => "list",
            FieldValue::Record(_) => "record without a scalar `value`",
        }
    }

    /// JavaScript-style truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Bool(b) => *b,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Wrapped(_) | FieldValue::List(_) | FieldValue::Record(_) => true,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_wrapped(&self) -> Option<&WrappedValue> {
        match self {
            FieldValue::Wrapped(w) => Some(w),
            _ => None,
        }
    }

    /// Text used when a value is shown in a table cell (wrapped values show their payload).
    pub fn display_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Null => Cow::Borrowed("null"),
            FieldValue::Number(n) => Cow::Owned(number_to_text(*n)),
            FieldValue::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            FieldValue::Text(s) => Cow::Borrowed(s),
            FieldValue::Wrapped(w) => match &w.value {
                WrappedScalar::Number(n) => Cow::Owned(number_to_text(*n)),
                WrappedScalar::Text(s) => Cow::Borrowed(s),
            },
            FieldValue::List(items) => Cow::Owned(format!("[{} items]", items.len())),
            FieldValue::Record(_) => Cow::Borrowed("[record]"),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// Number-to-string conversion matching how browsers print numbers in table cells.
pub(crate) fn number_to_text(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        // Covers -0.0 as well.
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// Lenient string-to-number conversion: surrounding whitespace is ignored, an empty string is
/// zero, anything unparsable is NaN.
pub(crate) fn text_to_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // `f64::from_str` also accepts `inf`/`nan` spellings which should stay non-numeric here.
    let unsigned = trimmed.trim_start_matches(['+', '-']);
    if unsigned
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<WrappedValue> for FieldValue {
    fn from(value: WrappedValue) -> Self {
        FieldValue::Wrapped(value)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => FieldValue::Null,
            Json::Bool(b) => FieldValue::Bool(b),
            Json::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => FieldValue::Text(s),
            Json::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            Json::Object(mut map) => {
                let value = match map.get("value") {
                    Some(Json::Number(n)) => {
                        Some(WrappedScalar::Number(n.as_f64().unwrap_or(f64::NAN)))
                    }
                    Some(Json::String(s)) => Some(WrappedScalar::Text(s.clone())),
                    _ => None,
                };
                match value {
                    Some(value) => {
                        map.remove("value");
                        FieldValue::Wrapped(WrappedValue {
                            value,
                            metadata: map
                                .into_iter()
                                .map(|(k, v)| (k, FieldValue::from(v)))
                                .collect(),
                        })
                    }
                    None => FieldValue::Record(
                        map.into_iter()
                            .map(|(k, v)| (k, FieldValue::from(v)))
                            .collect(),
                    ),
                }
            }
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    // Keep integral values integral so `77` round-trips as `77` rather than `77.0`.
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

impl From<&FieldValue> for serde_json::Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Number(n) => number_to_json(*n),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Text(s) => serde_json::Value::String(s.clone()),
            FieldValue::Wrapped(w) => {
                let mut map: serde_json::Map<String, serde_json::Value> = w
                    .metadata
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect();
                let inner = match &w.value {
                    WrappedScalar::Number(n) => number_to_json(*n),
                    WrappedScalar::Text(s) => serde_json::Value::String(s.clone()),
                };
                map.insert("value".to_string(), inner);
                serde_json::Value::Object(map)
            }
            FieldValue::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            FieldValue::Record(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_json::Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(FieldValue::from)
    }
}
