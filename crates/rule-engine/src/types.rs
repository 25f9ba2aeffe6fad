//! Core types for the rule engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The mutable key/value output of a firing pass.
///
/// Seeded by the caller's initializer and mutated only by actions.
pub type Results = HashMap<String, serde_json::Value>;

/// Comparison operator used by field comparators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Equal,
    NotEqual,
    Contains,
    Matches,
    IsNil,
    IsNotNil,
}

impl ComparisonOperator {
    /// The symbol rendered in condition descriptions.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::Contains => "in",
            ComparisonOperator::Matches => "=~",
            ComparisonOperator::IsNil => "== nil",
            ComparisonOperator::IsNotNil => "!= nil",
        }
    }

    /// Applies an ordering operator to two values of the same kind.
    ///
    /// Returns `None` for operators that are not orderings.
    pub fn compare<V: PartialOrd>(&self, left: V, right: V) -> Option<bool> {
        match self {
            ComparisonOperator::GreaterThan => Some(left > right),
            ComparisonOperator::LessThan => Some(left < right),
            ComparisonOperator::GreaterThanOrEqual => Some(left >= right),
            ComparisonOperator::LessThanOrEqual => Some(left <= right),
            ComparisonOperator::Equal => Some(left == right),
            ComparisonOperator::NotEqual => Some(left != right),
            _ => None,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field value read from a record, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
    StrList(Vec<&'a str>),
    /// A value of a kind no comparator understands (nested object, mixed list).
    Other(&'static str),
}

impl<'a> FieldValue<'a> {
    /// Human-readable kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Nil => "nil",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Str(_) => "string",
            FieldValue::StrList(_) => "string list",
            FieldValue::Other(kind) => kind,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, FieldValue::Nil)
    }
}

macro_rules! int_field_value {
    ($($ty:ty),*) => {
        $(
            impl<'a> From<&'a $ty> for FieldValue<'a> {
                fn from(value: &'a $ty) -> Self {
                    FieldValue::Int(i64::from(*value))
                }
            }
        )*
    };
}

int_field_value!(i8, i16, i32, i64, u8, u16, u32);

impl<'a> From<&'a u64> for FieldValue<'a> {
    fn from(value: &'a u64) -> Self {
        i64::try_from(*value)
            .map(FieldValue::Int)
            .unwrap_or(FieldValue::Float(*value as f64))
    }
}

impl<'a> From<&'a usize> for FieldValue<'a> {
    fn from(value: &'a usize) -> Self {
        i64::try_from(*value)
            .map(FieldValue::Int)
            .unwrap_or(FieldValue::Float(*value as f64))
    }
}

impl<'a> From<&'a f32> for FieldValue<'a> {
    fn from(value: &'a f32) -> Self {
        FieldValue::Float(f64::from(*value))
    }
}

impl<'a> From<&'a f64> for FieldValue<'a> {
    fn from(value: &'a f64) -> Self {
        FieldValue::Float(*value)
    }
}

impl<'a> From<&'a bool> for FieldValue<'a> {
    fn from(value: &'a bool) -> Self {
        FieldValue::Bool(*value)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        FieldValue::Str(value.as_str())
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Str(value)
    }
}

impl<'a> From<&'a Vec<String>> for FieldValue<'a> {
    fn from(value: &'a Vec<String>) -> Self {
        FieldValue::StrList(value.iter().map(String::as_str).collect())
    }
}

impl<'a> From<&'a [String]> for FieldValue<'a> {
    fn from(value: &'a [String]) -> Self {
        FieldValue::StrList(value.iter().map(String::as_str).collect())
    }
}

macro_rules! optional_field_value {
    ($($ty:ty),*) => {
        $(
            impl<'a> From<&'a Option<$ty>> for FieldValue<'a> {
                fn from(value: &'a Option<$ty>) -> Self {
                    value.as_ref().map_or(FieldValue::Nil, FieldValue::from)
                }
            }
        )*
    };
}

optional_field_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64, bool, String, Vec<String>);

impl<'a> FieldValue<'a> {
    /// Converts a JSON value: `null` is nil, a list of strings is a string
    /// list, objects and mixed lists are [`FieldValue::Other`].
    pub fn from_json(value: &'a serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => FieldValue::Nil,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => n
                    .as_f64()
                    .map(FieldValue::Float)
                    .unwrap_or(FieldValue::Other("number")),
            },
            Value::String(s) => FieldValue::Str(s.as_str()),
            Value::Array(items) => items
                .iter()
                .map(Value::as_str)
                .collect::<Option<Vec<_>>>()
                .map(FieldValue::StrList)
                .unwrap_or(FieldValue::Other("array")),
            Value::Object(_) => FieldValue::Other("object"),
        }
    }
}

impl<'a> From<&'a serde_json::Value> for FieldValue<'a> {
    fn from(value: &'a serde_json::Value) -> Self {
        FieldValue::from_json(value)
    }
}
