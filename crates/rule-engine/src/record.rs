//! Field access on input records.
//!
//! Comparators locate fields by name through the [`Record`] trait. Map-like
//! records (JSON objects, string-keyed maps) are supported out of the box;
//! struct-like records implement the trait with a `match` on the field name:
//!
//! ```
//! use rule_engine::{FieldValue, Record};
//!
//! struct Applicant {
//!     income: f64,
//!     employer: Option<String>,
//! }
//!
//! impl Record for Applicant {
//!     fn field(&self, name: &str) -> Option<FieldValue<'_>> {
//!         match name {
//!             "Income" => Some((&self.income).into()),
//!             "Employer" => Some((&self.employer).into()),
//!             _ => None,
//!         }
//!     }
//! }
//! ```

use crate::error::{Result, RuleError};
use crate::types::FieldValue;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::hash::BuildHasher;

/// A record whose fields can be looked up by name.
pub trait Record {
    /// Returns the named field, or `None` if the record has no such field.
    ///
    /// A field that exists but holds no value must be reported as
    /// `Some(FieldValue::Nil)`, not `None`.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

/// Looks up a field, turning a missing field into [`RuleError::FieldNotFound`].
pub fn require_field<'r, R: Record + ?Sized>(record: &'r R, name: &str) -> Result<FieldValue<'r>> {
    record
        .field(name)
        .ok_or_else(|| RuleError::FieldNotFound(name.to_string()))
}

/// Resolves a field on a string-keyed map of JSON values.
///
/// An exact key match wins; otherwise the name is treated as a dot-separated
/// path into nested objects (`"employment.company"`).
fn json_lookup<'v, F>(name: &str, get: F) -> Option<&'v Value>
where
    F: Fn(&str) -> Option<&'v Value>,
{
    if let Some(value) = get(name) {
        return Some(value);
    }

    let (head, rest) = name.split_once('.')?;
    let mut current = get(head)?;
    for part in rest.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

impl Record for Value {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let map = self.as_object()?;
        json_lookup(name, |key| map.get(key)).map(FieldValue::from_json)
    }
}

impl Record for Map<String, Value> {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        json_lookup(name, |key| self.get(key)).map(FieldValue::from_json)
    }
}

impl<S: BuildHasher> Record for HashMap<String, Value, S> {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        json_lookup(name, |key| self.get(key)).map(FieldValue::from_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_record_fields() {
        let record = json!({
            "Money": 500000,
            "Employment": null,
            "Friends": ["Saul", "Mike", "Walter"],
        });

        assert_eq!(record.field("Money"), Some(FieldValue::Int(500000)));
        assert_eq!(record.field("Employment"), Some(FieldValue::Nil));
        assert_eq!(
            record.field("Friends"),
            Some(FieldValue::StrList(vec!["Saul", "Mike", "Walter"]))
        );
        assert_eq!(record.field("Age"), None);
    }

    #[test]
    fn test_json_record_dot_path() {
        let record = json!({
            "employment": {"company": "Madrigal", "years": 4},
            "a.b": "literal",
        });

        assert_eq!(record.field("employment.company"), Some(FieldValue::Str("Madrigal")));
        assert_eq!(record.field("employment.years"), Some(FieldValue::Int(4)));
        assert_eq!(record.field("a.b"), Some(FieldValue::Str("literal")));
        assert_eq!(record.field("employment.salary"), None);
    }

    #[test]
    fn test_non_object_json_has_no_fields() {
        assert_eq!(json!([1, 2]).field("0"), None);
    }

    #[test]
    fn test_hash_map_record() {
        let mut record = HashMap::new();
        record.insert("PlanType".to_string(), json!("Basic"));

        assert_eq!(record.field("PlanType"), Some(FieldValue::Str("Basic")));
        assert!(matches!(
            require_field(&record, "OrderCount"),
            Err(RuleError::FieldNotFound(name)) if name == "OrderCount"
        ));
    }

    #[test]
    fn test_map_records_resolve_dot_paths_alike() {
        let nested = json!({"employment": {"company": null}});

        let mut hash_map = HashMap::new();
        hash_map.insert("employment".to_string(), nested["employment"].clone());
        let map = nested.as_object().cloned().unwrap();

        assert_eq!(nested.field("employment.company"), Some(FieldValue::Nil));
        assert_eq!(map.field("employment.company"), Some(FieldValue::Nil));
        assert_eq!(hash_map.field("employment.company"), Some(FieldValue::Nil));
        assert_eq!(hash_map.field("employment.title"), None);
    }
}
