//! Error types for the rule engine.

use crate::types::ComparisonOperator;
use thiserror::Error;

/// Result type for rule engine operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Error returned by a failing action.
///
/// Actions may return any error type; it is carried to the caller untouched.
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building or firing rules.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The record has no field with this name.
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    /// The field exists but its kind does not support the operator.
    #[error("Unsupported field kind for '{field}': operator '{operator}' cannot be applied to {kind}")]
    UnsupportedOperator {
        field: String,
        operator: ComparisonOperator,
        kind: &'static str,
    },

    /// A numeric comparator was built with a NaN or infinite operand.
    #[error("Invalid operand for '{field}': {operand} is not a finite number")]
    InvalidOperand { field: String, operand: f64 },

    /// A regex pattern could not be compiled.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// An OR condition was asked for its description before a branch was chosen.
    #[error("No winning branch for OR condition '{0}': evaluate it first")]
    UnresolvedBranch(String),

    /// An explanation was requested from an evaluation that did not match.
    #[error("Condition did not match, no explanation available")]
    NoExplanation,

    /// A rule's condition could not be evaluated.
    #[error("Condition evaluation failed for rule '{rule}': {source}")]
    ConditionFailed {
        rule: String,
        #[source]
        source: Box<RuleError>,
    },

    /// A rule's action reported failure.
    #[error("Action '{action}' failed: {source}")]
    ActionFailed {
        action: String,
        #[source]
        source: ActionError,
    },

    /// Configuration could not be parsed.
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RuleError {
    /// Returns true if this error originates from a comparator lookup.
    pub fn is_field_error(&self) -> bool {
        matches!(
            self,
            RuleError::FieldNotFound(_)
                | RuleError::UnsupportedOperator { .. }
                | RuleError::InvalidOperand { .. }
        )
    }
}

impl From<serde_json::Error> for RuleError {
    fn from(err: serde_json::Error) -> Self {
        RuleError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for RuleError {
    fn from(err: serde_yaml::Error) -> Self {
        RuleError::ParseError(err.to_string())
    }
}

impl From<regex::Error> for RuleError {
    fn from(err: regex::Error) -> Self {
        RuleError::InvalidPattern(err.to_string())
    }
}
