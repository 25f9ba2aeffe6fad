//! Field comparators.
//!
//! Builders that produce Simple conditions comparing a named record field
//! against an operand. Each condition carries its canonical description,
//! `"<field> <op> <value>"`, which is the atomic unit of the explanation
//! grammar. Numeric operands are rendered with two decimals.
//!
//! Lookups happen at evaluation time: a missing field fails with
//! [`RuleError::FieldNotFound`] and a field whose kind does not support the
//! operator fails with [`RuleError::UnsupportedOperator`]. A NaN or infinite
//! numeric operand fails with [`RuleError::InvalidOperand`].

use crate::condition::Condition;
use crate::error::{Result, RuleError};
use crate::record::{require_field, Record};
use crate::types::{ComparisonOperator, FieldValue};
use regex::Regex;

fn unsupported(field: &str, operator: ComparisonOperator, value: &FieldValue<'_>) -> RuleError {
    RuleError::UnsupportedOperator {
        field: field.to_string(),
        operator,
        kind: value.kind(),
    }
}

/// Compares a numeric field with the operator.
///
/// Integer fields are compared as integers against the operand truncated
/// toward zero; float fields are compared as floats.
fn number_matches(
    field: &str,
    value: &FieldValue<'_>,
    operand: f64,
    operator: ComparisonOperator,
) -> Result<bool> {
    if !operand.is_finite() {
        return Err(RuleError::InvalidOperand {
            field: field.to_string(),
            operand,
        });
    }

    let outcome = match value {
        FieldValue::Int(int) => operator.compare(*int, operand.trunc() as i64),
        FieldValue::Float(float) => operator.compare(*float, operand),
        _ => None,
    };
    outcome.ok_or_else(|| unsupported(field, operator, value))
}

fn compare_number<T>(field: String, operand: f64, operator: ComparisonOperator) -> Condition<T>
where
    T: Record + ?Sized,
{
    let description = format!("{} {} {:.2}", field, operator, operand);
    Condition::try_custom(
        move |data: &T| {
            let value = require_field(data, &field)?;
            number_matches(&field, &value, operand, operator)
        },
        description,
    )
}

fn compare_string<T>(field: String, operand: String, operator: ComparisonOperator) -> Condition<T>
where
    T: Record + ?Sized,
{
    let description = format!("{} {} {}", field, operator, operand);
    Condition::try_custom(
        move |data: &T| {
            let value = require_field(data, &field)?;
            let outcome = match (&value, operator) {
                (FieldValue::Str(s), ComparisonOperator::Equal | ComparisonOperator::NotEqual) => {
                    operator.compare(*s, operand.as_str())
                }
                (FieldValue::StrList(items), ComparisonOperator::Contains) => {
                    Some(items.contains(&operand.as_str()))
                }
                _ => None,
            };
            outcome.ok_or_else(|| unsupported(&field, operator, &value))
        },
        description,
    )
}

fn check_nil<T>(field: String, operator: ComparisonOperator) -> Condition<T>
where
    T: Record + ?Sized,
{
    let description = format!("{} {}", field, operator);
    let expect_nil = operator == ComparisonOperator::IsNil;
    Condition::try_custom(
        move |data: &T| Ok(require_field(data, &field)?.is_nil() == expect_nil),
        description,
    )
}

/// `field > value`
pub fn greater_than<T: Record + ?Sized>(field: impl Into<String>, value: f64) -> Condition<T> {
    compare_number(field.into(), value, ComparisonOperator::GreaterThan)
}

/// `field >= value`
pub fn greater_than_or_equal<T: Record + ?Sized>(field: impl Into<String>, value: f64) -> Condition<T> {
    compare_number(field.into(), value, ComparisonOperator::GreaterThanOrEqual)
}

/// `field < value`
pub fn less_than<T: Record + ?Sized>(field: impl Into<String>, value: f64) -> Condition<T> {
    compare_number(field.into(), value, ComparisonOperator::LessThan)
}

/// `field <= value`
pub fn less_than_or_equal<T: Record + ?Sized>(field: impl Into<String>, value: f64) -> Condition<T> {
    compare_number(field.into(), value, ComparisonOperator::LessThanOrEqual)
}

/// `field == value` for numeric fields.
pub fn equal_to<T: Record + ?Sized>(field: impl Into<String>, value: f64) -> Condition<T> {
    compare_number(field.into(), value, ComparisonOperator::Equal)
}

/// `field != value` for numeric fields.
pub fn not_equal_to<T: Record + ?Sized>(field: impl Into<String>, value: f64) -> Condition<T> {
    compare_number(field.into(), value, ComparisonOperator::NotEqual)
}

/// `field == value` for string fields.
pub fn equal_to_str<T: Record + ?Sized>(field: impl Into<String>, value: impl Into<String>) -> Condition<T> {
    compare_string(field.into(), value.into(), ComparisonOperator::Equal)
}

/// `field != value` for string fields.
pub fn not_equal_to_str<T: Record + ?Sized>(
    field: impl Into<String>,
    value: impl Into<String>,
) -> Condition<T> {
    compare_string(field.into(), value.into(), ComparisonOperator::NotEqual)
}

/// Matches when a string-list field contains `value`.
pub fn list_contains<T: Record + ?Sized>(field: impl Into<String>, value: impl Into<String>) -> Condition<T> {
    compare_string(field.into(), value.into(), ComparisonOperator::Contains)
}

pub fn is_nil<T: Record + ?Sized>(field: impl Into<String>) -> Condition<T> {
    check_nil(field.into(), ComparisonOperator::IsNil)
}

pub fn is_not_nil<T: Record + ?Sized>(field: impl Into<String>) -> Condition<T> {
    check_nil(field.into(), ComparisonOperator::IsNotNil)
}

/// Matches a string field against a regex.
///
/// The pattern is compiled here, so an invalid pattern is rejected before any
/// evaluation.
pub fn matches_regex<T: Record + ?Sized>(field: impl Into<String>, pattern: &str) -> Result<Condition<T>> {
    let field = field.into();
    let regex = Regex::new(pattern)?;
    let description = format!("{} {} {}", field, ComparisonOperator::Matches, pattern);

    Ok(Condition::try_custom(
        move |data: &T| match require_field(data, &field)? {
            FieldValue::Str(s) => Ok(regex.is_match(s)),
            other => Err(unsupported(&field, ComparisonOperator::Matches, &other)),
        },
        description,
    ))
}
