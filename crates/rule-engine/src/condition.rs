//! Composable condition trees.
//!
//! A condition is a closed tree of [`Condition::Simple`] leaves combined with
//! [`Condition::And`] and [`Condition::Or`] nodes. Evaluation short-circuits and
//! returns an [`Evaluation`] carrying the explanation of the match:
//!
//! - a Simple leaf explains itself with its description;
//! - an And node explains itself as `[AND: e1; e2; ...]` over all children,
//!   since every child matched;
//! - an Or node explains itself with the explanation of the leftmost child
//!   that matched.
//!
//! Evaluation state lives in the returned value, never on the tree, so one tree
//! can be evaluated from many threads at once.

use crate::config::ErrorPolicy;
use crate::error::{Result, RuleError};
use std::fmt;
use tracing::warn;

type Predicate<T> = Box<dyn Fn(&T) -> Result<bool> + Send + Sync>;

/// A leaf condition wrapping one predicate.
pub struct SimpleCondition<T: ?Sized> {
    predicate: Predicate<T>,
    description: String,
}

impl<T: ?Sized> SimpleCondition<T> {
    /// Creates a leaf from a fallible predicate.
    pub fn new<F>(predicate: F, description: impl Into<String>) -> Self
    where
        F: Fn(&T) -> Result<bool> + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            description: description.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Runs the predicate.
    pub fn test(&self, data: &T) -> Result<bool> {
        (self.predicate)(data)
    }
}

impl<T: ?Sized> fmt::Debug for SimpleCondition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleCondition")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A boolean condition over records of type `T`.
pub enum Condition<T: ?Sized> {
    Simple(SimpleCondition<T>),
    And(Vec<Condition<T>>),
    Or(Vec<Condition<T>>),
}

impl<T: ?Sized> fmt::Debug for Condition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Simple(simple) => fmt::Debug::fmt(simple, f),
            Condition::And(children) => f.debug_tuple("And").field(children).finish(),
            Condition::Or(children) => f.debug_tuple("Or").field(children).finish(),
        }
    }
}

/// The outcome of evaluating a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    explanation: Option<String>,
    branch: Option<usize>,
}

impl Evaluation {
    fn matched(explanation: String) -> Self {
        Self {
            explanation: Some(explanation),
            branch: None,
        }
    }

    fn unmatched() -> Self {
        Self {
            explanation: None,
            branch: None,
        }
    }

    /// Returns true if the condition matched.
    pub fn is_match(&self) -> bool {
        self.explanation.is_some()
    }

    /// Why the condition matched, in the bracket grammar.
    pub fn explanation(&self) -> Result<&str> {
        self.explanation.as_deref().ok_or(RuleError::NoExplanation)
    }

    pub fn into_explanation(self) -> Result<String> {
        self.explanation.ok_or(RuleError::NoExplanation)
    }

    /// Index of the winning child when an Or node matched.
    pub fn branch(&self) -> Option<usize> {
        self.branch
    }
}

fn and_description(parts: &[String]) -> String {
    format!("[AND: {}]", parts.join("; "))
}

impl<T: ?Sized> Condition<T> {
    /// Wraps a precomputed boolean.
    pub fn is(condition: bool, description: impl Into<String>) -> Self {
        Condition::Simple(SimpleCondition::new(move |_: &T| Ok(condition), description))
    }

    /// Wraps the negation of a precomputed boolean.
    pub fn not(condition: bool, description: impl Into<String>) -> Self {
        Condition::Simple(SimpleCondition::new(move |_: &T| Ok(!condition), description))
    }

    /// Wraps an arbitrary predicate over the record.
    pub fn custom<F>(predicate: F, description: impl Into<String>) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Condition::Simple(SimpleCondition::new(move |data: &T| Ok(predicate(data)), description))
    }

    /// Wraps a predicate that can fail.
    pub fn try_custom<F>(predicate: F, description: impl Into<String>) -> Self
    where
        F: Fn(&T) -> Result<bool> + Send + Sync + 'static,
    {
        Condition::Simple(SimpleCondition::new(predicate, description))
    }

    /// Matches when every child matches.
    pub fn all_of(conditions: Vec<Condition<T>>) -> Self {
        Condition::And(conditions)
    }

    /// Matches when any child matches.
    pub fn any_of(conditions: Vec<Condition<T>>) -> Self {
        Condition::Or(conditions)
    }

    /// Evaluates the condition, propagating predicate errors.
    pub fn evaluate(&self, data: &T) -> Result<Evaluation> {
        self.evaluate_with(data, ErrorPolicy::Fail)
    }

    /// Evaluates the condition, handling predicate errors per `policy`.
    ///
    /// With [`ErrorPolicy::NoMatch`] a failing leaf counts as not matching, so
    /// a sibling Or branch may still match.
    pub fn evaluate_with(&self, data: &T, policy: ErrorPolicy) -> Result<Evaluation> {
        match self {
            Condition::Simple(simple) => {
                let matched = match simple.test(data) {
                    Ok(matched) => matched,
                    Err(err) if policy == ErrorPolicy::NoMatch => {
                        warn!(
                            condition = %simple.description,
                            error = %err,
                            "Condition error treated as no match"
                        );
                        false
                    }
                    Err(err) => return Err(err),
                };

                if matched {
                    Ok(Evaluation::matched(simple.description.clone()))
                } else {
                    Ok(Evaluation::unmatched())
                }
            }

            Condition::And(children) => {
                let mut explanations = Vec::with_capacity(children.len());
                for child in children {
                    match child.evaluate_with(data, policy)?.explanation {
                        Some(explanation) => explanations.push(explanation),
                        None => return Ok(Evaluation::unmatched()),
                    }
                }
                Ok(Evaluation::matched(and_description(&explanations)))
            }

            Condition::Or(children) => {
                for (index, child) in children.iter().enumerate() {
                    if let Some(explanation) = child.evaluate_with(data, policy)?.explanation {
                        return Ok(Evaluation {
                            explanation: Some(explanation),
                            branch: Some(index),
                        });
                    }
                }
                Ok(Evaluation::unmatched())
            }
        }
    }

    /// The description of this condition without evaluating it.
    ///
    /// Or nodes only have a description once a branch has won, so any tree
    /// containing one fails with [`RuleError::UnresolvedBranch`]; use
    /// [`Evaluation::explanation`] instead.
    pub fn description(&self) -> Result<String> {
        match self {
            Condition::Simple(simple) => Ok(simple.description.clone()),
            Condition::And(children) => {
                let parts = children
                    .iter()
                    .map(Condition::description)
                    .collect::<Result<Vec<_>>>()?;
                Ok(and_description(&parts))
            }
            Condition::Or(_) => Err(RuleError::UnresolvedBranch(self.static_description())),
        }
    }

    /// Describes every branch, independent of evaluation.
    pub fn static_description(&self) -> String {
        match self {
            Condition::Simple(simple) => simple.description.clone(),
            Condition::And(children) => {
                let parts: Vec<String> = children.iter().map(Condition::static_description).collect();
                and_description(&parts)
            }
            Condition::Or(children) => children
                .iter()
                .map(Condition::static_description)
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counted(result: bool, description: &str, counter: &Arc<AtomicUsize>) -> Condition<i64> {
        let counter = Arc::clone(counter);
        Condition::custom(
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                result
            },
            description,
        )
    }

    #[test]
    fn test_and_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let condition = Condition::all_of(vec![
            counted(true, "a", &calls),
            counted(false, "b", &calls),
            counted(true, "c", &calls),
        ]);

        let outcome = condition.evaluate(&0).unwrap();
        assert!(!outcome.is_match());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(outcome.explanation(), Err(RuleError::NoExplanation)));
    }

    #[test]
    fn test_or_short_circuits_on_leftmost_match() {
        let calls = Arc::new(AtomicUsize::new(0));
        let condition = Condition::any_of(vec![
            counted(false, "a", &calls),
            counted(true, "b", &calls),
            counted(true, "c", &calls),
        ]);

        let outcome = condition.evaluate(&0).unwrap();
        assert!(outcome.is_match());
        assert_eq!(outcome.branch(), Some(1));
        assert_eq!(outcome.explanation().unwrap(), "b");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_and_or_agree_with_all_any() {
        for mask in 0u8..8 {
            let bits: Vec<bool> = (0..3).map(|i| mask & (1 << i) != 0).collect();
            let leaves = |bits: &[bool]| -> Vec<Condition<i64>> {
                bits.iter()
                    .enumerate()
                    .map(|(i, b)| Condition::is(*b, format!("c{}", i)))
                    .collect()
            };

            let and = Condition::all_of(leaves(&bits)).evaluate(&0).unwrap();
            assert_eq!(and.is_match(), bits.iter().all(|b| *b));

            let or = Condition::any_of(leaves(&bits)).evaluate(&0).unwrap();
            assert_eq!(or.is_match(), bits.iter().any(|b| *b));
            assert_eq!(or.branch(), bits.iter().position(|b| *b));
        }
    }

    #[test]
    fn test_empty_composites() {
        let and: Condition<i64> = Condition::all_of(vec![]);
        assert_eq!(and.evaluate(&0).unwrap().explanation().unwrap(), "[AND: ]");

        let or: Condition<i64> = Condition::any_of(vec![]);
        assert!(!or.evaluate(&0).unwrap().is_match());
    }

    #[test]
    fn test_is_and_not() {
        assert!(Condition::<i64>::is(true, "flag").evaluate(&0).unwrap().is_match());
        assert!(!Condition::<i64>::not(true, "flag").evaluate(&0).unwrap().is_match());
        assert!(Condition::<i64>::not(false, "no flag").evaluate(&0).unwrap().is_match());
    }

    #[test]
    fn test_custom_reads_record() {
        let positive = Condition::custom(|x: &i64| *x > 0, "x > 0");
        assert!(positive.evaluate(&5).unwrap().is_match());
        assert!(!positive.evaluate(&-5).unwrap().is_match());
    }

    #[test]
    fn test_nested_explanation_uses_winning_branch() {
        let condition = Condition::all_of(vec![
            Condition::is(true, "a"),
            Condition::any_of(vec![Condition::is(false, "b"), Condition::is(true, "c")]),
        ]);

        let outcome = condition.evaluate(&0).unwrap();
        assert_eq!(outcome.explanation().unwrap(), "[AND: a; c]");
        assert_eq!(outcome.branch(), None);
    }

    #[test]
    fn test_descriptions() {
        let and: Condition<i64> = Condition::all_of(vec![
            Condition::is(true, "a"),
            Condition::all_of(vec![Condition::is(true, "b"), Condition::is(true, "c")]),
        ]);
        assert_eq!(and.description().unwrap(), "[AND: a; [AND: b; c]]");

        let or: Condition<i64> = Condition::any_of(vec![
            Condition::all_of(vec![Condition::is(true, "a"), Condition::is(true, "b")]),
            Condition::is(true, "c"),
        ]);
        assert_eq!(or.static_description(), "[AND: a; b]; c");
        assert!(matches!(
            or.description(),
            Err(RuleError::UnresolvedBranch(desc)) if desc == "[AND: a; b]; c"
        ));
    }

    #[test]
    fn test_error_policy() {
        let failing: Condition<i64> = Condition::any_of(vec![
            Condition::try_custom(|_| Err(RuleError::FieldNotFound("Age".to_string())), "Age > 18.00"),
            Condition::is(true, "fallback"),
        ]);

        assert!(matches!(
            failing.evaluate(&0),
            Err(RuleError::FieldNotFound(field)) if field == "Age"
        ));

        let outcome = failing.evaluate_with(&0, ErrorPolicy::NoMatch).unwrap();
        assert_eq!(outcome.branch(), Some(1));
        assert_eq!(outcome.explanation().unwrap(), "fallback");
    }
}
