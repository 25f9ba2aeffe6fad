//! Rules: a condition bound to an action.

use crate::condition::Condition;
use crate::error::ActionError;
use crate::types::Results;
use std::fmt;

/// Result returned by an action.
pub type ActionResult = std::result::Result<(), ActionError>;

type ActionFn<T> = Box<dyn Fn(&mut Results, &T) -> ActionResult + Send + Sync>;

/// A side-effecting function run when a rule's condition matches.
pub struct Action<T: ?Sized> {
    func: ActionFn<T>,
    description: String,
}

impl<T: ?Sized> Action<T> {
    /// Creates an action that only touches the results store.
    pub fn new<F>(description: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut Results) -> ActionResult + Send + Sync + 'static,
    {
        Self {
            func: Box::new(move |results: &mut Results, _: &T| func(results)),
            description: description.into(),
        }
    }

    /// Creates an action that also reads the input record.
    pub fn with_record<F>(description: impl Into<String>, func: F) -> Self
    where
        F: Fn(&mut Results, &T) -> ActionResult + Send + Sync + 'static,
    {
        Self {
            func: Box::new(func),
            description: description.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Runs the action.
    pub fn run(&self, results: &mut Results, data: &T) -> ActionResult {
        (self.func)(results, data)
    }
}

impl<T: ?Sized> fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A condition paired with the action it triggers.
#[derive(Debug)]
pub struct Rule<T: ?Sized> {
    condition: Condition<T>,
    action: Action<T>,
}

impl<T: ?Sized> Rule<T> {
    pub fn new(condition: Condition<T>, action: Action<T>) -> Self {
        Self { condition, action }
    }

    pub fn condition(&self) -> &Condition<T> {
        &self.condition
    }

    pub fn action(&self) -> &Action<T> {
        &self.action
    }
}

/// Binds a condition to an action function and its description.
pub fn define_rule<T, F>(condition: Condition<T>, action: F, description: impl Into<String>) -> Rule<T>
where
    T: ?Sized,
    F: Fn(&mut Results) -> ActionResult + Send + Sync + 'static,
{
    Rule::new(condition, Action::new(description, action))
}
