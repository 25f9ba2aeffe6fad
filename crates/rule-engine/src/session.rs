//! Output of a firing pass.

use crate::error::Result;
use crate::explanation::format_explanation;
use crate::types::Results;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why one rule fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    /// Description of the action that ran.
    pub action_description: String,

    /// Explanation of the matched condition, in the bracket grammar.
    pub condition_explanation: String,
}

impl Explanation {
    pub fn new(action_description: impl Into<String>, condition_explanation: impl Into<String>) -> Self {
        Self {
            action_description: action_description.into(),
            condition_explanation: condition_explanation.into(),
        }
    }

    /// The condition explanation re-indented for display.
    pub fn formatted(&self) -> String {
        format_explanation(&self.condition_explanation)
    }
}

/// The results store and explanation log of one firing pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The results store, seeded by the caller's initializer.
    pub results: Results,

    /// One entry per rule that fired, in firing order.
    pub explanations: Vec<Explanation>,

    /// When the pass started.
    pub fired_at: DateTime<Utc>,

    /// Number of rules whose condition was evaluated.
    pub rules_evaluated: usize,

    /// Time taken to fire all rules (in microseconds).
    pub evaluation_time_us: Option<u64>,
}

impl Session {
    /// Starts a session over a freshly seeded results store.
    pub fn new(results: Results) -> Self {
        Self {
            results,
            explanations: Vec::new(),
            fired_at: Utc::now(),
            rules_evaluated: 0,
            evaluation_time_us: None,
        }
    }

    /// Sets the evaluation time.
    pub fn with_evaluation_time(mut self, time_us: u64) -> Self {
        self.evaluation_time_us = Some(time_us);
        self
    }

    pub fn results(&self) -> &Results {
        &self.results
    }

    pub fn into_results(self) -> Results {
        self.results
    }

    /// Looks up one key of the results store.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.results.get(key)
    }

    pub fn explanations(&self) -> &[Explanation] {
        &self.explanations
    }

    /// Number of rules that fired.
    pub fn fired_count(&self) -> usize {
        self.explanations.len()
    }

    /// Renders every explanation with its action, for debugging.
    pub fn inspect(&self) -> String {
        self.explanations
            .iter()
            .map(|e| format!("{} \n Action-> {}\n", e.formatted(), e.action_description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serializes the session to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
