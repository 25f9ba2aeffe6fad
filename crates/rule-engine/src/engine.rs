//! The rule engine and its firing loop.

use crate::config::EngineConfig;
use crate::error::{Result, RuleError};
use crate::rule::Rule;
use crate::session::{Explanation, Session};
use crate::types::Results;
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

/// An ordered list of rules fired against one record at a time.
///
/// Rules fire in registration order. The engine keeps no per-call state, so
/// a shared engine can be fired from several threads concurrently.
#[derive(Debug)]
pub struct RuleEngine<T: ?Sized> {
    rules: Vec<Rule<T>>,
    config: EngineConfig,
}

impl<T: ?Sized> RuleEngine<T> {
    /// Creates an engine with no rules and the default config.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            rules: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Appends a rule.
    pub fn add_rule(&mut self, rule: Rule<T>) {
        self.rules.push(rule);
    }

    /// Appends rules, keeping their order.
    pub fn add_rules<I>(&mut self, rules: I)
    where
        I: IntoIterator<Item = Rule<T>>,
    {
        self.rules.extend(rules);
    }

    pub fn rules(&self) -> &[Rule<T>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Fires every rule against `data`.
    ///
    /// The results store is seeded from `initializer` on every call. The pass
    /// stops at the first failing condition or action and returns the error;
    /// nothing is rolled back, use [`fire_rules_into`](Self::fire_rules_into)
    /// to keep the partial session.
    pub fn fire_rules<F>(&self, data: &T, initializer: F) -> Result<Session>
    where
        F: FnOnce() -> Results,
    {
        let start = Instant::now();
        let mut session = Session::new(initializer());
        self.fire_rules_into(data, &mut session)?;

        let elapsed = start.elapsed().as_micros() as u64;
        info!(
            engine = %self.config.name,
            rules = session.rules_evaluated,
            fired = session.fired_count(),
            elapsed_us = elapsed,
            "Firing pass completed"
        );
        Ok(session.with_evaluation_time(elapsed))
    }

    /// Fires every rule against `data`, recording into a caller-owned session.
    ///
    /// On error the session holds the results and explanations of every rule
    /// that fired before the failure.
    pub fn fire_rules_into(&self, data: &T, session: &mut Session) -> Result<()> {
        let _span = info_span!("fire_rules", engine = %self.config.name).entered();
        let policy = self.config.on_condition_error;

        for (index, rule) in self.rules.iter().enumerate() {
            let action = rule.action();
            session.rules_evaluated += 1;

            let evaluation = rule
                .condition()
                .evaluate_with(data, policy)
                .map_err(|source| {
                    warn!(rule = index, error = %source, "Condition evaluation failed");
                    RuleError::ConditionFailed {
                        rule: action.description().to_string(),
                        source: Box::new(source),
                    }
                })?;

            if !evaluation.is_match() {
                debug!(rule = index, "Rule skipped");
                continue;
            }
            let explanation = evaluation.into_explanation()?;
            debug!(rule = index, explanation = %explanation, "Rule matched");

            if let Err(source) = action.run(&mut session.results, data) {
                warn!(
                    rule = index,
                    action = action.description(),
                    error = %source,
                    "Action failed, aborting firing pass"
                );
                return Err(RuleError::ActionFailed {
                    action: action.description().to_string(),
                    source,
                });
            }

            session
                .explanations
                .push(Explanation::new(action.description(), explanation));
        }

        Ok(())
    }
}

impl<T: ?Sized> Default for RuleEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}
