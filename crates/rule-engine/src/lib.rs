//! Rule Engine
//!
//! An embedded, explainable rule evaluation engine. Conditions are composed
//! from field comparisons with AND/OR logic; each rule binds a condition to an
//! action that updates a results store. Every rule that fires leaves an
//! explanation of why it matched.
//!
//! ```
//! use rule_engine::prelude::*;
//! use serde_json::json;
//!
//! let mut engine = RuleEngine::new();
//! engine.add_rule(define_rule(
//!     Condition::any_of(vec![
//!         Condition::all_of(vec![greater_than("Money", 20000.0), is_nil("Employment")]),
//!         list_contains("Friends", "Tuco"),
//!     ]),
//!     |results| {
//!         results.insert("riskScore".to_string(), json!("highRiskCategory"));
//!         Ok(())
//!     },
//!     "risk level: highRiskCategory",
//! ));
//!
//! let user = json!({"Money": 500000, "Employment": null, "Friends": ["Saul"]});
//! let session = engine.fire_rules(&user, Results::new)?;
//!
//! assert_eq!(session.get("riskScore"), Some(&json!("highRiskCategory")));
//! assert_eq!(
//!     session.explanations()[0].condition_explanation,
//!     "[AND: Money > 20000.00; Employment == nil]"
//! );
//! # Ok::<(), rule_engine::RuleError>(())
//! ```

pub mod comparator;
pub mod condition;
pub mod config;
pub mod engine;
pub mod error;
pub mod explanation;
pub mod record;
pub mod rule;
pub mod session;
pub mod types;

pub use condition::{Condition, Evaluation, SimpleCondition};
pub use config::{ConfigFormat, EngineConfig, ErrorPolicy};
pub use engine::RuleEngine;
pub use error::{ActionError, Result, RuleError};
pub use explanation::format_explanation;
pub use record::Record;
pub use rule::{define_rule, Action, ActionResult, Rule};
pub use session::{Explanation, Session};
pub use types::{ComparisonOperator, FieldValue, Results};

/// Version of the rule engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::comparator::*;
    pub use crate::condition::{Condition, Evaluation};
    pub use crate::config::{ConfigFormat, EngineConfig, ErrorPolicy};
    pub use crate::engine::RuleEngine;
    pub use crate::error::{Result, RuleError};
    pub use crate::record::Record;
    pub use crate::rule::{define_rule, Action, ActionResult, Rule};
    pub use crate::session::{Explanation, Session};
    pub use crate::types::{FieldValue, Results};
}
