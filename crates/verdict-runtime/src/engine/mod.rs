//! Evaluation engines

pub mod condition;
pub mod rule_engine;
pub mod table_engine;

pub use condition::ConditionEvaluator;
pub use rule_engine::RuleEngine;
pub use table_engine::DecisionTableEngine;
