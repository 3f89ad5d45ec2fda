//! Verdict Parser - text to AST parsers for the Verdict decision engine
//!
//! This crate converts textual definitions into validated `verdict-core`
//! structures:
//! - FEEL expressions and DMN unary tests (`ExpressionParser`)
//! - Condition trees, rule sets and decision tables from YAML or JSON

pub mod condition_parser;
pub mod decision_table_parser;
pub mod definition;
pub mod error;
pub mod expression;
pub mod ruleset_parser;
pub mod yaml_parser;

// Re-export main parser types
pub use condition_parser::ConditionParser;
pub use decision_table_parser::DecisionTableParser;
pub use definition::{Definition, DefinitionParser};
pub use error::{ParseError, Result};
pub use expression::ExpressionParser;
pub use ruleset_parser::RulesetParser;
pub use yaml_parser::YamlParser;
