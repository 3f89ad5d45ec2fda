//! Abstract Syntax Tree (AST) definitions for Verdict
//!
//! This module contains the definitions for:
//! - Condition operators and condition trees (JSON/YAML rules)
//! - FEEL expressions (DMN decision table cells)
//! - Rules, rule sets and decision tables

pub mod condition;
pub mod decision_table;
pub mod expression;
pub mod operator;
pub mod rule;
pub mod ruleset;

pub use condition::{CombinatorKind, Condition, ConditionNode};
pub use decision_table::{DecisionTable, HitPolicy, InputClause, OutputClause, TableRow};
pub use expression::{BinaryOperator, BuiltinFunction, Expression, Range, UnaryOperator};
pub use operator::Operator;
pub use rule::Rule;
pub use ruleset::RuleSet;
