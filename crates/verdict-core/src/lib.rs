//! Verdict Core - Core types and definitions for the Verdict decision engine
//!
//! This crate provides the fundamental types shared by every other crate:
//! - Value types and their comparison semantics
//! - Condition trees, FEEL expression AST, rule sets and decision tables
//! - Error types (structural errors detected at load time, value errors)

pub mod ast;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use ast::{
    BinaryOperator, BuiltinFunction, CombinatorKind, Condition, ConditionNode, DecisionTable,
    Expression, HitPolicy, InputClause, Operator, OutputClause, Range, Rule, RuleSet, TableRow,
    UnaryOperator,
};
pub use error::{CoreError, StructuralError};
pub use types::Value;
