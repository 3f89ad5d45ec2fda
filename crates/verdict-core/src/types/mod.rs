//! Type system for Verdict
//!
//! Runtime values and the comparison rules shared by the condition
//! evaluator and the FEEL expression evaluator.

pub mod value;

pub use value::Value;
