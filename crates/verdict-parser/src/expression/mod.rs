//! FEEL expression parsing
//!
//! A hand-written lexer feeds a recursive-descent parser. Operator
//! precedence, loosest first:
//!
//! `or` < `and` < `in` < comparison (`= != < <= > >=`) < `+ -` < `* /` < unary (`not`, `-`)
//!
//! Supported primaries:
//! - Literals: `42`, `0.7`, `"text"`, `true`, `false`, `null`
//! - Lists and ranges: `["gold", "silver"]`, `[18..65)`, `(0..1]`
//! - Field paths: `customer.age`
//! - The column input placeholder `?`
//! - Built-in calls, with multi-word names: `string length(customer.name)`

mod lexer;
mod parser;

pub use parser::ExpressionParser;
