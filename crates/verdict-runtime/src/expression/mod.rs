//! FEEL expression evaluation

mod evaluator;
mod functions;
mod operators;

pub use evaluator::ExpressionEvaluator;
