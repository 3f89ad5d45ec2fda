//! Evaluator capability
//!
//! Rule sets and decision tables are evaluated through the same trait, so
//! scoring and explanations never depend on the concrete definition kind.

use crate::context::Context;
use crate::engine::{DecisionTableEngine, RuleEngine};
use crate::result::EvaluationResult;
use std::sync::Arc;
use verdict_core::ast::{DecisionTable, RuleSet};

/// Anything that turns a context into an `EvaluationResult`
pub trait Evaluator: Send + Sync {
    /// Name reported in results (the definition ID)
    fn name(&self) -> &str;

    /// Evaluate against a context; never fails, errors end up in traces
    fn evaluate(&self, context: &Context) -> EvaluationResult;
}

/// Evaluator over a shared rule set
#[derive(Debug, Clone)]
pub struct RuleSetEvaluator {
    ruleset: Arc<RuleSet>,
}

impl RuleSetEvaluator {
    pub fn new(ruleset: impl Into<Arc<RuleSet>>) -> Self {
        Self {
            ruleset: ruleset.into(),
        }
    }

    pub fn ruleset(&self) -> &RuleSet {
        &self.ruleset
    }
}

impl Evaluator for RuleSetEvaluator {
    fn name(&self) -> &str {
        self.ruleset.id()
    }

    fn evaluate(&self, context: &Context) -> EvaluationResult {
        RuleEngine::evaluate(&self.ruleset, context)
    }
}

/// Evaluator over a shared decision table
#[derive(Debug, Clone)]
pub struct DecisionTableEvaluator {
    table: Arc<DecisionTable>,
}

impl DecisionTableEvaluator {
    pub fn new(table: impl Into<Arc<DecisionTable>>) -> Self {
        Self {
            table: table.into(),
        }
    }

    pub fn table(&self) -> &DecisionTable {
        &self.table
    }
}

impl Evaluator for DecisionTableEvaluator {
    fn name(&self) -> &str {
        self.table.id()
    }

    fn evaluate(&self, context: &Context) -> EvaluationResult {
        DecisionTableEngine::evaluate(&self.table, context)
    }
}
