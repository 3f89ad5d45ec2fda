//! Decision agent - runs evaluators and scores their results

use crate::decision::Decision;
use crate::error::Result;
use crate::explain::{ExplanationReport, Verbosity};
use crate::scoring::ScoringStrategy;
use std::fmt;
use std::sync::Arc;
use verdict_runtime::{Context, Evaluator};

/// Orchestrates a fixed list of evaluators and one scoring strategy.
///
/// Agents are immutable once built and can be shared across threads
/// behind an `Arc`.
pub struct DecisionAgent {
    name: String,
    evaluators: Vec<Arc<dyn Evaluator>>,
    strategy: Box<dyn ScoringStrategy>,
    verbosity: Verbosity,
}

impl DecisionAgent {
    pub(crate) fn new(
        name: String,
        evaluators: Vec<Arc<dyn Evaluator>>,
        strategy: Box<dyn ScoringStrategy>,
        verbosity: Verbosity,
    ) -> Self {
        Self {
            name,
            evaluators,
            strategy,
            verbosity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluator names, in evaluation order
    pub fn evaluator_names(&self) -> Vec<&str> {
        self.evaluators.iter().map(|evaluator| evaluator.name()).collect()
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Default verbosity used by `explain`
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Run every evaluator against the context and combine the results
    pub fn decide(&self, context: &Context) -> Result<Decision> {
        let results: Vec<_> = self
            .evaluators
            .iter()
            .map(|evaluator| evaluator.evaluate(context))
            .collect();

        let decision = self.strategy.combine(results)?;

        tracing::info!(
            "agent '{}' decided '{}' (confidence {:.4}, strategy {})",
            self.name,
            decision.decision(),
            decision.confidence(),
            self.strategy.name()
        );

        Ok(decision)
    }

    /// Decide against a JSON object; nested objects bind dot paths
    pub fn decide_json(&self, context: &serde_json::Value) -> Result<Decision> {
        let context = Context::from_json(context)?;
        self.decide(&context)
    }

    /// Decide and render the report at the agent's configured verbosity
    pub fn explain(&self, context: &Context) -> Result<ExplanationReport> {
        Ok(self.decide(context)?.report(self.verbosity))
    }
}

impl fmt::Debug for DecisionAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionAgent")
            .field("name", &self.name)
            .field("evaluators", &self.evaluator_names())
            .field("strategy", &self.strategy.name())
            .field("verbosity", &self.verbosity)
            .finish()
    }
}
