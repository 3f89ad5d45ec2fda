//! Builder pattern for DecisionAgent

use crate::agent::DecisionAgent;
use crate::config::AgentConfig;
use crate::error::{Result, SdkError};
use crate::scoring::ScoringStrategy;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use verdict_core::ast::{DecisionTable, RuleSet};
use verdict_parser::{DecisionTableParser, Definition, DefinitionParser, RulesetParser};
use verdict_runtime::{DecisionTableEvaluator, Evaluator, RuleSetEvaluator};

/// Where an evaluator comes from; resolved in insertion order by `build`
enum Source {
    Evaluator(Arc<dyn Evaluator>),
    Content(String),
    RuleFile(PathBuf),
    TableFile(PathBuf),
    DefinitionFile(PathBuf),
}

/// Builder for DecisionAgent
///
/// # Example
///
/// ```rust,ignore
/// use verdict_sdk::DecisionAgentBuilder;
///
/// let agent = DecisionAgentBuilder::new()
///     .add_rule_file("rules/loan_policy.yaml")
///     .add_definition_content(eligibility_table_yaml)
///     .build()?;
///
/// let decision = agent.decide(&context)?;
/// ```
pub struct DecisionAgentBuilder {
    config: AgentConfig,
    sources: Vec<Source>,
    strategy: Option<Box<dyn ScoringStrategy>>,
}

impl DecisionAgentBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: AgentConfig::new(),
            sources: Vec::new(),
            strategy: None,
        }
    }

    /// Replace the configuration; its definition files load before any
    /// source added to the builder
    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the agent name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Add a ready-made evaluator
    pub fn with_evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.sources.push(Source::Evaluator(Arc::new(evaluator)));
        self
    }

    /// Add a shared evaluator
    pub fn with_shared_evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.sources.push(Source::Evaluator(evaluator));
        self
    }

    /// Add an already validated rule set
    pub fn with_ruleset(self, ruleset: impl Into<Arc<RuleSet>>) -> Self {
        self.with_evaluator(RuleSetEvaluator::new(ruleset))
    }

    /// Add an already validated decision table
    pub fn with_table(self, table: impl Into<Arc<DecisionTable>>) -> Self {
        self.with_evaluator(DecisionTableEvaluator::new(table))
    }

    /// Add a rule set or decision table document (YAML or JSON)
    pub fn add_definition_content(mut self, content: impl Into<String>) -> Self {
        self.sources.push(Source::Content(content.into()));
        self
    }

    /// Add a rule set file
    pub fn add_rule_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Source::RuleFile(path.into()));
        self
    }

    /// Add a decision table file
    pub fn add_table_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Source::TableFile(path.into()));
        self
    }

    /// Add a file holding either kind of definition
    pub fn add_definition_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Source::DefinitionFile(path.into()));
        self
    }

    /// Use a custom strategy instead of the configured one
    pub fn with_strategy(mut self, strategy: impl ScoringStrategy + 'static) -> Self {
        self.strategy = Some(Box::new(strategy));
        self
    }

    /// Parse every definition and build the agent
    pub fn build(self) -> Result<DecisionAgent> {
        self.config.validate()?;

        let configured = self
            .config
            .rule_files
            .iter()
            .cloned()
            .map(Source::RuleFile)
            .chain(self.config.table_files.iter().cloned().map(Source::TableFile));

        let mut evaluators = Vec::new();
        for source in configured.chain(self.sources) {
            evaluators.push(Self::load(source)?);
        }

        if evaluators.is_empty() {
            return Err(SdkError::NoEvaluators);
        }

        let mut seen = HashSet::new();
        for evaluator in &evaluators {
            if !seen.insert(evaluator.name().to_string()) {
                return Err(SdkError::ConfigError(format!(
                    "duplicate evaluator '{}'",
                    evaluator.name()
                )));
            }
        }

        let strategy = self
            .strategy
            .unwrap_or_else(|| self.config.scoring.build_strategy());

        tracing::info!(
            "built decision agent '{}' with {} evaluator(s), strategy {}",
            self.config.name,
            evaluators.len(),
            strategy.name()
        );

        Ok(DecisionAgent::new(
            self.config.name,
            evaluators,
            strategy,
            self.config.explain.verbosity,
        ))
    }

    fn load(source: Source) -> Result<Arc<dyn Evaluator>> {
        Ok(match source {
            Source::Evaluator(evaluator) => evaluator,
            Source::Content(content) => Self::from_definition(DefinitionParser::parse(&content)?),
            Source::RuleFile(path) => {
                let ruleset = RulesetParser::parse(&Self::read(&path)?)?;
                Arc::new(RuleSetEvaluator::new(ruleset))
            }
            Source::TableFile(path) => {
                let table = DecisionTableParser::parse(&Self::read(&path)?)?;
                Arc::new(DecisionTableEvaluator::new(table))
            }
            Source::DefinitionFile(path) => {
                Self::from_definition(DefinitionParser::parse(&Self::read(&path)?)?)
            }
        })
    }

    fn from_definition(definition: Definition) -> Arc<dyn Evaluator> {
        match definition {
            Definition::RuleSet(ruleset) => Arc::new(RuleSetEvaluator::new(ruleset)),
            Definition::DecisionTable(table) => Arc::new(DecisionTableEvaluator::new(table)),
        }
    }

    fn read(path: &Path) -> Result<String> {
        tracing::debug!("loading definition {}", path.display());
        Ok(std::fs::read_to_string(path)?)
    }
}

impl Default for DecisionAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
