//! Configuration types for DecisionAgent

use crate::error::{Result, SdkError};
use crate::explain::Verbosity;
use crate::scoring::{
    DenominatorPolicy, HighestWeight, ScoringStrategy, StrategyKind, Unanimous, ViolationPolicy,
    WeightedAverage, DEFAULT_NO_DECISION_LABEL,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main agent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Agent name, used in logs
    pub name: String,

    /// Scoring configuration
    pub scoring: ScoringConfig,

    /// Explanation configuration
    pub explain: ExplainConfig,

    /// Rule set definition files
    pub rule_files: Vec<PathBuf>,

    /// Decision table definition files
    pub table_files: Vec<PathBuf>,
}

impl AgentConfig {
    /// Create a new agent configuration
    pub fn new() -> Self {
        Self {
            name: "default".to_string(),
            scoring: ScoringConfig::default(),
            explain: ExplainConfig::default(),
            rule_files: Vec::new(),
            table_files: Vec::new(),
        }
    }

    /// Parse a YAML (or JSON) configuration document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// Relative definition paths are resolved against the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&content)?;

        if let Some(base) = path.parent() {
            for file in config.rule_files.iter_mut().chain(config.table_files.iter_mut()) {
                if file.is_relative() {
                    *file = base.join(&*file);
                }
            }
        }
        Ok(config)
    }

    /// Set the agent name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set scoring configuration
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set the default report verbosity
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.explain.verbosity = verbosity;
        self
    }

    /// Add a rule set file
    pub fn with_rule_file(mut self, path: PathBuf) -> Self {
        self.rule_files.push(path);
        self
    }

    /// Add a decision table file
    pub fn with_table_file(mut self, path: PathBuf) -> Self {
        self.table_files.push(path);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SdkError::ConfigError("agent name must not be empty".to_string()));
        }
        if self.scoring.no_decision_label.trim().is_empty() {
            return Err(SdkError::ConfigError(
                "no_decision_label must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub strategy: StrategyKind,

    /// Only used by `weighted_average`
    pub denominator: DenominatorPolicy,

    pub violation: ViolationPolicy,
    pub no_decision_label: String,
}

impl ScoringConfig {
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_denominator(mut self, denominator: DenominatorPolicy) -> Self {
        self.denominator = denominator;
        self
    }

    pub fn with_violation(mut self, violation: ViolationPolicy) -> Self {
        self.violation = violation;
        self
    }

    pub fn with_no_decision_label(mut self, label: impl Into<String>) -> Self {
        self.no_decision_label = label.into();
        self
    }

    /// Instantiate the configured strategy
    pub fn build_strategy(&self) -> Box<dyn ScoringStrategy> {
        match self.strategy {
            StrategyKind::WeightedAverage => Box::new(
                WeightedAverage::new()
                    .with_denominator(self.denominator)
                    .with_violation_policy(self.violation)
                    .with_no_decision_label(self.no_decision_label.clone()),
            ),
            StrategyKind::HighestWeight => Box::new(
                HighestWeight::new()
                    .with_violation_policy(self.violation)
                    .with_no_decision_label(self.no_decision_label.clone()),
            ),
            StrategyKind::Unanimous => Box::new(
                Unanimous::new()
                    .with_violation_policy(self.violation)
                    .with_no_decision_label(self.no_decision_label.clone()),
            ),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            denominator: DenominatorPolicy::default(),
            violation: ViolationPolicy::default(),
            no_decision_label: DEFAULT_NO_DECISION_LABEL.to_string(),
        }
    }
}

/// Explanation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainConfig {
    pub verbosity: Verbosity,
}
