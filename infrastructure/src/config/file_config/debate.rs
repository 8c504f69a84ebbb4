//! Debate engine configuration from TOML (`[debate]` section)

use council_domain::{
    ConfigIssue, ConfigIssueCode, ConsensusRule, DEFAULT_CONSENSUS_THRESHOLD, DEFAULT_MAX_ROUNDS,
    DEFAULT_MAX_ROUNDS_LIMIT, DEFAULT_MIN_AGREEMENT_RATIO, DebateConfig,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw debate configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Rounds per session when the command line does not say
    pub max_rounds: u32,
    /// Largest round count a session may request
    pub max_rounds_limit: u32,
    /// Pairwise similarity needed for consensus
    pub consensus_threshold: f64,
    /// Consensus rule: "pairwise" or "majority"
    pub rule: String,
    /// Share of responses that must agree under the majority rule
    pub min_agreement_ratio: f64,
    /// Per-backend call timeout in seconds
    pub call_timeout_secs: u64,
    /// Only use backends with `mode = "ollama"`
    pub ollama_only: bool,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            max_rounds_limit: DEFAULT_MAX_ROUNDS_LIMIT,
            consensus_threshold: DEFAULT_CONSENSUS_THRESHOLD,
            rule: "pairwise".to_string(),
            min_agreement_ratio: DEFAULT_MIN_AGREEMENT_RATIO,
            call_timeout_secs: 30,
            ollama_only: false,
        }
    }
}

impl FileDebateConfig {
    /// Parse the rule string, falling back to pairwise on unknown values
    pub fn parse_rule(&self) -> (ConsensusRule, Vec<ConfigIssue>) {
        match self.rule.parse::<ConsensusRule>() {
            Ok(rule) => (rule.with_min_agreement_ratio(self.min_agreement_ratio), vec![]),
            Err(e) => (
                ConsensusRule::Pairwise,
                vec![ConfigIssue::error(
                    ConfigIssueCode::UnknownRule,
                    format!("debate.rule: {}", e),
                )],
            ),
        }
    }

    /// Convert to the domain value object, reporting every problem found
    pub fn to_debate_config(&self) -> (DebateConfig, Vec<ConfigIssue>) {
        let (rule, mut issues) = self.parse_rule();

        if self.max_rounds_limit == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::RoundsOutOfRange,
                "debate.max_rounds_limit must be at least 1",
            ));
        } else if self.max_rounds == 0 || self.max_rounds > self.max_rounds_limit {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::RoundsOutOfRange,
                format!(
                    "debate.max_rounds must be between 1 and {}, got {}",
                    self.max_rounds_limit, self.max_rounds
                ),
            ));
        }

        if !(0.0..=1.0).contains(&self.consensus_threshold) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ThresholdOutOfRange,
                format!(
                    "debate.consensus_threshold must be within [0, 1], got {}",
                    self.consensus_threshold
                ),
            ));
        }

        if let Err(e) = rule.validate() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::AgreementRatioOutOfRange,
                format!("debate.min_agreement_ratio: {}", e),
            ));
        }

        if self.call_timeout_secs == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::TimeoutOutOfRange,
                "debate.call_timeout_secs is 0; using 1 second",
            ));
        }

        let config = DebateConfig::default()
            .with_max_rounds(self.max_rounds)
            .with_max_rounds_limit(self.max_rounds_limit)
            .with_consensus_threshold(self.consensus_threshold)
            .with_rule(rule)
            .with_call_timeout(Duration::from_secs(self.call_timeout_secs.max(1)));

        (config, issues)
    }
}
