//! Debate engine configuration.
//!
//! [`DebateConfig`] is a static value object handed to the orchestrator at
//! construction time. Per-session overrides (rounds, threshold) arrive with
//! each request and are validated against the limits stored here.

use crate::consensus::ConsensusRule;
use crate::core::error::DomainError;
use std::time::Duration;

/// Default number of rounds when the caller does not choose
pub const DEFAULT_MAX_ROUNDS: u32 = 3;
/// Hard ceiling on rounds per session
pub const DEFAULT_MAX_ROUNDS_LIMIT: u32 = 10;
/// Default pairwise similarity required for consensus
pub const DEFAULT_CONSENSUS_THRESHOLD: f64 = 0.85;
/// Default per-backend call timeout
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Engine-wide debate settings.
///
/// # Example
///
/// ```
/// use council_domain::{ConsensusRule, DebateConfig};
///
/// let config = DebateConfig::default()
///     .with_max_rounds(5)
///     .with_rule(ConsensusRule::Majority { min_agreement_ratio: 0.8 });
///
/// assert_eq!(config.max_rounds, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DebateConfig {
    /// Rounds used when a request does not specify any
    pub max_rounds: u32,
    /// Largest `max_rounds` a request may ask for
    pub max_rounds_limit: u32,
    /// Similarity score each pair must reach
    pub consensus_threshold: f64,
    /// How per-pair scores become a verdict
    pub rule: ConsensusRule,
    /// Upper bound on a single backend call
    pub call_timeout: Duration,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            max_rounds_limit: DEFAULT_MAX_ROUNDS_LIMIT,
            consensus_threshold: DEFAULT_CONSENSUS_THRESHOLD,
            rule: ConsensusRule::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl DebateConfig {
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn with_max_rounds_limit(mut self, limit: u32) -> Self {
        self.max_rounds_limit = limit;
        self
    }

    pub fn with_consensus_threshold(mut self, threshold: f64) -> Self {
        self.consensus_threshold = threshold;
        self
    }

    pub fn with_rule(mut self, rule: ConsensusRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Check a requested round count against the configured ceiling
    pub fn check_rounds(&self, rounds: u32) -> Result<u32, DomainError> {
        if rounds == 0 || rounds > self.max_rounds_limit {
            return Err(DomainError::InvalidRoundLimit {
                value: rounds,
                limit: self.max_rounds_limit,
            });
        }
        Ok(rounds)
    }

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        self.check_rounds(self.max_rounds)?;
        check_threshold(self.consensus_threshold)?;
        self.rule.validate()
    }
}

/// A threshold must be a finite value in `[0, 1]`
pub fn check_threshold(threshold: f64) -> Result<f64, DomainError> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(DomainError::InvalidThreshold(threshold));
    }
    Ok(threshold)
}
