//! Convergence rules
//!
//! A session uses exactly one rule. Pairwise agreement is the default; the
//! majority rule is an explicit opt-in and never mixed with it.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default share of responses that must agree under [`ConsensusRule::Majority`]
pub const DEFAULT_MIN_AGREEMENT_RATIO: f64 = 0.8;

/// Rule turning per-pair similarity scores into a verdict
///
/// - `Pairwise`: every pair of responses must reach the threshold (default)
/// - `Majority`: the largest group of mutually similar responses must make
///   up at least `min_agreement_ratio` of the round
///
/// # Example
///
/// ```
/// use council_domain::ConsensusRule;
///
/// let rule: ConsensusRule = "majority".parse().unwrap();
/// assert_eq!(rule, ConsensusRule::Majority { min_agreement_ratio: 0.8 });
/// assert_eq!(rule.name(), "majority");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "rule", rename_all = "lowercase")]
pub enum ConsensusRule {
    #[default]
    Pairwise,
    Majority { min_agreement_ratio: f64 },
}

impl ConsensusRule {
    pub fn name(&self) -> &'static str {
        match self {
            ConsensusRule::Pairwise => "pairwise",
            ConsensusRule::Majority { .. } => "majority",
        }
    }

    /// Human-readable description of the rule
    pub fn description(&self) -> String {
        match self {
            ConsensusRule::Pairwise => "pairwise (every pair must agree)".to_string(),
            ConsensusRule::Majority {
                min_agreement_ratio,
            } => format!(
                "majority (at least {:.0}% must agree)",
                min_agreement_ratio * 100.0
            ),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            ConsensusRule::Pairwise => Ok(()),
            ConsensusRule::Majority {
                min_agreement_ratio,
            } => {
                let r = *min_agreement_ratio;
                if r.is_finite() && r > 0.0 && r <= 1.0 {
                    Ok(())
                } else {
                    Err(DomainError::InvalidAgreementRatio(r))
                }
            }
        }
    }

    /// Replace the agreement ratio of a majority rule (no-op for pairwise)
    pub fn with_min_agreement_ratio(self, ratio: f64) -> Self {
        match self {
            ConsensusRule::Pairwise => self,
            ConsensusRule::Majority { .. } => ConsensusRule::Majority {
                min_agreement_ratio: ratio,
            },
        }
    }
}

impl std::fmt::Display for ConsensusRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for ConsensusRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pairwise" => Ok(ConsensusRule::Pairwise),
            "majority" => Ok(ConsensusRule::Majority {
                min_agreement_ratio: DEFAULT_MIN_AGREEMENT_RATIO,
            }),
            _ => Err(format!(
                "Unknown consensus rule: {}. Valid: pairwise, majority",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        assert_eq!(ConsensusRule::default(), ConsensusRule::Pairwise);
    }

    #[test]
    fn test_parse_rule() {
        assert_eq!("Pairwise".parse::<ConsensusRule>().ok(), Some(ConsensusRule::Pairwise));
        assert!("agreement-phrase".parse::<ConsensusRule>().is_err());
    }

    #[test]
    fn test_with_ratio() {
        let rule = ConsensusRule::Majority {
            min_agreement_ratio: 0.8,
        }
        .with_min_agreement_ratio(0.6);
        assert_eq!(rule, ConsensusRule::Majority { min_agreement_ratio: 0.6 });
        assert_eq!(
            ConsensusRule::Pairwise.with_min_agreement_ratio(0.6),
            ConsensusRule::Pairwise
        );
    }

    #[test]
    fn test_validate_ratio() {
        let ok = ConsensusRule::Majority {
            min_agreement_ratio: 1.0,
        };
        assert!(ok.validate().is_ok());
        for bad in [0.0, -0.5, 1.5, f64::NAN] {
            let rule = ConsensusRule::Majority {
                min_agreement_ratio: bad,
            };
            assert!(rule.validate().is_err());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ConsensusRule::Majority {
                min_agreement_ratio: 0.8
            }
            .to_string(),
            "majority (at least 80% must agree)"
        );
    }
}
