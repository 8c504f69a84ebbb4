//! States of the round orchestrator.

use serde::{Deserialize, Serialize};

/// Where a debate currently is
///
/// ```text
/// Init -> RoundActive(1) -> RoundActive(2) -> ... -+-> ConsensusReached(k) -+-> Synthesis -> Done
///                                                  +-> RoundsExhausted -----+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "round", rename_all = "snake_case")]
pub enum DebatePhase {
    Init,
    RoundActive(u32),
    ConsensusReached(u32),
    RoundsExhausted,
    Synthesis,
    Done,
}

impl DebatePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebatePhase::Init => "init",
            DebatePhase::RoundActive(_) => "round_active",
            DebatePhase::ConsensusReached(_) => "consensus_reached",
            DebatePhase::RoundsExhausted => "rounds_exhausted",
            DebatePhase::Synthesis => "synthesis",
            DebatePhase::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DebatePhase::Done)
    }

    /// Next state after a round finished.
    ///
    /// Consensus wins over exhaustion when both happen on the last round.
    pub fn after_round(round: u32, consensus: bool, max_rounds: u32) -> Self {
        if consensus {
            DebatePhase::ConsensusReached(round)
        } else if round >= max_rounds {
            DebatePhase::RoundsExhausted
        } else {
            DebatePhase::RoundActive(round + 1)
        }
    }
}

impl std::fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebatePhase::RoundActive(n) => write!(f, "round {}", n),
            DebatePhase::ConsensusReached(n) => write!(f, "consensus at round {}", n),
            other => f.write_str(other.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_after_round_transitions() {
        assert_eq!(DebatePhase::after_round(1, true, 3), DebatePhase::ConsensusReached(1));
        assert_eq!(DebatePhase::after_round(1, false, 3), DebatePhase::RoundActive(2));
        assert_eq!(DebatePhase::after_round(3, false, 3), DebatePhase::RoundsExhausted);
        assert_eq!(DebatePhase::after_round(3, true, 3), DebatePhase::ConsensusReached(3));
    }

    #[test]
    fn test_display() {
        assert_eq!(DebatePhase::RoundActive(2).to_string(), "round 2");
        assert_eq!(DebatePhase::Synthesis.to_string(), "synthesis");
        assert!(DebatePhase::Done.is_terminal());
        assert!(!DebatePhase::Synthesis.is_terminal());
    }
}
