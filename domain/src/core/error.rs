//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("max_rounds must be between 1 and {limit}, got {value}")]
    InvalidRoundLimit { value: u32, limit: u32 },

    #[error("Consensus threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("Minimum agreement ratio must be within (0, 1], got {0}")]
    InvalidAgreementRatio(f64),

    #[error("Round {got} recorded out of order (expected round {expected})")]
    RoundOutOfOrder { expected: u32, got: u32 },

    #[error("Round {0} has no responses")]
    EmptyRound(u32),

    #[error("Session already finalized")]
    AlreadyFinalized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_limit_display() {
        let error = DomainError::InvalidRoundLimit { value: 0, limit: 10 };
        assert_eq!(error.to_string(), "max_rounds must be between 1 and 10, got 0");
    }
}
