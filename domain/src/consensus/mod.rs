//! Consensus detection
//!
//! Decides whether the responses of one round have converged:
//!
//! - [`similarity`] - text normalization and the pairwise similarity ratio
//! - [`rule::ConsensusRule`] - which convergence rule a session uses
//! - [`detector::ConsensusDetector`] - applies a rule to a round

pub mod detector;
pub mod rule;
pub mod similarity;

pub use detector::{ConsensusDetector, ConsensusVerdict, has_consensus};
pub use rule::{ConsensusRule, DEFAULT_MIN_AGREEMENT_RATIO};
pub use similarity::{normalize_text, similarity};
