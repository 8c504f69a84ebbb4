//! Domain layer for debate-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Debate
//!
//! Several independent backends answer the same question over a series of
//! rounds. From round 2 on, each backend sees the previous round's answers
//! and is asked to critique and refine its own.
//!
//! - **Round**: one synchronized cycle of concurrent backend calls
//! - **Consensus**: the round's responses are similar enough under the
//!   session's [`ConsensusRule`]
//! - **Synthesis**: one final answer produced from the full round history
//!
//! ## Session lifecycle
//!
//! `Init → RoundActive(k) → {ConsensusReached(k) | RoundsExhausted} → Synthesis → Done`
//! (see [`DebatePhase`]).

pub mod backend;
pub mod config;
pub mod consensus;
pub mod core;
pub mod debate;
pub mod prompt;

// Re-export commonly used types
pub use backend::{
    BackendDescriptor, BackendId, BackendKind, RemoteProvider,
    recommend::{ModelRecommendation, QuestionDomain},
};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{
    ConsensusDetector, ConsensusRule, ConsensusVerdict, DEFAULT_MIN_AGREEMENT_RATIO,
    has_consensus, normalize_text, similarity,
};
pub use core::{
    error::DomainError,
    question::Question,
    string::{preview, title_case},
};
pub use debate::{
    config::{
        DEFAULT_CALL_TIMEOUT, DEFAULT_CONSENSUS_THRESHOLD, DEFAULT_MAX_ROUNDS,
        DEFAULT_MAX_ROUNDS_LIMIT, DebateConfig, check_threshold,
    },
    entities::{DebateSession, Response, Round},
    phase::DebatePhase,
};
pub use prompt::{DebatePromptTemplate, build_context, build_history};
