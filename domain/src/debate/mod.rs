//! Debate orchestration domain
//!
//! Entities and value objects for multi-round debates:
//! - [`entities::Response`] / [`entities::Round`] / [`entities::DebateSession`]
//! - [`phase::DebatePhase`] - orchestrator state machine states
//! - [`config::DebateConfig`] - engine-wide settings

pub mod config;
pub mod entities;
pub mod phase;
