//! Run Debate use case
//!
//! Drives a debate from question to final answer:
//!
//! ```text
//! Init -> RoundActive(k) -> {ConsensusReached(k) | RoundsExhausted} -> Synthesis -> Done
//! ```
//!
//! Rounds run strictly one after another; within a round every backend is
//! called concurrently through the [`BackendRegistry`].

use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use crate::ports::transcript::{NoTranscript, TranscriptEvent, TranscriptLogger};
use crate::registry::{BackendRegistry, RegistryError};
use crate::use_cases::synthesize::{NO_SYNTHESIS_FALLBACK, synthesize};
use council_domain::{
    ConsensusDetector, ConsensusVerdict, DebateConfig, DebatePhase, DebatePromptTemplate,
    DebateSession, DomainError, Question, Round, build_context, build_history, check_threshold,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during a debate
///
/// Backend failures never show up here; they are recorded as error
/// responses inside the session.
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("Invalid input: {0}")]
    InvalidInput(DomainError),

    #[error("Configuration error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Session error: {0}")]
    Session(#[from] DomainError),
}

/// Input for the RunDebate use case
///
/// Unset overrides fall back to the use case's [`DebateConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunDebateInput {
    /// The question to debate
    pub question: String,
    /// Upper bound on rounds for this session
    pub max_rounds: Option<u32>,
    /// Similarity every pair must reach
    pub consensus_threshold: Option<f64>,
}

impl RunDebateInput {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            max_rounds: None,
            consensus_threshold: None,
        }
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    pub fn with_consensus_threshold(mut self, threshold: f64) -> Self {
        self.consensus_threshold = Some(threshold);
        self
    }
}

/// Use case for running a debate
pub struct RunDebateUseCase {
    registry: Arc<BackendRegistry>,
    config: DebateConfig,
    transcript: Arc<dyn TranscriptLogger>,
}

impl RunDebateUseCase {
    pub fn new(registry: Arc<BackendRegistry>, config: DebateConfig) -> Self {
        Self {
            registry,
            config,
            transcript: Arc::new(NoTranscript),
        }
    }

    pub fn with_transcript(mut self, transcript: Arc<dyn TranscriptLogger>) -> Self {
        self.transcript = transcript;
        self
    }

    pub fn config(&self) -> &DebateConfig {
        &self.config
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunDebateInput) -> Result<DebateSession, RunDebateError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDebateInput,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<DebateSession, RunDebateError> {
        let mut phase = DebatePhase::Init;
        progress.on_phase_change(&phase);

        let (question, max_rounds, detector) = self.validate(&input)?;
        info!(
            "Starting debate with {} backends (max {} rounds, threshold {:.2}, rule {})",
            self.registry.len(),
            max_rounds,
            detector.threshold(),
            detector.rule().name()
        );
        self.transcript.log(TranscriptEvent::new(
            "session_started",
            serde_json::json!({
                "question": question.content(),
                "backends": self.registry.descriptors(),
                "max_rounds": max_rounds,
                "consensus_threshold": detector.threshold(),
                "rule": detector.rule().name(),
            }),
        ));

        let mut session = DebateSession::new(question);
        phase = DebatePhase::RoundActive(1);

        while !phase.is_terminal() {
            progress.on_phase_change(&phase);
            phase = match phase {
                DebatePhase::Init => DebatePhase::RoundActive(1),
                DebatePhase::RoundActive(k) => {
                    self.run_round(&mut session, k, max_rounds, &detector, progress)
                        .await?
                }
                DebatePhase::ConsensusReached(_) | DebatePhase::RoundsExhausted => {
                    DebatePhase::Synthesis
                }
                DebatePhase::Synthesis => {
                    self.run_synthesis(&mut session, progress).await?;
                    DebatePhase::Done
                }
                DebatePhase::Done => DebatePhase::Done,
            };
        }
        progress.on_phase_change(&phase);

        info!(
            "Debate finished after {} rounds (consensus: {})",
            session.total_rounds(),
            session.consensus_reached()
        );
        Ok(session)
    }

    /// Init checks; nothing is sent to a backend until these pass
    fn validate(
        &self,
        input: &RunDebateInput,
    ) -> Result<(Question, u32, ConsensusDetector), RunDebateError> {
        let question = Question::parse(input.question.as_str()).map_err(RunDebateError::InvalidInput)?;
        let max_rounds = self
            .config
            .check_rounds(input.max_rounds.unwrap_or(self.config.max_rounds))
            .map_err(RunDebateError::InvalidInput)?;
        let threshold = check_threshold(
            input
                .consensus_threshold
                .unwrap_or(self.config.consensus_threshold),
        )
        .map_err(RunDebateError::InvalidInput)?;
        self.config
            .rule
            .validate()
            .map_err(RunDebateError::InvalidInput)?;
        if self.registry.is_empty() {
            return Err(RegistryError::NoBackends.into());
        }
        Ok((
            question,
            max_rounds,
            ConsensusDetector::new(self.config.rule, threshold),
        ))
    }

    /// RoundActive(k): prompt, fan out, record, check convergence
    async fn run_round(
        &self,
        session: &mut DebateSession,
        k: u32,
        max_rounds: u32,
        detector: &ConsensusDetector,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<DebatePhase, RunDebateError> {
        info!("Round {}/{}", k, max_rounds);
        progress.on_round_start(k, max_rounds, self.registry.len());

        let question = session.question().content();
        let prompt = match session.last_round() {
            Some(previous) if k > 1 => {
                DebatePromptTemplate::refinement_prompt(question, &build_context(previous))
            }
            _ => DebatePromptTemplate::initial_prompt(question),
        };
        debug!("Round {} prompt: {} chars", k, prompt.len());

        let responses = self
            .registry
            .fan_out_observed(&prompt, |response| progress.on_backend_complete(k, response))
            .await?;
        let round = Round::new(k, Round::describe(k), responses);
        let verdict = score_round(*detector, &round).await;

        info!(
            "Round {} complete: {} responses, {} errors, consensus: {}",
            k,
            round.responses.len(),
            round.error_count(),
            verdict.reached
        );
        if let Some(lowest) = verdict.lowest_similarity {
            debug!("Round {} lowest pairwise similarity: {:.3}", k, lowest);
        }

        progress.on_round_complete(&round, &verdict);
        self.transcript.log(TranscriptEvent::new(
            "round_completed",
            serde_json::json!({
                "round": round.round,
                "description": round.description,
                "responses": round.responses,
                "consensus": verdict.reached,
                "lowest_similarity": verdict.lowest_similarity,
            }),
        ));

        session.record_round(round)?;
        if verdict.reached {
            session.mark_consensus();
            info!("Consensus reached at round {}", k);
            self.transcript.log(TranscriptEvent::new(
                "consensus_reached",
                serde_json::json!({ "round": k }),
            ));
        }

        Ok(DebatePhase::after_round(k, verdict.reached, max_rounds))
    }

    /// Synthesis: full-history prompt, ordered fallback, finalize
    async fn run_synthesis(
        &self,
        session: &mut DebateSession,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<(), RunDebateError> {
        info!("Synthesis");
        progress.on_synthesis_start();

        let prompt = DebatePromptTemplate::synthesis_prompt(
            session.question().content(),
            &build_history(session.rounds()),
            session.consensus_reached(),
        );
        let synthesis = synthesize(&prompt, &self.registry).await;

        progress.on_synthesis_complete(synthesis.backend.as_deref());
        self.transcript.log(TranscriptEvent::new(
            "synthesis_completed",
            serde_json::json!({
                "backend": synthesis.backend,
                "final_answer": synthesis.answer,
                "consensus_reached": session.consensus_reached(),
                "total_rounds": session.total_rounds(),
            }),
        ));

        session.finalize(synthesis.answer, NO_SYNTHESIS_FALLBACK)?;
        Ok(())
    }
}

/// Similarity scoring is quadratic in text length, so it runs on the
/// blocking pool. A panicked scorer counts as no consensus.
async fn score_round(detector: ConsensusDetector, round: &Round) -> ConsensusVerdict {
    let responses = round.responses.clone();
    match tokio::task::spawn_blocking(move || detector.evaluate(&responses)).await {
        Ok(verdict) => verdict,
        Err(e) => {
            warn!("Round {} scoring aborted: {}", round.round, e);
            ConsensusVerdict {
                reached: false,
                lowest_similarity: None,
            }
        }
    }
}
