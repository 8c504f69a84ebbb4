//! Debate entities: responses, rounds and the session that owns them.

use crate::backend::BackendId;
use crate::core::error::DomainError;
use crate::core::question::Question;
use serde::{Deserialize, Serialize};

/// One backend's output in one round (immutable once created)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Registry id of the backend that produced this response
    pub backend_id: BackendId,
    /// Display name of the backend
    #[serde(rename = "model")]
    pub backend_name: String,
    /// Generated text, or the explanatory error text when `error` is set
    #[serde(rename = "response")]
    pub text: String,
    /// Whether the backend call failed
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl Response {
    /// Creates a successful response.
    pub fn success(
        backend_id: BackendId,
        backend_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            backend_id,
            backend_name: backend_name.into(),
            text: text.into(),
            error: false,
        }
    }

    /// Creates an error-flagged response.
    ///
    /// The text reads `Error calling <backend>: <detail>` so it stays
    /// meaningful when shown to other backends in the next round.
    pub fn failure(
        backend_id: BackendId,
        backend_name: impl Into<String>,
        detail: impl std::fmt::Display,
    ) -> Self {
        let backend_name = backend_name.into();
        let text = format!("Error calling {}: {}", backend_name, detail);
        Self {
            backend_id,
            backend_name,
            text,
            error: true,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }
}

/// One exchange cycle: every backend's response to the same prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Round number, starting at 1
    pub round: u32,
    /// Short label such as "initial answers"
    pub description: String,
    /// One response per backend, in registry order
    pub responses: Vec<Response>,
}

impl Round {
    pub fn new(round: u32, description: impl Into<String>, responses: Vec<Response>) -> Self {
        Self {
            round,
            description: description.into(),
            responses,
        }
    }

    /// Description used for round `number`
    pub fn describe(number: u32) -> String {
        if number <= 1 {
            "initial answers".to_string()
        } else {
            "critique and refinement".to_string()
        }
    }

    pub fn error_count(&self) -> usize {
        self.responses.iter().filter(|r| r.error).count()
    }
}

/// The full run from question to final answer (Entity)
///
/// Only the orchestrator mutates a session; the methods here enforce the
/// history invariants so a broken sequence cannot be recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateSession {
    question: Question,
    debate_history: Vec<Round>,
    consensus_reached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    consensus_round: Option<u32>,
    total_rounds: u32,
    final_answer: String,
}

impl DebateSession {
    pub fn new(question: Question) -> Self {
        Self {
            question,
            debate_history: Vec::new(),
            consensus_reached: false,
            consensus_round: None,
            total_rounds: 0,
            final_answer: String::new(),
        }
    }

    /// Append the next round.
    ///
    /// Rejects empty rounds and any number other than `total_rounds + 1`.
    pub fn record_round(&mut self, round: Round) -> Result<(), DomainError> {
        if self.is_finalized() {
            return Err(DomainError::AlreadyFinalized);
        }
        let expected = self.total_rounds + 1;
        if round.round != expected {
            return Err(DomainError::RoundOutOfOrder {
                expected,
                got: round.round,
            });
        }
        if round.responses.is_empty() {
            return Err(DomainError::EmptyRound(round.round));
        }
        self.debate_history.push(round);
        self.total_rounds = expected;
        Ok(())
    }

    /// Mark the latest round as converged. Later calls are ignored.
    pub fn mark_consensus(&mut self) {
        if self.consensus_reached || self.total_rounds == 0 {
            return;
        }
        self.consensus_reached = true;
        self.consensus_round = Some(self.total_rounds);
    }

    /// Set the final answer once.
    ///
    /// A blank answer is replaced by `fallback`, so a finalized session
    /// never carries an empty `final_answer`.
    pub fn finalize(
        &mut self,
        final_answer: impl Into<String>,
        fallback: &str,
    ) -> Result<(), DomainError> {
        if self.is_finalized() {
            return Err(DomainError::AlreadyFinalized);
        }
        let answer = final_answer.into();
        self.final_answer = if answer.trim().is_empty() {
            fallback.to_string()
        } else {
            answer
        };
        Ok(())
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn rounds(&self) -> &[Round] {
        &self.debate_history
    }

    pub fn last_round(&self) -> Option<&Round> {
        self.debate_history.last()
    }

    pub fn consensus_reached(&self) -> bool {
        self.consensus_reached
    }

    pub fn consensus_round(&self) -> Option<u32> {
        self.consensus_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn final_answer(&self) -> &str {
        &self.final_answer
    }

    pub fn is_finalized(&self) -> bool {
        !self.final_answer.is_empty()
    }
}
