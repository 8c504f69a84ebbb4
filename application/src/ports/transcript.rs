//! Port for structured debate transcripts.
//!
//! Defines the [`TranscriptLogger`] trait for recording debate events
//! (session start, each round, consensus, synthesis) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! debate in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured debate event for logging.
pub struct TranscriptEvent {
    /// Event type identifier (e.g., "session_started", "round_completed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl TranscriptEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging debate events to a structured log.
///
/// `log` is synchronous and non-fallible; implementations swallow write
/// failures so the debate itself is never interrupted.
pub trait TranscriptLogger: Send + Sync {
    fn log(&self, event: TranscriptEvent);
}

/// No-op implementation for tests and when transcripts are disabled.
pub struct NoTranscript;

impl TranscriptLogger for NoTranscript {
    fn log(&self, _event: TranscriptEvent) {}
}
