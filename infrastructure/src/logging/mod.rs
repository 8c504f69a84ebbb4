//! Logging infrastructure: structured debate transcripts.
//!
//! Provides [`JsonlTranscriptLogger`], a JSONL file writer that implements
//! the [`TranscriptLogger`](council_application::TranscriptLogger) port.

mod jsonl_transcript;

pub use jsonl_transcript::JsonlTranscriptLogger;
