//! Application layer for debate-council
//!
//! This crate contains the backend registry, the debate use case, and the
//! port definitions adapters implement. It depends only on the domain layer.

pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    backend::{BackendError, TextBackend},
    progress::{DebateProgressNotifier, NoProgress},
    transcript::{NoTranscript, TranscriptEvent, TranscriptLogger},
};
pub use registry::{BackendRegistry, RegistryError};
pub use use_cases::run_debate::{RunDebateError, RunDebateInput, RunDebateUseCase};
pub use use_cases::synthesize::{NO_SYNTHESIS_FALLBACK, Synthesis, synthesize};
