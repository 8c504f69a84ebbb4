//! Text backend port
//!
//! Defines the single capability every debate participant offers:
//! turn a prompt into text.

use async_trait::async_trait;
use council_domain::{BackendDescriptor, BackendId, BackendKind};
use std::time::Duration;
use thiserror::Error;

/// Errors a single backend call can produce
///
/// These never abort a round: the registry turns them into error-flagged
/// responses.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("missing credentials: environment variable {env_var} is not set")]
    MissingCredentials { env_var: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("model '{model}' not found. Run: ollama pull {model}")]
    ModelNotFound { model: String },
}

/// A pluggable text-generation agent
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Identity of this backend
    fn descriptor(&self) -> &BackendDescriptor;

    fn id(&self) -> &BackendId {
        &self.descriptor().id
    }

    fn name(&self) -> &str {
        &self.descriptor().name
    }

    fn kind(&self) -> &BackendKind {
        &self.descriptor().kind
    }

    /// Generate text for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}
