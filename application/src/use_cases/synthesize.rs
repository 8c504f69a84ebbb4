//! Synthesis stage
//!
//! Produces the single final answer once the round loop has stopped.

use crate::registry::BackendRegistry;
use serde::Serialize;
use tracing::{info, warn};

/// Answer used when no backend manages to synthesize
pub const NO_SYNTHESIS_FALLBACK: &str = "No synthesis available - review round history.";

/// The final answer and the backend that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Synthesis {
    pub answer: String,
    /// `None` when every backend failed and the fallback was used
    pub backend: Option<String>,
}

impl Synthesis {
    pub fn fallback() -> Self {
        Self {
            answer: NO_SYNTHESIS_FALLBACK.to_string(),
            backend: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.backend.is_none()
    }
}

/// Ask backends in registry order until one returns a non-blank answer.
///
/// Never fails: if every backend errors (or the registry is empty) the
/// fixed fallback text is returned.
pub async fn synthesize(prompt: &str, registry: &BackendRegistry) -> Synthesis {
    for (index, backend) in registry.backends().iter().enumerate() {
        match registry.call(index, prompt).await {
            Ok(text) if !text.trim().is_empty() => {
                info!("Synthesis produced by {}", backend.name());
                return Synthesis {
                    answer: text,
                    backend: Some(backend.name().to_string()),
                };
            }
            Ok(_) => warn!("{} returned an empty synthesis", backend.name()),
            Err(e) => warn!("{} failed to synthesize: {}", backend.name(), e),
        }
    }

    warn!("No backend could synthesize; using fallback answer");
    Synthesis::fallback()
}
