//! Backend identity.
//!
//! A backend is one pluggable text-generation agent. The domain only knows
//! who it is ([`BackendDescriptor`]); how it talks to its provider lives in
//! the infrastructure layer behind the application's `TextBackend` port.

pub mod recommend;

use serde::{Deserialize, Serialize};

/// Stable identifier for a backend within one registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendId(String);

impl BackendId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BackendId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BackendId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Remote API providers a backend can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteProvider {
    OpenAi,
    Anthropic,
    Google,
    Xai,
}

impl RemoteProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteProvider::OpenAi => "openai",
            RemoteProvider::Anthropic => "anthropic",
            RemoteProvider::Google => "google",
            RemoteProvider::Xai => "xai",
        }
    }

    /// Human-readable vendor label used in error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            RemoteProvider::OpenAi => "OpenAI",
            RemoteProvider::Anthropic => "Anthropic",
            RemoteProvider::Google => "Gemini",
            RemoteProvider::Xai => "Grok",
        }
    }

    /// Environment variable holding the API key by default
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            RemoteProvider::OpenAi => "OPENAI_API_KEY",
            RemoteProvider::Anthropic => "ANTHROPIC_API_KEY",
            RemoteProvider::Google => "GOOGLE_API_KEY",
            RemoteProvider::Xai => "XAI_API_KEY",
        }
    }
}

impl std::fmt::Display for RemoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RemoteProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(RemoteProvider::OpenAi),
            "anthropic" => Ok(RemoteProvider::Anthropic),
            "google" | "gemini" => Ok(RemoteProvider::Google),
            "xai" | "grok" => Ok(RemoteProvider::Xai),
            other => Err(format!(
                "Unknown provider: {}. Valid: openai, anthropic, google, xai, ollama",
                other
            )),
        }
    }
}

/// The closed set of backend variants
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BackendKind {
    /// A hosted vendor API reached over HTTPS
    Remote {
        provider: RemoteProvider,
        model: String,
    },
    /// A model served by a local Ollama daemon
    Ollama { model: String },
}

impl BackendKind {
    pub fn model(&self) -> &str {
        match self {
            BackendKind::Remote { model, .. } | BackendKind::Ollama { model } => model,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, BackendKind::Ollama { .. })
    }

    /// Provider label (`openai`, `ollama`, ...)
    pub fn provider_label(&self) -> &'static str {
        match self {
            BackendKind::Remote { provider, .. } => provider.as_str(),
            BackendKind::Ollama { .. } => "ollama",
        }
    }
}

/// Who a backend is: id, display name and variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendDescriptor {
    pub id: BackendId,
    pub name: String,
    pub kind: BackendKind,
}

impl BackendDescriptor {
    pub fn new(id: impl Into<BackendId>, name: impl Into<String>, kind: BackendKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

impl From<String> for BackendId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
