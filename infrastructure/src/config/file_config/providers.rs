//! Provider configuration from TOML (`[providers]` section)
//!
//! Every field is optional; unset fields fall back to the provider's own
//! defaults when a backend is built.

use council_domain::RemoteProvider;
use serde::{Deserialize, Serialize};

/// Overrides shared by every backend of one hosted provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRemoteProviderConfig {
    /// Base URL for the provider API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Environment variable name for the API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Direct API key (not recommended; use the env var instead).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Max tokens per response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Local Ollama daemon configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    /// Base URL of the Ollama HTTP API.
    pub base_url: String,
    /// HTTP timeout for a single generation in seconds.
    pub timeout_secs: u64,
    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            timeout_secs: 120,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub openai: FileRemoteProviderConfig,
    pub anthropic: FileRemoteProviderConfig,
    pub google: FileRemoteProviderConfig,
    pub xai: FileRemoteProviderConfig,
    pub ollama: FileOllamaConfig,
}

impl FileProvidersConfig {
    pub fn remote(&self, provider: RemoteProvider) -> &FileRemoteProviderConfig {
        match provider {
            RemoteProvider::OpenAi => &self.openai,
            RemoteProvider::Anthropic => &self.anthropic,
            RemoteProvider::Google => &self.google,
            RemoteProvider::Xai => &self.xai,
        }
    }
}
