//! Builds the ordered backend list from configuration

use super::ollama::{OllamaBackend, OllamaClient};
use super::remote::{REMOTE_HTTP_TIMEOUT, RemoteBackend, RemoteSettings};
use super::http_client;
use crate::config::{ConfigError, FileBackendConfig, FileConfig};
use council_application::TextBackend;
use council_domain::{BackendDescriptor, BackendKind, RemoteProvider};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Creates `TextBackend` adapters for the configured `[[backends]]`
pub struct BackendFactory<'a> {
    config: &'a FileConfig,
}

impl<'a> BackendFactory<'a> {
    pub fn new(config: &'a FileConfig) -> Self {
        Self { config }
    }

    /// Ollama client built from `[providers.ollama]`
    pub fn ollama_client(&self) -> Result<OllamaClient, ConfigError> {
        let ollama = &self.config.providers.ollama;
        OllamaClient::new(
            &ollama.base_url,
            Duration::from_secs(ollama.timeout_secs.max(1)),
            ollama.temperature,
        )
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
    }

    /// Connection settings for one remote backend.
    ///
    /// Per-backend `base_url`/`api_key_env` override `[providers.<name>]`,
    /// which overrides the vendor defaults.
    pub fn remote_settings(
        &self,
        provider: RemoteProvider,
        entry: &FileBackendConfig,
    ) -> RemoteSettings {
        let overrides = self.config.providers.remote(provider);
        let mut settings = RemoteSettings::for_provider(provider);

        if let Some(url) = entry.base_url.as_ref().or(overrides.base_url.as_ref()) {
            settings.base_url = url.clone();
        }
        if let Some(env) = entry.api_key_env.as_ref().or(overrides.api_key_env.as_ref()) {
            settings.api_key_env = env.clone();
        }
        settings.api_key = overrides.api_key.clone();
        if let Some(max_tokens) = overrides.max_tokens {
            settings.max_tokens = max_tokens;
        }
        if let Some(temperature) = overrides.temperature {
            settings.temperature = temperature;
        }
        settings
    }

    /// Selected Ollama models the daemon does not have installed.
    ///
    /// An unreachable daemon yields an empty list; each call then reports
    /// the failure as an error response.
    pub async fn missing_ollama_models(
        &self,
        ollama_only: bool,
        names: &[String],
    ) -> Result<Vec<String>, ConfigError> {
        let models: Vec<&str> = self
            .config
            .selected_backends(ollama_only, names)
            .into_iter()
            .filter(|b| b.is_ollama())
            .map(|b| b.model.as_str())
            .collect();
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let client = self.ollama_client()?;
        let mut missing = Vec::new();
        for model in models {
            match client.has_model(model).await {
                Ok(true) => {}
                Ok(false) => missing.push(model.to_string()),
                Err(e) => {
                    debug!("Skipping Ollama model check at {}: {}", client.base_url(), e);
                    return Ok(Vec::new());
                }
            }
        }
        Ok(missing)
    }

    /// Build adapters for the selected backends, in configured order.
    ///
    /// Entries that fail to parse are skipped with a warning; validation
    /// reports them as errors before this point in normal startup.
    pub fn build(
        &self,
        ollama_only: bool,
        names: &[String],
    ) -> Result<Vec<Arc<dyn TextBackend>>, ConfigError> {
        let selected = self.config.selected_backends(ollama_only, names);
        for name in names {
            if !selected
                .iter()
                .any(|b| b.display_name().eq_ignore_ascii_case(name))
            {
                warn!("No configured backend named '{}'", name);
            }
        }

        let mut remote_client: Option<Client> = None;
        let mut ollama_client: Option<OllamaClient> = None;
        let mut backends: Vec<Arc<dyn TextBackend>> = Vec::with_capacity(selected.len());

        for entry in selected {
            let descriptor: BackendDescriptor = match entry.parse() {
                Ok(d) => d,
                Err(issue) => {
                    warn!("Skipping backend: {}", issue.message);
                    continue;
                }
            };

            let backend: Arc<dyn TextBackend> = match descriptor.kind.clone() {
                BackendKind::Remote { provider, .. } => {
                    let client = match &remote_client {
                        Some(c) => c.clone(),
                        None => {
                            let c = http_client(REMOTE_HTTP_TIMEOUT)
                                .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
                            remote_client = Some(c.clone());
                            c
                        }
                    };
                    let settings = self.remote_settings(provider, entry);
                    Arc::new(RemoteBackend::new(descriptor, provider, settings, client))
                }
                BackendKind::Ollama { .. } => {
                    let client = match &ollama_client {
                        Some(c) => c.clone(),
                        None => {
                            let c = self.ollama_client()?;
                            ollama_client = Some(c.clone());
                            c
                        }
                    };
                    Arc::new(OllamaBackend::new(descriptor, client))
                }
            };

            debug!(
                "Registered backend {} ({})",
                backend.name(),
                backend.kind().provider_label()
            );
            backends.push(backend);
        }

        Ok(backends)
    }
}
