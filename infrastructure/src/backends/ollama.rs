//! Local Ollama adapter
//!
//! Generation goes through `POST /api/generate` with streaming disabled;
//! installed models are listed through `GET /api/tags`.

use super::{http_client, http_error, transport_error};
use async_trait::async_trait;
use council_application::{BackendError, TextBackend};
use council_domain::BackendDescriptor;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const LIST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for one Ollama daemon, shared by every local backend
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    temperature: f64,
    timeout: Duration,
    client: Client,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        temperature: f64,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            temperature,
            timeout,
            client: http_client(timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run one non-streaming generation
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, BackendError> {
        let body = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::ModelNotFound {
                model: model.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        Ok(parsed.response)
    }

    /// Names of the models installed on the daemon
    pub async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(LIST_TIMEOUT)
            .send()
            .await
            .map_err(|e| transport_error(e, LIST_TIMEOUT))?;

        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether the daemon answers at all
    pub async fn is_available(&self) -> bool {
        match self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Ollama connection failed at {}: {}", self.base_url, e);
                false
            }
        }
    }

    /// Whether `model` is installed; `llama3.1` matches `llama3.1:latest`
    pub async fn has_model(&self, model: &str) -> Result<bool, BackendError> {
        let installed = self.list_models().await?;
        let tagged = format!("{}:", model);
        Ok(installed
            .iter()
            .any(|m| m == model || m.starts_with(&tagged)))
    }
}

/// A backend served by the local Ollama daemon
pub struct OllamaBackend {
    descriptor: BackendDescriptor,
    client: OllamaClient,
}

impl OllamaBackend {
    pub fn new(descriptor: BackendDescriptor, client: OllamaClient) -> Self {
        Self { descriptor, client }
    }
}

#[async_trait]
impl TextBackend for OllamaBackend {
    fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let model = self.descriptor.kind.model();
        debug!("Ollama request to {} ({} chars)", model, prompt.len());
        self.client.generate(model, prompt).await
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::BackendKind;
    use mockito::Matcher;

    fn client(url: &str) -> OllamaClient {
        OllamaClient::new(url, Duration::from_secs(5), 0.7).unwrap()
    }

    fn backend(url: &str, model: &str) -> OllamaBackend {
        let descriptor = BackendDescriptor::new(
            "local",
            "Local",
            BackendKind::Ollama {
                model: model.to_string(),
            },
        );
        OllamaBackend::new(descriptor, client(url))
    }

    #[tokio::test]
    async fn test_generate_non_streaming() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "llama3:8b",
                "prompt": "What is 2+2?",
                "stream": false,
                "options": {"temperature": 0.7}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"model":"llama3:8b","response":"4","done":true}"#)
            .create_async()
            .await;

        let backend = backend(&server.url(), "llama3:8b");
        assert_eq!(backend.generate("What is 2+2?").await.unwrap(), "4");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_model_maps_to_pull_hint() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(404)
            .with_body(r#"{"error":"model 'phi3' not found"}"#)
            .create_async()
            .await;

        let err = backend(&server.url(), "phi3").generate("hi").await.unwrap_err();
        assert_eq!(
            err,
            BackendError::ModelNotFound {
                model: "phi3".to_string()
            }
        );
        assert!(err.to_string().contains("ollama pull phi3"));
    }

    #[tokio::test]
    async fn test_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/generate")
            .with_status(500)
            .with_body("out of memory")
            .create_async()
            .await;

        let err = backend(&server.url(), "llama3").generate("hi").await.unwrap_err();
        assert!(matches!(err, BackendError::Http { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_list_models() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"models":[{"name":"llama3.1:latest"},{"name":"mistral:7b"}]}"#)
            .expect_at_least(1)
            .create_async()
            .await;

        let client = client(&server.url());
        assert_eq!(
            client.list_models().await.unwrap(),
            vec!["llama3.1:latest", "mistral:7b"]
        );
        assert!(client.is_available().await);
        assert!(client.has_model("llama3.1").await.unwrap());
        assert!(!client.has_model("llama3").await.unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_daemon() {
        // Nothing listens on port 9 (discard) in test environments
        let client = client("http://127.0.0.1:9");
        assert!(!client.is_available().await);
        assert!(matches!(
            client.list_models().await,
            Err(BackendError::Transport(_)) | Err(BackendError::Timeout(_))
        ));
    }
}
