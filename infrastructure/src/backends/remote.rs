//! Hosted vendor API adapter
//!
//! One adapter covers the four remote providers; only the request and
//! response bodies differ:
//!
//! | Provider  | Endpoint                                   | Auth header         |
//! |-----------|--------------------------------------------|---------------------|
//! | OpenAI    | `{base}/chat/completions`                  | `Authorization`     |
//! | xAI       | `{base}/chat/completions` (OpenAI format)  | `Authorization`     |
//! | Anthropic | `{base}/messages`                          | `x-api-key`         |
//! | Google    | `{base}/models/{model}:generateContent`    | `x-goog-api-key`    |

use super::{http_error, transport_error};
use async_trait::async_trait;
use council_application::{BackendError, TextBackend};
use council_domain::{BackendDescriptor, RemoteProvider};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_TEMPERATURE: f64 = 0.7;
/// HTTP client timeout for remote calls
pub const REMOTE_HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Resolved connection settings for one remote backend
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSettings {
    pub base_url: String,
    /// Environment variable read at call time
    pub api_key_env: String,
    /// Key given directly in config; wins over `api_key_env`
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl RemoteSettings {
    /// Vendor defaults for `provider`
    pub fn for_provider(provider: RemoteProvider) -> Self {
        let base_url = match provider {
            RemoteProvider::OpenAi => "https://api.openai.com/v1",
            RemoteProvider::Anthropic => "https://api.anthropic.com/v1",
            RemoteProvider::Google => "https://generativelanguage.googleapis.com/v1beta",
            RemoteProvider::Xai => "https://api.x.ai/v1",
        };
        Self {
            base_url: base_url.to_string(),
            api_key_env: provider.default_api_key_env().to_string(),
            api_key: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// The API key, looked up lazily so a missing key only fails its own calls
    fn resolve_api_key(&self) -> Result<String, BackendError> {
        if let Some(key) = self.api_key.as_deref().map(str::trim)
            && !key.is_empty()
        {
            return Ok(key.to_string());
        }
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(BackendError::MissingCredentials {
                env_var: self.api_key_env.clone(),
            }),
        }
    }
}

/// A backend bound to one hosted model
pub struct RemoteBackend {
    descriptor: BackendDescriptor,
    provider: RemoteProvider,
    settings: RemoteSettings,
    client: Client,
}

impl RemoteBackend {
    pub fn new(
        descriptor: BackendDescriptor,
        provider: RemoteProvider,
        settings: RemoteSettings,
        client: Client,
    ) -> Self {
        Self {
            descriptor,
            provider,
            settings,
            client,
        }
    }

    pub fn provider(&self) -> RemoteProvider {
        self.provider
    }

    fn model(&self) -> &str {
        self.descriptor.kind.model()
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap, BackendError> {
        let invalid_key = |_| BackendError::MissingCredentials {
            env_var: self.settings.api_key_env.clone(),
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        match self.provider {
            RemoteProvider::OpenAi | RemoteProvider::Xai => {
                let value = HeaderValue::from_str(&format!("Bearer {}", api_key))
                    .map_err(invalid_key)?;
                headers.insert(AUTHORIZATION, value);
            }
            RemoteProvider::Anthropic => {
                headers.insert("x-api-key", HeaderValue::from_str(api_key).map_err(invalid_key)?);
                headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
            }
            RemoteProvider::Google => {
                headers.insert(
                    "x-goog-api-key",
                    HeaderValue::from_str(api_key).map_err(invalid_key)?,
                );
            }
        }
        Ok(headers)
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        url: String,
        api_key: &str,
        body: &B,
    ) -> Result<R, BackendError> {
        let response = self
            .client
            .post(&url)
            .headers(self.headers(api_key)?)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(e, REMOTE_HTTP_TIMEOUT))?;

        if !response.status().is_success() {
            return Err(http_error(response).await);
        }

        response
            .json::<R>()
            .await
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))
    }

    async fn chat_completion(&self, api_key: &str, prompt: &str) -> Result<String, BackendError> {
        let body = ChatRequest {
            model: self.model(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };
        let response: ChatResponse = self
            .post(self.settings.endpoint("chat/completions"), api_key, &body)
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| BackendError::MalformedResponse("no choices in response".to_string()))
    }

    async fn anthropic_message(&self, api_key: &str, prompt: &str) -> Result<String, BackendError> {
        let body = MessagesRequest {
            model: self.model(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let response: MessagesResponse = self
            .post(self.settings.endpoint("messages"), api_key, &body)
            .await?;

        let text: String = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        if text.is_empty() {
            return Err(BackendError::MalformedResponse(
                "no text blocks in response".to_string(),
            ));
        }
        Ok(text)
    }

    async fn gemini_generate(&self, api_key: &str, prompt: &str) -> Result<String, BackendError> {
        let body = GenerateContentRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                max_output_tokens: self.settings.max_tokens,
            },
        };
        let path = format!("models/{}:generateContent", self.model());
        let response: GenerateContentResponse =
            self.post(self.settings.endpoint(&path), api_key, &body).await?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| {
                BackendError::MalformedResponse("no candidates in response".to_string())
            })
    }
}

#[async_trait]
impl TextBackend for RemoteBackend {
    fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let api_key = self.settings.resolve_api_key()?;
        debug!(
            "{} request to {} ({} chars)",
            self.provider.display_name(),
            self.model(),
            prompt.len()
        );

        match self.provider {
            RemoteProvider::OpenAi | RemoteProvider::Xai => {
                self.chat_completion(&api_key, prompt).await
            }
            RemoteProvider::Anthropic => self.anthropic_message(&api_key, prompt).await,
            RemoteProvider::Google => self.gemini_generate(&api_key, prompt).await,
        }
    }
}

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::BackendKind;
    use mockito::Matcher;

    fn backend(provider: RemoteProvider, model: &str, base_url: &str) -> RemoteBackend {
        let descriptor = BackendDescriptor::new(
            "test",
            "Test Backend",
            BackendKind::Remote {
                provider,
                model: model.to_string(),
            },
        );
        let settings = RemoteSettings::for_provider(provider)
            .with_base_url(base_url)
            .with_api_key("test-key");
        RemoteBackend::new(descriptor, provider, settings, Client::new())
    }

    #[test]
    fn test_provider_defaults() {
        let settings = RemoteSettings::for_provider(RemoteProvider::Xai);
        assert_eq!(settings.base_url, "https://api.x.ai/v1");
        assert_eq!(settings.api_key_env, "XAI_API_KEY");
        assert_eq!(settings.max_tokens, 1024);
        assert_eq!(
            settings.endpoint("chat/completions"),
            "https://api.x.ai/v1/chat/completions"
        );
    }

    #[test]
    fn test_missing_key_reported_with_env_var() {
        let mut settings = RemoteSettings::for_provider(RemoteProvider::OpenAi);
        settings.api_key_env = "COUNCIL_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        assert_eq!(
            settings.resolve_api_key(),
            Err(BackendError::MissingCredentials {
                env_var: "COUNCIL_TEST_KEY_THAT_IS_NEVER_SET".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_openai_chat_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "What is 2+2?"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"4"}}]}"#)
            .create_async()
            .await;

        let backend = backend(RemoteProvider::OpenAi, "gpt-4o-mini", &server.url());
        assert_eq!(backend.generate("What is 2+2?").await.unwrap(), "4");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_anthropic_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", "2023-06-01")
            .match_body(Matcher::PartialJson(serde_json::json!({"max_tokens": 1024})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content":[{"type":"text","text":"Four."}]}"#)
            .create_async()
            .await;

        let backend = backend(
            RemoteProvider::Anthropic,
            "claude-3-5-sonnet-20241022",
            &server.url(),
        );
        assert_eq!(backend.generate("2+2?").await.unwrap(), "Four.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_gemini_generate_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"4"}],"role":"model"}}]}"#)
            .create_async()
            .await;

        let backend = backend(RemoteProvider::Google, "gemini-1.5-flash", &server.url());
        assert_eq!(backend.generate("2+2?").await.unwrap(), "4");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let backend = backend(RemoteProvider::Xai, "grok-beta", &server.url());
        let err = backend.generate("hi").await.unwrap_err();
        assert_eq!(
            err,
            BackendError::Http {
                status: 429,
                body: "rate limited".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let backend = backend(RemoteProvider::OpenAi, "gpt-4o-mini", &server.url());
        assert!(matches!(
            backend.generate("hi").await,
            Err(BackendError::MalformedResponse(_))
        ));
    }
}
