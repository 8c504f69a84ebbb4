//! Backend adapters implementing the `TextBackend` port
//!
//! - [`remote::RemoteBackend`] - hosted vendor APIs (OpenAI, Anthropic, Gemini, xAI)
//! - [`ollama::OllamaBackend`] - models served by a local Ollama daemon
//! - [`factory::BackendFactory`] - builds the ordered backend list from config

pub mod factory;
pub mod ollama;
pub mod remote;

use council_application::BackendError;
use reqwest::Client;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Shared HTTP client for one provider family
pub(crate) fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(2)
        .build()
}

/// Map a reqwest failure onto the port's error type
pub(crate) fn transport_error(err: reqwest::Error, timeout: Duration) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout(timeout)
    } else if err.is_decode() {
        BackendError::MalformedResponse(err.to_string())
    } else {
        BackendError::Transport(err.to_string())
    }
}

/// Longest error body kept in an `Http` error
const MAX_ERROR_BODY: usize = 500;

/// Read a non-success response into `BackendError::Http`
pub(crate) async fn http_error(response: reqwest::Response) -> BackendError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    BackendError::Http {
        status,
        body: council_domain::preview(body.trim(), MAX_ERROR_BODY),
    }
}

pub use factory::BackendFactory;
pub use ollama::{OllamaBackend, OllamaClient};
pub use remote::{RemoteBackend, RemoteSettings};
