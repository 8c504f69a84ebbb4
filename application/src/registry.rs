//! Backend registry
//!
//! Owns the ordered backend list for a session and runs the concurrent
//! fan-out that every round is built on.

use crate::ports::backend::{BackendError, TextBackend};
use council_domain::{BackendDescriptor, Response};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised by the registry itself (never by a backend call)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("No backends configured")]
    NoBackends,

    #[error("No backend at index {0}")]
    UnknownBackend(usize),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Ordered, immutable set of backends plus the per-call timeout
pub struct BackendRegistry {
    backends: Vec<Arc<dyn TextBackend>>,
    call_timeout: Duration,
}

impl BackendRegistry {
    pub fn new(backends: Vec<Arc<dyn TextBackend>>, call_timeout: Duration) -> Self {
        Self {
            backends,
            call_timeout,
        }
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    pub fn backends(&self) -> &[Arc<dyn TextBackend>] {
        &self.backends
    }

    pub fn descriptors(&self) -> Vec<BackendDescriptor> {
        self.backends.iter().map(|b| b.descriptor().clone()).collect()
    }

    /// Send `prompt` to every backend concurrently and wait for all of them.
    pub async fn fan_out(&self, prompt: &str) -> Result<Vec<Response>, RegistryError> {
        self.fan_out_observed(prompt, |_| {}).await
    }

    /// Like [`fan_out`](Self::fan_out), calling `observe` as each backend
    /// finishes (completion order). The returned list is in registry order.
    pub async fn fan_out_observed<F>(
        &self,
        prompt: &str,
        mut observe: F,
    ) -> Result<Vec<Response>, RegistryError>
    where
        F: FnMut(&Response),
    {
        if self.backends.is_empty() {
            return Err(RegistryError::NoBackends);
        }

        let mut pending: FuturesUnordered<_> = self
            .backends
            .iter()
            .enumerate()
            .map(|(index, backend)| {
                let backend = Arc::clone(backend);
                let prompt = prompt.to_string();
                let timeout = self.call_timeout;
                let handle =
                    tokio::spawn(async move { timed_generate(backend.as_ref(), &prompt, timeout).await });
                async move { (index, handle.await) }
            })
            .collect();

        let mut slots: Vec<Option<Response>> = vec![None; self.backends.len()];

        while let Some((index, joined)) = pending.next().await {
            let backend = &self.backends[index];
            let response = match joined {
                Ok(Ok(text)) => {
                    debug!("Backend {} responded ({} chars)", backend.name(), text.len());
                    Response::success(backend.id().clone(), backend.name(), text)
                }
                Ok(Err(e)) => {
                    warn!("Backend {} failed: {}", backend.name(), e);
                    Response::failure(backend.id().clone(), backend.name(), e)
                }
                Err(e) => {
                    warn!("Backend {} task aborted: {}", backend.name(), e);
                    Response::failure(
                        backend.id().clone(),
                        backend.name(),
                        format!("task aborted: {}", e),
                    )
                }
            };
            observe(&response);
            slots[index] = Some(response);
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// One timed call to the backend at `index`
    pub async fn call(&self, index: usize, prompt: &str) -> Result<String, RegistryError> {
        let backend = self
            .backends
            .get(index)
            .ok_or(RegistryError::UnknownBackend(index))?;
        Ok(timed_generate(backend.as_ref(), prompt, self.call_timeout).await?)
    }
}

async fn timed_generate(
    backend: &dyn TextBackend,
    prompt: &str,
    timeout: Duration,
) -> Result<String, BackendError> {
    debug!("Calling backend {}", backend.name());
    tokio::time::timeout(timeout, backend.generate(prompt))
        .await
        .map_err(|_| BackendError::Timeout(timeout))?
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted backends shared by the application tests.

    use super::*;
    use async_trait::async_trait;
    use council_domain::{BackendKind, RemoteProvider};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone)]
    pub enum Reply {
        Text(String),
        Fail(BackendError),
        Panic,
    }

    /// Backend replaying a script; the last entry repeats forever
    pub struct ScriptedBackend {
        descriptor: BackendDescriptor,
        delay: Duration,
        script: Mutex<VecDeque<Reply>>,
        last: Mutex<Option<Reply>>,
        pub prompts: Mutex<Vec<String>>,
        pub calls: AtomicUsize,
    }

    impl ScriptedBackend {
        pub fn new(name: &str, script: Vec<Reply>) -> Self {
            Self {
                descriptor: BackendDescriptor::new(
                    name.to_lowercase(),
                    name,
                    BackendKind::Remote {
                        provider: RemoteProvider::OpenAi,
                        model: "scripted".to_string(),
                    },
                ),
                delay: Duration::ZERO,
                script: Mutex::new(script.into()),
                last: Mutex::new(None),
                prompts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn always(name: &str, text: &str) -> Self {
            Self::new(name, vec![Reply::Text(text.to_string())])
        }

        pub fn failing(name: &str) -> Self {
            Self::new(
                name,
                vec![Reply::Fail(BackendError::Transport("connection refused".into()))],
            )
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn next_reply(&self) -> Option<Reply> {
            let mut script = self.script.lock().unwrap();
            let mut last = self.last.lock().unwrap();
            if let Some(reply) = script.pop_front() {
                *last = Some(reply.clone());
            }
            last.clone()
        }
    }

    #[async_trait]
    impl TextBackend for ScriptedBackend {
        fn descriptor(&self) -> &BackendDescriptor {
            &self.descriptor
        }

        async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.next_reply() {
                Some(Reply::Text(text)) => Ok(text),
                Some(Reply::Fail(e)) => Err(e),
                Some(Reply::Panic) => panic!("scripted panic"),
                None => Err(BackendError::MalformedResponse("empty script".into())),
            }
        }
    }

    pub fn scripted_registry(backends: Vec<Arc<ScriptedBackend>>) -> BackendRegistry {
        let backends = backends
            .into_iter()
            .map(|b| b as Arc<dyn TextBackend>)
            .collect();
        BackendRegistry::new(backends, Duration::from_secs(30))
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[tokio::test]
    async fn test_empty_registry_fails_fast() {
        let registry = BackendRegistry::new(vec![], Duration::from_secs(1));
        assert_eq!(registry.fan_out("q").await, Err(RegistryError::NoBackends));
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_preserved_regardless_of_completion() {
        let slow = Arc::new(ScriptedBackend::always("Slow", "slow").with_delay(Duration::from_secs(5)));
        let fast = Arc::new(ScriptedBackend::always("Fast", "fast"));
        let mid = Arc::new(ScriptedBackend::always("Mid", "mid").with_delay(Duration::from_secs(1)));
        let registry = scripted_registry(vec![slow, fast, mid]);

        let mut completion = Vec::new();
        let responses = registry
            .fan_out_observed("q", |r| completion.push(r.backend_name.clone()))
            .await
            .unwrap();

        let order: Vec<_> = responses.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(order, vec!["slow", "fast", "mid"]);
        assert_eq!(completion, vec!["Fast", "Mid", "Slow"]);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let ok = Arc::new(ScriptedBackend::always("Good", "4"));
        let bad = Arc::new(ScriptedBackend::failing("Bad"));
        let registry = scripted_registry(vec![ok, bad]);

        let responses = registry.fan_out("q").await.unwrap();
        assert_eq!(responses.len(), 2);
        assert!(!responses[0].error);
        assert!(responses[1].error);
        assert_eq!(
            responses[1].text,
            "Error calling Bad: transport error: connection refused"
        );
    }

    #[tokio::test]
    async fn test_panicking_backend_becomes_error_response() {
        let ok = Arc::new(ScriptedBackend::always("Good", "4"));
        let boom = Arc::new(ScriptedBackend::new("Boom", vec![Reply::Panic]));
        let registry = scripted_registry(vec![boom, ok]);

        let responses = registry.fan_out("q").await.unwrap();
        assert_eq!(responses.len(), 2);
        assert!(responses[0].error);
        assert!(responses[0].text.starts_with("Error calling Boom: task aborted"));
        assert_eq!(responses[1].text, "4");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_error_response() {
        let hung = Arc::new(ScriptedBackend::always("Hung", "late").with_delay(Duration::from_secs(600)));
        let ok = Arc::new(ScriptedBackend::always("Good", "4"));
        let registry = BackendRegistry::new(
            vec![hung as Arc<dyn TextBackend>, ok as Arc<dyn TextBackend>],
            Duration::from_secs(2),
        );

        let responses = registry.fan_out("q").await.unwrap();
        assert!(responses[0].error);
        assert!(responses[0].text.contains("timed out"));
        assert!(!responses[1].error);
    }

    #[tokio::test]
    async fn test_call_by_index() {
        let a = Arc::new(ScriptedBackend::always("A", "from a"));
        let b = Arc::new(ScriptedBackend::failing("B"));
        let registry = scripted_registry(vec![a, b]);

        assert_eq!(registry.call(0, "q").await.unwrap(), "from a");
        assert!(matches!(
            registry.call(1, "q").await,
            Err(RegistryError::Backend(BackendError::Transport(_)))
        ));
        assert_eq!(
            registry.call(2, "q").await,
            Err(RegistryError::UnknownBackend(2))
        );
    }
}
