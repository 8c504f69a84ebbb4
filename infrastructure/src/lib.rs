//! Infrastructure layer for debate-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: HTTP backends for hosted APIs and Ollama,
//! configuration file loading, and the JSONL transcript writer.

pub mod backends;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use backends::{
    BackendFactory, OllamaBackend, OllamaClient, RemoteBackend, RemoteSettings,
};
pub use config::{
    ConfigError, ConfigLoader, FileBackendConfig, FileConfig, FileDebateConfig,
    FileLoggingConfig, FileOllamaConfig, FileOutputConfig, FileOutputFormat, FileProvidersConfig,
    FileRemoteProviderConfig,
};
pub use logging::JsonlTranscriptLogger;
