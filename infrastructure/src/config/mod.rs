//! Configuration file loading for debate-council
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `COUNCIL_*` environment variables (and `OLLAMA_ONLY`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./council.toml` or `./.council.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/debate-council/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileBackendConfig, FileConfig, FileDebateConfig, FileLoggingConfig, FileOllamaConfig,
    FileOutputConfig, FileOutputFormat, FileProvidersConfig, FileRemoteProviderConfig,
};
pub use loader::{ConfigError, ConfigLoader};
