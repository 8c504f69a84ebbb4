//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use council_domain::ConfigIssue;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "debate-council";
const PROJECT_FILES: [&str; 2] = ["council.toml", ".council.toml"];
const ENV_PREFIX: &str = "COUNCIL_";

/// Errors raised while loading or applying configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("invalid configuration:\n{}", format_issues(.0))]
    Invalid(Vec<ConfigIssue>),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  - {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `COUNCIL_*` with `__` between sections, plus `OLLAMA_ONLY`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./council.toml` or `./.council.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/debate-council/config.toml`
    /// 5. Default values
    ///
    /// Command-line flags are applied on top by the binary.
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        let mut config: FileConfig = Self::figment(config_path)
            .extract()
            .map_err(Box::new)?;

        if env_flag("OLLAMA_ONLY") {
            config.debate.ollama_only = true;
        }
        Ok(config)
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Load and reject configurations with error-severity issues.
    ///
    /// Returns the config together with its warnings.
    pub fn load_validated(
        config_path: Option<&Path>,
    ) -> Result<(FileConfig, Vec<ConfigIssue>), ConfigError> {
        let config = Self::load(config_path)?;
        let (errors, warnings): (Vec<_>, Vec<_>) =
            config.validate().into_iter().partition(ConfigIssue::is_error);
        if !errors.is_empty() {
            return Err(ConfigError::Invalid(errors));
        }
        Ok((config, warnings))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/debate-council/config.toml if set,
    /// otherwise falls back to ~/.config/debate-council/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        let env_vars: Vec<String> = std::env::vars()
            .map(|(k, _)| k)
            .filter(|k| k.starts_with(ENV_PREFIX) || k == "OLLAMA_ONLY")
            .collect();
        if env_vars.is_empty() {
            println!("  [     ] Env:     {}* (none set)", ENV_PREFIX);
        } else {
            println!("  [FOUND] Env:     {}", env_vars.join(", "));
        }

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./council.toml or ./.council.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [FOUND] Default: built-in defaults");
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::ConfigIssueCode;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.backends.len(), 4);
        assert_eq!(config.debate.max_rounds, 3);
        assert!(!config.debate.ollama_only);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("debate-council"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let file = write_config(
            r#"
[debate]
max_rounds = 5
rule = "majority"

[[backends]]
provider = "ollama"
model = "llama3:8b"
mode = "ollama"
"#,
        );

        let config: FileConfig = ConfigLoader::figment(Some(file.path())).extract().unwrap();
        assert_eq!(config.debate.max_rounds, 5);
        assert_eq!(config.debate.rule, "majority");
        // untouched keys keep their defaults
        assert_eq!(config.debate.consensus_threshold, 0.85);
        // arrays replace rather than append
        assert_eq!(config.backends.len(), 1);
        assert!(config.backends[0].is_ollama());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let file = write_config(
            r#"
[debate]
consensus_threshold = 2.0
"#,
        );

        match ConfigLoader::load_validated(Some(file.path())) {
            Err(ConfigError::Invalid(issues)) => {
                assert!(
                    issues
                        .iter()
                        .any(|i| i.code == ConfigIssueCode::ThresholdOutOfRange)
                );
            }
            other => panic!("expected invalid config, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_malformed_toml_is_a_figment_error() {
        let file = write_config("[debate\nmax_rounds = ");
        let err = ConfigLoader::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
    }
}
