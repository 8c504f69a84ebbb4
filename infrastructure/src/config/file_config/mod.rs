//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod backends;
mod debate;
mod output;
mod providers;

pub use backends::FileBackendConfig;
pub use debate::FileDebateConfig;
pub use output::{FileLoggingConfig, FileOutputConfig, FileOutputFormat};
pub use providers::{FileOllamaConfig, FileProvidersConfig, FileRemoteProviderConfig};

use council_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Round and consensus settings
    pub debate: FileDebateConfig,
    /// Participating backends, in registry order
    pub backends: Vec<FileBackendConfig>,
    /// Per-provider connection settings
    pub providers: FileProvidersConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log file and transcript locations
    pub logging: FileLoggingConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            debate: FileDebateConfig::default(),
            backends: FileBackendConfig::defaults(),
            providers: FileProvidersConfig::default(),
            output: FileOutputConfig::default(),
            logging: FileLoggingConfig::default(),
        }
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks:
    /// 1. `[debate]` values (rule, round bounds, threshold, agreement ratio)
    /// 2. Each backend's provider and mode
    /// 3. Duplicate backend ids (names that slug to the same id)
    /// 4. An empty backend list
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.debate.to_debate_config().1;

        let mut seen = HashSet::new();
        for backend in &self.backends {
            if let Err(issue) = backend.parse() {
                issues.push(issue);
            }
            let id = backend.id();
            if !id.is_empty() && !seen.insert(id.clone()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateBackendName,
                    format!(
                        "backend name '{}' clashes with another backend (id '{}')",
                        backend.display_name(),
                        id
                    ),
                ));
            }
        }

        if self.backends.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyBackendList,
                "no [[backends]] configured",
            ));
        }

        issues
    }

    /// Backends that take part in a session, in configured order.
    ///
    /// `ollama_only` drops every non-local backend; a non-empty `names`
    /// keeps only backends whose display name matches (case-insensitive).
    pub fn selected_backends(&self, ollama_only: bool, names: &[String]) -> Vec<&FileBackendConfig> {
        self.backends
            .iter()
            .filter(|b| !ollama_only || b.is_ollama())
            .filter(|b| {
                names.is_empty()
                    || names
                        .iter()
                        .any(|n| n.eq_ignore_ascii_case(&b.display_name()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::OutputFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[debate]
max_rounds = 5
consensus_threshold = 0.9
rule = "majority"
min_agreement_ratio = 0.75

[[backends]]
name = "GPT"
provider = "openai"
model = "gpt-4o-mini"

[[backends]]
provider = "ollama"
model = "llama3:8b"
mode = "ollama"

[providers.ollama]
timeout_secs = 300

[output]
format = "full"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.debate.max_rounds, 5);
        assert_eq!(config.debate.rule, "majority");
        assert_eq!(config.backends.len(), 2);
        assert!(config.backends[1].is_ollama());
        assert_eq!(config.providers.ollama.timeout_secs, 300);
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[debate]
max_rounds = 2
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.debate.max_rounds, 2);
        // Defaults should apply
        assert_eq!(config.debate.consensus_threshold, 0.85);
        assert_eq!(config.backends.len(), 4);
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let mut config = FileConfig::default();
        config.debate.rule = "vibes".to_string();
        config.backends.push(FileBackendConfig::remote("xAI Grok Beta", "xai", "grok-2"));
        config
            .backends
            .push(FileBackendConfig::remote("Other", "cohere", "command-r"));

        let codes: Vec<_> = config.validate().iter().map(|i| i.code).collect();
        assert!(codes.contains(&ConfigIssueCode::UnknownRule));
        assert!(codes.contains(&ConfigIssueCode::DuplicateBackendName));
        assert!(codes.contains(&ConfigIssueCode::UnknownProvider));
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let config = FileConfig {
            backends: vec![
                FileBackendConfig::remote("GPT 4", "openai", "gpt-4"),
                FileBackendConfig::remote("GPT-4", "openai", "gpt-4"),
                FileBackendConfig::remote("!!!", "openai", "gpt-4"),
            ],
            ..Default::default()
        };
        let codes: Vec<_> = config.validate().iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![
                ConfigIssueCode::DuplicateBackendName,
                ConfigIssueCode::InvalidBackendName
            ]
        );
    }

    #[test]
    fn test_validate_empty_backends() {
        let config = FileConfig {
            backends: vec![],
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::EmptyBackendList);
    }

    #[test]
    fn test_selected_backends() {
        let mut config = FileConfig::default();
        config.backends.push(FileBackendConfig::ollama("mistral"));

        let local = config.selected_backends(true, &[]);
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].model, "mistral");

        let named = config.selected_backends(false, &["xai grok beta".to_string()]);
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].provider, "xai");

        assert!(config.selected_backends(true, &["xAI Grok Beta".to_string()]).is_empty());
    }
}
