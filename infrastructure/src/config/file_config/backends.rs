//! Backend list from TOML (`[[backends]]` array)

use council_domain::{
    BackendDescriptor, BackendKind, ConfigIssue, ConfigIssueCode, RemoteProvider, title_case,
};
use serde::{Deserialize, Serialize};

/// One `[[backends]]` entry
///
/// ```toml
/// [[backends]]
/// name = "Llama3 8B"
/// provider = "ollama"
/// model = "llama3:8b"
/// mode = "ollama"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileBackendConfig {
    /// Display name (defaults to the title-cased model id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// openai, anthropic, google, xai or ollama
    pub provider: String,
    /// Model id sent to the provider
    pub model: String,
    /// "remote" or "ollama"
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Overrides the provider's base URL for this backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Overrides the provider's API key variable for this backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

fn default_mode() -> String {
    "remote".to_string()
}

impl FileBackendConfig {
    pub fn remote(name: &str, provider: &str, model: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            provider: provider.to_string(),
            model: model.to_string(),
            mode: default_mode(),
            base_url: None,
            api_key_env: None,
        }
    }

    pub fn ollama(model: &str) -> Self {
        Self {
            name: None,
            provider: "ollama".to_string(),
            model: model.to_string(),
            mode: "ollama".to_string(),
            base_url: None,
            api_key_env: None,
        }
    }

    /// The four hosted backends used when no list is configured
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::remote("OpenAI GPT-4o Mini", "openai", "gpt-4o-mini"),
            Self::remote(
                "Anthropic Claude 3.5 Sonnet",
                "anthropic",
                "claude-3-5-sonnet-20241022",
            ),
            Self::remote("Google Gemini 1.5 Flash", "google", "gemini-1.5-flash"),
            Self::remote("xAI Grok Beta", "xai", "grok-beta"),
        ]
    }

    /// Name shown to users and other backends
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => title_case(&self.model),
        }
    }

    /// Stable id derived from the display name
    pub fn id(&self) -> String {
        slug(&self.display_name())
    }

    pub fn is_ollama(&self) -> bool {
        self.mode.eq_ignore_ascii_case("ollama")
    }

    /// Resolve into a domain descriptor
    pub fn parse(&self) -> Result<BackendDescriptor, ConfigIssue> {
        let name = self.display_name();
        let id = slug(&name);
        if id.is_empty() {
            return Err(ConfigIssue::error(
                ConfigIssueCode::InvalidBackendName,
                format!("backend '{}': name needs at least one letter or digit", name),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigIssue::error(
                ConfigIssueCode::UnknownProvider,
                format!("backend '{}': model cannot be empty", name),
            ));
        }

        let kind = match self.mode.to_lowercase().as_str() {
            "ollama" => BackendKind::Ollama {
                model: self.model.clone(),
            },
            "remote" => {
                let provider: RemoteProvider = self.provider.parse().map_err(|e| {
                    ConfigIssue::error(
                        ConfigIssueCode::UnknownProvider,
                        format!("backend '{}': {}", name, e),
                    )
                })?;
                BackendKind::Remote {
                    provider,
                    model: self.model.clone(),
                }
            }
            other => {
                return Err(ConfigIssue::error(
                    ConfigIssueCode::UnknownMode,
                    format!(
                        "backend '{}': unknown mode '{}' (valid: remote, ollama)",
                        name, other
                    ),
                ));
            }
        };

        Ok(BackendDescriptor::new(id, name, kind))
    }
}

/// Lowercase id with runs of non-alphanumerics collapsed to `-`
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let descriptors: Vec<_> = FileBackendConfig::defaults()
            .iter()
            .map(|b| b.parse().unwrap())
            .collect();
        assert_eq!(descriptors.len(), 4);
        assert_eq!(descriptors[0].id.as_str(), "openai-gpt-4o-mini");
        assert_eq!(
            descriptors[3].kind,
            BackendKind::Remote {
                provider: RemoteProvider::Xai,
                model: "grok-beta".to_string()
            }
        );
    }

    #[test]
    fn test_ollama_entry_uses_title_cased_model() {
        let entry = FileBackendConfig::ollama("llama3.1:8b");
        let descriptor = entry.parse().unwrap();
        assert!(descriptor.kind.is_local());
        assert_eq!(descriptor.name, entry.display_name());
        assert!(!descriptor.id.as_str().is_empty());
    }

    #[test]
    fn test_unknown_provider_and_mode() {
        let mut entry = FileBackendConfig::remote("X", "mistral-cloud", "m");
        assert_eq!(
            entry.parse().unwrap_err().code,
            ConfigIssueCode::UnknownProvider
        );

        entry.provider = "openai".to_string();
        entry.mode = "grpc".to_string();
        assert_eq!(entry.parse().unwrap_err().code, ConfigIssueCode::UnknownMode);
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("xAI Grok Beta"), "xai-grok-beta");
        assert_eq!(slug("  Llama3 (8B)  "), "llama3-8b");
        assert_eq!(slug("!!!"), "");
    }

    #[test]
    fn test_name_without_alphanumerics_is_rejected() {
        let entry = FileBackendConfig::remote("!!!", "openai", "gpt-4o-mini");
        assert_eq!(entry.id(), "");
        assert_eq!(
            entry.parse().unwrap_err().code,
            ConfigIssueCode::InvalidBackendName
        );
    }
}
