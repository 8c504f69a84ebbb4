//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished debate is printed
///
/// This is a domain concept representing how the output should be formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every round followed by the final answer
    Full,
    /// Only the final answer (default)
    #[default]
    Final,
    /// The serialized session as JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(OutputFormat::Full),
            "final" => Ok(OutputFormat::Final),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}. Valid: full, final, json", s)),
        }
    }
}
