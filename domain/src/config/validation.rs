//! Structured configuration issues.
//!
//! Loaders report problems as a list of [`ConfigIssue`] values instead of
//! failing on the first one, so every problem in a file can be shown at once.
//!
//! # Examples
//!
//! ```
//! use council_domain::{ConfigIssue, ConfigIssueCode, Severity};
//!
//! let issue = ConfigIssue::error(ConfigIssueCode::EmptyBackendList, "no backends configured");
//! assert!(issue.is_error());
//! ```

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `provider` is not one of the known providers.
    UnknownProvider,
    /// `mode` is neither `remote` nor `ollama`.
    UnknownMode,
    /// `[debate] rule` is not a known consensus rule.
    UnknownRule,
    /// Consensus threshold outside `[0, 1]`.
    ThresholdOutOfRange,
    /// Majority agreement ratio outside `(0, 1]`.
    AgreementRatioOutOfRange,
    /// Round count or round limit is zero or above the limit.
    RoundsOutOfRange,
    /// Per-call timeout of zero seconds.
    TimeoutOutOfRange,
    /// No backend is configured (or all were filtered out).
    EmptyBackendList,
    /// Two backends share the same name (or the same id derived from it).
    DuplicateBackendName,
    /// A backend name yields an empty id.
    InvalidBackendName,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}
