//! Console output formatter for debate results

use colored::Colorize;
use council_domain::{
    BackendDescriptor, DebateSession, ModelRecommendation, OutputFormat, Round,
};

/// Formats debate sessions for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a session in the requested output format
    pub fn format(session: &DebateSession, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format_full(session),
            OutputFormat::Final => Self::format_final(session),
            OutputFormat::Json => Self::format_json(session),
        }
    }

    /// Every round followed by the final answer
    pub fn format_full(session: &DebateSession) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Debate Council Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Question:".cyan().bold(),
            session.question()
        ));
        if let Some(first) = session.rounds().first() {
            let names: Vec<&str> = first
                .responses
                .iter()
                .map(|r| r.backend_name.as_str())
                .collect();
            output.push_str(&format!(
                "{} {}\n",
                "Backends:".cyan().bold(),
                names.join(", ")
            ));
        }

        for round in session.rounds() {
            output.push_str(&Self::format_round(round));
        }

        output.push_str(&Self::section_header("Outcome"));
        output.push_str(&format!("{}\n", Self::outcome_line(session)));

        output.push_str(&Self::section_header("Final Answer"));
        output.push_str(&format!("\n{}\n", session.final_answer()));

        output.push_str(&Self::footer());
        output
    }

    /// Only the final answer with a one-line summary
    pub fn format_final(session: &DebateSession) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Debate Council Answer ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n", "Q:".bold(), session.question()));
        output.push_str(&format!("{}\n\n", Self::outcome_line(session).dimmed()));
        output.push_str(session.final_answer());
        output.push('\n');

        output
    }

    /// The serialized session
    pub fn format_json(session: &DebateSession) -> String {
        serde_json::to_string_pretty(session).unwrap_or_else(|_| "{}".to_string())
    }

    /// Table of configured backends
    pub fn format_backends(backends: &[BackendDescriptor]) -> String {
        if backends.is_empty() {
            return format!("{}\n", "No backends selected.".yellow());
        }

        let mut output = format!("{}\n", "Configured backends:".cyan().bold());
        for (i, b) in backends.iter().enumerate() {
            let mode = if b.kind.is_local() { "local" } else { "remote" };
            output.push_str(&format!(
                "  {}. {} {}\n",
                i + 1,
                b.name.bold(),
                format!("[{} / {} / {}]", mode, b.kind.provider_label(), b.kind.model()).dimmed()
            ));
        }
        output
    }

    /// Installed Ollama models
    pub fn format_local_models(models: &[String]) -> String {
        if models.is_empty() {
            return format!(
                "{}\n",
                "No local models installed. Pull one with: ollama pull <model>".yellow()
            );
        }
        let mut output = format!("{}\n", "Installed Ollama models:".cyan().bold());
        for model in models {
            output.push_str(&format!("  * {}\n", model));
        }
        output
    }

    /// Local model recommendation for a question
    pub fn format_recommendation(rec: &ModelRecommendation) -> String {
        let mut output = format!(
            "{} {}\n",
            "Question domain:".cyan().bold(),
            rec.domain
        );

        if rec.installed_recommended.is_empty() {
            output.push_str(&format!("{}\n", "No recommended model is installed.".yellow()));
        } else {
            output.push_str(&format!("{}\n", "Recommended and installed:".green().bold()));
            for model in &rec.installed_recommended {
                output.push_str(&format!("  {} {}\n", "v".green(), model));
            }
        }

        if !rec.missing_recommendations.is_empty() {
            output.push_str(&format!("{}\n", "Recommended but missing:".yellow().bold()));
            for model in &rec.missing_recommendations {
                output.push_str(&format!("  {} {}  (ollama pull {})\n", "x".red(), model, model));
            }
        }
        output
    }

    fn format_round(round: &Round) -> String {
        let mut output = Self::section_header(&format!(
            "Round {}: {}",
            round.round,
            round.description
        ));
        for response in &round.responses {
            let label = format!("── {} ──", response.backend_name);
            let label = if response.error {
                label.red().bold()
            } else {
                label.yellow().bold()
            };
            output.push_str(&format!("\n{}\n{}\n", label, response.text.trim_end()));
        }
        output
    }

    fn outcome_line(session: &DebateSession) -> String {
        match session.consensus_round() {
            Some(round) => format!(
                "Consensus reached in round {} of {}.",
                round,
                session.total_rounds()
            ),
            None => format!(
                "No consensus after {} round{}.",
                session.total_rounds(),
                if session.total_rounds() == 1 { "" } else { "s" }
            ),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
