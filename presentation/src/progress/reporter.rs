//! Progress reporting for debate execution

use colored::Colorize;
use council_application::DebateProgressNotifier;
use council_domain::{ConsensusVerdict, Response, Round};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress during a debate with progress bars on stderr
pub struct ProgressReporter {
    multi: MultiProgress,
    round_bar: Mutex<Option<ProgressBar>>,
    synthesis_spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            round_bar: Mutex::new(None),
            synthesis_spinner: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateProgressNotifier for ProgressReporter {
    fn on_round_start(&self, round: u32, max_rounds: u32, backends: usize) {
        let pb = self.multi.add(ProgressBar::new(backends as u64));
        pb.set_style(Self::round_style());
        pb.set_prefix(format!("Round {}/{}", round, max_rounds));
        pb.set_message("Waiting for backends...");
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut bar) = self.round_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_backend_complete(&self, _round: u32, response: &Response) {
        if let Ok(bar) = self.round_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if response.error {
                format!("{} {}", "x".red(), response.backend_name)
            } else {
                format!("{} {}", "v".green(), response.backend_name)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_round_complete(&self, round: &Round, verdict: &ConsensusVerdict) {
        if let Ok(mut bar) = self.round_bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(round_summary(round, verdict));
        }
    }

    fn on_synthesis_start(&self) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Synthesis");
        pb.set_message("Writing the final answer...");
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut spinner) = self.synthesis_spinner.lock() {
            *spinner = Some(pb);
        }
    }

    fn on_synthesis_complete(&self, backend: Option<&str>) {
        if let Ok(mut spinner) = self.synthesis_spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_with_message(synthesis_summary(backend));
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl DebateProgressNotifier for SimpleProgress {
    fn on_round_start(&self, round: u32, max_rounds: u32, backends: usize) {
        eprintln!(
            "{} {} ({} backends)",
            "->".cyan(),
            format!("Round {}/{}", round, max_rounds).bold(),
            backends
        );
    }

    fn on_backend_complete(&self, _round: u32, response: &Response) {
        if response.error {
            eprintln!("  {} {} (failed)", "x".red(), response.backend_name);
        } else {
            eprintln!("  {} {}", "v".green(), response.backend_name);
        }
    }

    fn on_round_complete(&self, round: &Round, verdict: &ConsensusVerdict) {
        eprintln!("  {}", round_summary(round, verdict));
    }

    fn on_synthesis_start(&self) {
        eprintln!("{} {}", "->".cyan(), "Synthesis".bold());
    }

    fn on_synthesis_complete(&self, backend: Option<&str>) {
        eprintln!("  {}", synthesis_summary(backend));
    }
}

fn round_summary(round: &Round, verdict: &ConsensusVerdict) -> String {
    let similarity = verdict
        .lowest_similarity
        .map(|s| format!(" (lowest similarity {:.2})", s))
        .unwrap_or_default();
    let failures = match round.error_count() {
        0 => String::new(),
        n => format!(", {} failed", n),
    };

    if verdict.reached {
        format!("{}{}{}", "consensus".green(), similarity, failures)
    } else {
        format!("{}{}{}", "no consensus".yellow(), similarity, failures)
    }
}

fn synthesis_summary(backend: Option<&str>) -> String {
    match backend {
        Some(name) => format!("{} by {}", "done".green(), name),
        None => format!("{}", "no backend answered; using fallback".yellow()),
    }
}
