//! CLI entrypoint for Debate Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{
    BackendRegistry, DebateProgressNotifier, NoProgress, RunDebateInput, RunDebateUseCase,
};
use council_domain::{ConfigIssue, ModelRecommendation, OutputFormat};
use council_infrastructure::{BackendFactory, ConfigLoader, FileConfig, JsonlTranscriptLogger};
use council_presentation::{Cli, ConsoleFormatter, ProgressReporter};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let (mut config, warnings) = if cli.no_config {
        (ConfigLoader::load_defaults(), Vec::new())
    } else {
        ConfigLoader::load_validated(cli.config.as_deref())?
    };
    apply_overrides(&cli, &mut config);

    let _log_guard = init_logging(cli.verbose, config.logging.dir.as_deref())?;
    for issue in &warnings {
        warn!("{}", issue);
    }

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    if cli.list_backends {
        return list_backends(&cli, &config);
    }
    if cli.list_local_models {
        return list_local_models(&config).await;
    }
    if cli.recommend {
        return recommend(&cli, &config).await;
    }

    let Some(question) = cli.question.clone() else {
        bail!("A question is required. Example: debate-council \"What is 2+2?\"");
    };

    // Overrides may have changed [debate]
    let (debate_config, issues) = config.debate.to_debate_config();
    for issue in fresh_warnings(&issues, &warnings)? {
        warn!("{}", issue);
    }

    // === Dependency Injection ===
    let factory = BackendFactory::new(&config);
    for model in factory
        .missing_ollama_models(config.debate.ollama_only, &cli.backend)
        .await?
    {
        warn!("Ollama model '{}' is not installed. Run: ollama pull {}", model, model);
    }
    let backends = factory.build(config.debate.ollama_only, &cli.backend)?;
    let registry = Arc::new(BackendRegistry::new(backends, debate_config.call_timeout));

    let input = RunDebateInput {
        max_rounds: cli.rounds,
        consensus_threshold: cli.threshold,
        ..RunDebateInput::new(question.clone())
    };

    let mut use_case = RunDebateUseCase::new(registry.clone(), debate_config);
    if let Some(path) = cli.transcript.as_ref().or(config.logging.transcript.as_ref()) {
        let logger = JsonlTranscriptLogger::open(path)
            .with_context(|| format!("cannot open transcript {}", path.display()))?;
        info!("Writing transcript to {}", logger.path().display());
        use_case = use_case.with_transcript(Arc::new(logger));
    }

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();

    // Print header
    if !cli.quiet && format != OutputFormat::Json {
        println!();
        println!("+============================================================+");
        println!("|             Debate Council - LLM Debate                    |");
        println!("+============================================================+");
        println!();
        println!("Question: {}", question.trim());
        println!(
            "Backends: {}",
            registry
                .descriptors()
                .iter()
                .map(|d| d.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
    }

    let progress: Box<dyn DebateProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };
    let session = use_case
        .execute_with_progress(input, progress.as_ref())
        .await?;

    println!("{}", ConsoleFormatter::format(&session, format));

    Ok(())
}

/// Command-line flags win over every configuration source
fn apply_overrides(cli: &Cli, config: &mut FileConfig) {
    if let Some(rule) = cli.rule {
        config.debate.rule = rule.to_rule(None).name().to_string();
    }
    if let Some(ratio) = cli.min_agreement {
        config.debate.min_agreement_ratio = ratio;
    }
    if let Some(secs) = cli.timeout {
        config.debate.call_timeout_secs = secs;
    }
    if cli.ollama_only {
        config.debate.ollama_only = true;
    }
}

/// Fail on any error; otherwise return the warnings not yet logged
fn fresh_warnings<'a>(
    issues: &'a [ConfigIssue],
    already_logged: &[ConfigIssue],
) -> Result<Vec<&'a ConfigIssue>> {
    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| i.to_string())
        .collect();
    if !errors.is_empty() {
        bail!("invalid settings:\n  {}", errors.join("\n  "));
    }
    Ok(issues
        .iter()
        .filter(|i| !already_logged.contains(i))
        .collect())
}

/// Initialize logging based on verbosity level.
///
/// `RUST_LOG` takes precedence over `-v`. With `[logging] dir` set, a
/// daily-rolling file receives the same events.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "debate-council.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn list_backends(cli: &Cli, config: &FileConfig) -> Result<()> {
    let descriptors: Vec<_> = config
        .selected_backends(config.debate.ollama_only, &cli.backend)
        .into_iter()
        .filter_map(|b| b.parse().ok())
        .collect();
    print!("{}", ConsoleFormatter::format_backends(&descriptors));
    Ok(())
}

async fn list_local_models(config: &FileConfig) -> Result<()> {
    let client = BackendFactory::new(config).ollama_client()?;
    if !client.is_available().await {
        bail!(
            "Ollama is not reachable at {}. Start it with: ollama serve",
            client.base_url()
        );
    }
    let models = client.list_models().await?;
    print!("{}", ConsoleFormatter::format_local_models(&models));
    Ok(())
}

async fn recommend(cli: &Cli, config: &FileConfig) -> Result<()> {
    let Some(question) = cli.question.as_deref() else {
        bail!("--recommend needs a question to classify");
    };

    let client = BackendFactory::new(config).ollama_client()?;
    let installed = if client.is_available().await {
        client.list_models().await?
    } else {
        warn!("Ollama is not reachable at {}; treating every model as missing", client.base_url());
        Vec::new()
    };

    let recommendation = ModelRecommendation::for_question(question, installed);
    print!("{}", ConsoleFormatter::format_recommendation(&recommendation));
    Ok(())
}
