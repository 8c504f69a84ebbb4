//! CLI command definitions

use clap::{Parser, ValueEnum};
use council_domain::{ConsensusRule, DEFAULT_MIN_AGREEMENT_RATIO, OutputFormat};
use std::path::PathBuf;

/// Output format for debate results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// Every round followed by the final answer
    Full,
    /// Only the final answer
    Final,
    /// The session as JSON
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Full => OutputFormat::Full,
            OutputArg::Final => OutputFormat::Final,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

/// Consensus rule selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleArg {
    /// Every pair of responses must agree
    Pairwise,
    /// A large enough group of responses must agree
    Majority,
}

impl RuleArg {
    pub fn to_rule(self, min_agreement_ratio: Option<f64>) -> ConsensusRule {
        match self {
            RuleArg::Pairwise => ConsensusRule::Pairwise,
            RuleArg::Majority => ConsensusRule::Majority {
                min_agreement_ratio: min_agreement_ratio.unwrap_or(DEFAULT_MIN_AGREEMENT_RATIO),
            },
        }
    }
}

/// CLI arguments for debate-council
#[derive(Parser, Debug)]
#[command(name = "debate-council")]
#[command(author, version, about = "Debate Council - Several LLMs argue a question until they converge")]
#[command(long_about = r#"
Debate Council puts one question to several LLM backends and lets them argue.

Each round every backend answers in parallel. From round 2 on, every backend
sees all answers of the previous round and refines its own. The debate stops
when the answers converge or the round limit is reached; a final answer is
then synthesized from the whole history.

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables (e.g. COUNCIL_DEBATE__MAX_ROUNDS=5)
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/debate-council/config.toml   Global config

Example:
  debate-council "What is 2+2?"
  debate-council -r 5 -t 0.9 -o full "Is P equal to NP?"
  debate-council --ollama-only --rule majority "Tabs or spaces?"
  debate-council --recommend "How do I optimize this SQL query?"
"#)]
pub struct Cli {
    /// The question to debate
    pub question: Option<String>,

    /// Maximum number of rounds
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<u32>,

    /// Similarity (0.0 - 1.0) that counts as agreement
    #[arg(short, long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Consensus rule
    #[arg(long, value_enum)]
    pub rule: Option<RuleArg>,

    /// Share of responses that must agree under the majority rule
    #[arg(long, value_name = "RATIO")]
    pub min_agreement: Option<f64>,

    /// Per-backend call timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Backends to include, by name (can be specified multiple times)
    #[arg(short, long, value_name = "NAME")]
    pub backend: Vec<String>,

    /// Only use local Ollama backends
    #[arg(long)]
    pub ollama_only: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// List configured backends and exit
    #[arg(long)]
    pub list_backends: bool,

    /// List models installed in the local Ollama daemon and exit
    #[arg(long)]
    pub list_local_models: bool,

    /// Recommend local models for the question and exit
    #[arg(long)]
    pub recommend: bool,

    /// Append a JSONL transcript of the debate to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
}

impl Cli {
    /// Whether the invocation runs a debate (as opposed to an info command)
    pub fn runs_debate(&self) -> bool {
        !(self.show_config || self.list_backends || self.list_local_models || self.recommend)
    }
}
