//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable output
    Pretty,
    /// JSON output
    Json,
}

/// CLI arguments for steward
#[derive(Parser, Debug)]
#[command(name = "steward")]
#[command(author, version, about = "Natural-language commands for your tools and devices")]
#[command(long_about = r#"
Steward turns a free-text command into tool calls and device actions.

Commands are resolved in three tiers: fixed patterns, fuzzy device names,
then a local model served by Ollama. Multi-step goals run through a bounded
planner that picks one tool per step.

Configuration files are loaded from (in priority order):
1. STEWARD_* environment variables
2. --config <path>     Explicit config file
3. ./steward.toml      Project-level config
4. ~/.config/steward/config.toml   Global config

Example:
  steward run "list containers"
  steward resolve "turn off the kitchen lights"
  steward automate "research rust async runtimes and save a note"
  steward chat
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Print the merged configuration and its sources, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve a command into intents without executing anything
    Resolve {
        /// The command text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Resolve a command and carry out its intents
    Run {
        /// The command text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Run a multi-step goal through the planner
    Automate {
        /// What the run should achieve
        #[arg(required = true, num_args = 1..)]
        goal: Vec<String>,
    },
    /// List the tool catalogue
    Tools,
    /// Start an interactive session
    Chat,
}

impl Command {
    /// Free text of the command, words joined by single spaces
    pub fn text(&self) -> Option<String> {
        match self {
            Command::Resolve { text } | Command::Run { text } => Some(text.join(" ")),
            Command::Automate { goal } => Some(goal.join(" ")),
            Command::Tools | Command::Chat => None,
        }
    }
}
