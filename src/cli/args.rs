//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

/// Binary search tree visualizer: narrated insert, delete and search with computed layout
#[derive(Parser, Debug)]
#[command(name = "bstviz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered on top of the global one
    #[arg(long, global = true, env = "BSTVIZ_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Canvas width handed to the layout engine
    #[arg(long, global = true)]
    pub width: Option<f64>,

    /// Canvas height handed to the layout engine
    #[arg(long, global = true)]
    pub height: Option<f64>,

    /// Finish search animations at once instead of stepping
    #[arg(long, global = true)]
    pub no_animate: bool,

    /// How frames are printed
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Keys inserted before the first command, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, global = true)]
    pub seed: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Narration, status and an ASCII outline
    Text,
    /// The full frame serialized as TOML
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive session (default)
    Repl,

    /// Execute commands from a script file, `-` reads stdin
    Run {
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Show the global config file location
    Path,
}
