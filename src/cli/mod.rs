//! CLI layer: argument parsing, command dispatch and the terminal host

pub mod args;
pub mod commands;
pub mod error;
pub mod host;
pub mod output;
pub mod player;
pub mod render;
pub mod script;

pub use args::{Cli, Commands, OutputFormat};
pub use error::{CliError, CliResult};
pub use host::{Flow, Host};
