//! Command dispatch

use std::io::{self, BufRead, Write};
use std::path::Path;

use clap::CommandFactory;
use tracing::{debug, info, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::host::{Flow, Host};
use crate::cli::output;
use crate::cli::script;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::{InfraError, ServiceContainer};
use crate::util::path::expand_path;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config { command }) => execute_config(cli, command),
        Some(Commands::Run { script }) => {
            let container = build_container(cli)?;
            run_script(cli, &container, script)
        }
        Some(Commands::Repl) | None => {
            let container = build_container(cli)?;
            run_repl(cli, &container)
        }
    }
}

/// Load settings through every layer and wire real implementations.
pub fn build_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let explicit = cli.config.as_deref().map(expand_path);
    let mut settings = Settings::load(explicit.as_deref())?.with_canvas(cli.width, cli.height)?;
    if cli.no_animate {
        settings.animation.enabled = false;
    }
    debug!("effective settings: {:?}", settings);
    Ok(ServiceContainer::new(settings))
}

fn new_host<W: Write>(cli: &Cli, container: &ServiceContainer, out: W) -> CliResult<Host<W>> {
    let mut session = container.session();
    if !cli.seed.is_empty() {
        let count = session.seed(cli.seed.as_slice())?;
        info!("seeded {} key(s)", count);
    }
    Ok(Host::new(
        session,
        container.pacer.clone(),
        cli.format,
        container.settings.animation.enabled,
        out,
    ))
}

#[instrument(skip(cli, container))]
fn run_script(cli: &Cli, container: &ServiceContainer, path: &Path) -> CliResult<()> {
    let path = expand_path(path);
    let content = container
        .scripts
        .read_script(&path)
        .map_err(|e| InfraError::io(format!("read script {}", path.display()), e))?;
    let mut host = new_host(cli, container, io::stdout().lock())?;
    host.run_script(&path.display().to_string(), &content)
}

fn run_repl(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    let mut host = new_host(cli, container, io::stdout())?;
    output::header("bstviz: type 'help' for commands");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        output::prompt("bst>");
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| InfraError::io("read command", e))?;
        let directives = match script::parse_line(&line) {
            Ok(directives) => directives,
            Err(e) => {
                output::warning(&e);
                continue;
            }
        };
        for directive in directives {
            match host.execute(directive) {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                // a failed command does not end the session
                Err(e) => output::error(&e),
            }
        }
    }
    Ok(())
}

fn execute_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let container = build_container(cli)?;
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            let path = global_config_path().ok_or_else(|| {
                CliError::InvalidArgs("no home directory to derive the config path from".into())
            })?;
            output::info(&path.display());
            if !path.exists() {
                output::detail("(not present, defaults apply)");
            }
        }
    }
    Ok(())
}
