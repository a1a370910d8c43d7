use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod api;
mod cli;
mod command;
mod config;
mod error;
mod remote;
mod workspace;

use cli::{Cli, Commands, ConfigCommands, RemoteCommands};

/// Environment variable holding the log filter when `--verbose` is absent.
const LOG_ENV: &str = "GITR_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(cmd) = cli.command else {
        // No command specified, show help
        eprintln!("No command specified. Use --help for usage information.");
        eprintln!("Use 'gitr init' to create a workspace.");
        return Ok(());
    };

    if let Commands::Init = cmd {
        let dir = cli::resolve_start_dir(cli.workspace_root)?;
        return command::run_init(&dir);
    }

    let workspace = cli::resolve_workspace(cli.workspace_root)?;

    if let Some(git_command) = cmd.as_git_command() {
        return command::run_interpreted(&workspace, cli.model, git_command).await;
    }

    match cmd {
        Commands::Config { action } => match action {
            ConfigCommands::Set { key, value } => {
                command::run_config_set(&workspace, &key, &value)?;
            }
            ConfigCommands::Get { key } => {
                command::run_config_get(&workspace, &key)?;
            }
        },
        Commands::Remote { action } => match action {
            RemoteCommands::Create { name } => {
                command::run_remote_create(&workspace, &name).await?;
            }
        },
        Commands::Push => command::run_push(&workspace).await?,
        Commands::Pull => command::run_pull(&workspace).await?,
        _ => {}
    }

    Ok(())
}
