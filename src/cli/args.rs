use clap::{Parser, Subcommand};

use crate::command::GitCommand;

/// gitr - git-style commands answered by a language model
#[derive(Parser)]
#[command(name = "gitr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory to start the workspace search from (defaults to current directory)
    #[arg(short = 'w', long, global = true)]
    pub workspace_root: Option<String>,

    /// Select model to use ('-m' belongs to commit)
    #[arg(long, env = "GITR_MODEL", global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty workspace in the current directory
    Init,
    /// Read or write workspace configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Stage files (only '.' is supported)
    Add {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Record a commit
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },
    /// Show the working tree status
    Status,
    /// Show commit logs
    Log,
    /// Show changes
    Diff,
    /// List, create or delete branches
    Branch {
        /// Delete the named branch
        #[arg(short, long)]
        delete: bool,

        name: Option<String>,
    },
    /// Switch branches
    Checkout {
        /// Create the branch before switching
        #[arg(short = 'b')]
        create: bool,

        branch: String,
    },
    /// Merge a branch into the current one
    Merge { branch: String },
    /// Manage the remote repository
    Remote {
        #[command(subcommand)]
        action: RemoteCommands,
    },
    /// Upload branch, commits, files and history to the remote
    Push,
    /// Replace local branch, files and history with the remote copy
    Pull,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Set a configuration value (api.url, api.key, remote.url, remote.repo_id)
    Set { key: String, value: String },
    /// Print a configuration value
    Get { key: String },
}

#[derive(Subcommand)]
pub enum RemoteCommands {
    /// Create a repository on the remote and remember its id
    Create { name: String },
}

impl Commands {
    /// The interpreted command this subcommand maps to, if any.
    pub fn as_git_command(&self) -> Option<GitCommand> {
        let command = match self {
            Commands::Add { paths } => GitCommand::Add {
                paths: paths.clone(),
            },
            Commands::Commit { message } => GitCommand::Commit {
                message: message.clone(),
            },
            Commands::Status => GitCommand::Status,
            Commands::Log => GitCommand::Log,
            Commands::Diff => GitCommand::Diff,
            Commands::Branch { delete, name } => GitCommand::Branch {
                delete: *delete,
                name: name.clone(),
            },
            Commands::Checkout { create, branch } => GitCommand::Checkout {
                create: *create,
                branch: branch.clone(),
            },
            Commands::Merge { branch } => GitCommand::Merge {
                branch: branch.clone(),
            },
            Commands::Init
            | Commands::Config { .. }
            | Commands::Remote { .. }
            | Commands::Push
            | Commands::Pull => return None,
        };
        Some(command)
    }
}
