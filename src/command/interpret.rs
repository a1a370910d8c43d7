//! Commands answered by the command interpreter.

use anyhow::{bail, Result};
use tracing::debug;

use crate::api::{ChatInterpreter, CommandInterpreter, InterpreterRequest};
use crate::error;
use crate::workspace::{Workspace, ROLE_ASSISTANT, ROLE_USER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    Add { paths: Vec<String> },
    Commit { message: String },
    Status,
    Log,
    Diff,
    Branch { delete: bool, name: Option<String> },
    Checkout { create: bool, branch: String },
    Merge { branch: String },
}

impl GitCommand {
    pub fn label(&self) -> &'static str {
        match self {
            GitCommand::Add { .. } => "git add",
            GitCommand::Commit { .. } => "git commit",
            GitCommand::Status => "git status",
            GitCommand::Log => "git log",
            GitCommand::Diff => "git diff",
            GitCommand::Branch { .. } => "git branch",
            GitCommand::Checkout { .. } => "git checkout",
            GitCommand::Merge { .. } => "git merge",
        }
    }

    /// Arguments forwarded to the interpreter, after usage checks.
    pub fn args(&self) -> Result<Vec<String>> {
        let args = match self {
            GitCommand::Add { paths } => {
                if paths.len() != 1 || paths[0] != "." {
                    bail!("only 'gitr add .' is supported (adds all files)");
                }
                paths.clone()
            }
            GitCommand::Commit { message } => {
                if message.trim().is_empty() {
                    bail!("usage: gitr commit -m \"message\"");
                }
                vec!["-m".to_string(), message.clone()]
            }
            GitCommand::Status | GitCommand::Log | GitCommand::Diff => Vec::new(),
            GitCommand::Branch { delete, name } => match (delete, name) {
                (true, Some(name)) => vec!["-d".to_string(), name.clone()],
                (true, None) => bail!("usage: gitr branch -d <branch-name>"),
                (false, Some(name)) => vec![name.clone()],
                (false, None) => Vec::new(),
            },
            GitCommand::Checkout { create, branch } => {
                if *create {
                    vec!["-b".to_string(), branch.clone()]
                } else {
                    vec![branch.clone()]
                }
            }
            GitCommand::Merge { branch } => vec![branch.clone()],
        };
        Ok(args)
    }

    /// Branch the pointer moves to once the exchange succeeds.
    pub fn target_branch(&self) -> Option<&str> {
        match self {
            GitCommand::Checkout { branch, .. } => Some(branch),
            _ => None,
        }
    }
}

/// Send one command with full workspace context and record the exchange.
///
/// The prompt and the response are appended to history only after the
/// interpreter answered successfully.
pub async fn exchange(
    workspace: &Workspace,
    interpreter: &impl CommandInterpreter,
    label: &str,
    args: &[String],
) -> error::Result<String> {
    let branch = workspace.head().get()?;
    let files = workspace.snapshot()?;
    let history = workspace.history().load()?;

    let request = InterpreterRequest {
        label,
        args,
        branch: &branch,
        files: &files,
        history: &history.messages,
    };

    let response = interpreter.interpret(&request).await?;

    let store = workspace.history();
    store.append(ROLE_USER, &request.user_prompt())?;
    store.append(ROLE_ASSISTANT, &response)?;

    Ok(response)
}

async fn run_with(
    workspace: &Workspace,
    interpreter: &impl CommandInterpreter,
    command: &GitCommand,
) -> Result<String> {
    let args = command.args()?;
    let response = exchange(workspace, interpreter, command.label(), &args).await?;

    if let Some(branch) = command.target_branch() {
        workspace.head().set(branch)?;
    }

    Ok(response)
}

pub async fn run_interpreted(
    workspace: &Workspace,
    model: Option<String>,
    command: GitCommand,
) -> Result<()> {
    let config = workspace.config().validate()?;
    let interpreter = ChatInterpreter::from_config(&config, model)?;
    debug!("Interpreting {} with {}", command.label(), interpreter.model());

    let response = run_with(workspace, &interpreter, &command).await?;
    println!("{}", response);
    Ok(())
}
