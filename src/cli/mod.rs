mod args;
mod paths;

pub use args::{Cli, Commands, ConfigCommands, RemoteCommands};
pub use paths::{resolve_start_dir, resolve_workspace};
