mod config;
mod init;
mod interpret;
mod remote;

pub use config::{run_config_get, run_config_set};
pub use init::run_init;
pub use interpret::{run_interpreted, GitCommand};
pub use remote::{run_pull, run_push, run_remote_create};
