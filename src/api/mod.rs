//! Client for the command interpreter.
//!
//! The interpreter is an external chat completion service: it receives the
//! current branch, the file snapshot and the prior conversation, and answers
//! with the text git would have printed.

mod client;
mod prompt;
mod types;

pub use client::{ChatInterpreter, CommandInterpreter};
pub use prompt::InterpreterRequest;
