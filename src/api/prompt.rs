//! Context assembled for one interpreted command.

use crate::workspace::{HistoryEntry, Snapshot, ROLE_USER};

use super::types::ChatMessage;

pub const ROLE_SYSTEM: &str = "system";

const SYSTEM_PROMPT: &str = "\
You are git, except there is no repository: you only have this conversation \
and the current file contents. Answer every command with the output real git \
would print, formatted the same way, without colors.

Stay consistent with everything earlier in the conversation: commits you \
reported, the branches they belong to, and branches created with \
`git branch <name>` or `git checkout -b <name>`. When committing, print the \
usual `[branch hash] message` summary line first. For status and diff, \
compare the current files with the last commit on the current branch. For \
log, list the commits of the current branch. For branch, list every branch \
seen so far and mark the current one with `*`. For checkout, switch \
branches. For merge, combine the branches and invent conflicts when both \
sides changed the same file.";

/// Everything the interpreter receives for one command.
#[derive(Debug, Clone)]
pub struct InterpreterRequest<'a> {
    /// Command label such as `git status`.
    pub label: &'a str,
    pub args: &'a [String],
    pub branch: &'a str,
    pub files: &'a Snapshot,
    pub history: &'a [HistoryEntry],
}

impl InterpreterRequest<'_> {
    pub fn command_line(&self) -> String {
        std::iter::once(self.label)
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The user turn recorded in history and sent to the interpreter.
    pub fn user_prompt(&self) -> String {
        let mut prompt = format!(
            "Current branch: {}\nCommand: {}\n\nRepository files:\n",
            self.branch,
            self.command_line()
        );
        for (path, content) in self.files {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", path, content));
        }
        prompt
    }

    /// System prompt, prior conversation, then the new user turn.
    pub fn messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::new(ROLE_SYSTEM, SYSTEM_PROMPT));
        messages.extend(
            self.history
                .iter()
                .map(|m| ChatMessage::new(m.role.clone(), m.content.clone())),
        );
        messages.push(ChatMessage::new(ROLE_USER, self.user_prompt()));
        messages
    }
}
