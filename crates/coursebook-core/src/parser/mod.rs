//! Command-line text → [`Command`].
//!
//! Parsing happens in two stages: the input is split into a command word and
//! an argument string, then the word picks a per-command parser that
//! validates the arguments and builds the command. Parsing never looks at
//! the store.

mod args;
mod commands;
pub mod tokenizer;

pub use args::{parse_delete_target, parse_index, parse_target, MESSAGE_INVALID_INDEX};

use crate::command::Command;
use crate::error::ErrorCode;

/// Malformed input, rejected before reaching the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Invalid command format! {message}\n{usage}")]
    InvalidFormat {
        message: String,
        usage: &'static str,
    },
}

impl ParseError {
    pub(crate) fn invalid(message: impl Into<String>, usage: &'static str) -> Self {
        Self::InvalidFormat {
            message: message.into(),
            usage,
        }
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownCommand(_) => ErrorCode::UnknownCommand,
            Self::InvalidFormat { .. } => ErrorCode::InvalidFormat,
        }
    }

    /// Usage line of the command the input was meant for.
    #[must_use]
    pub const fn usage(&self) -> Option<&'static str> {
        match self {
            Self::UnknownCommand(_) => None,
            Self::InvalidFormat { usage, .. } => Some(usage),
        }
    }
}

/// Parse one line of user input.
///
/// # Errors
///
/// - [`ParseError::UnknownCommand`] when the first word is not a command.
/// - [`ParseError::InvalidFormat`] when the arguments do not fit the
///   command; the error carries that command's usage line.
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::invalid(
            "No command given.",
            commands::HELP_USAGE,
        ));
    }
    let (word, args) = trimmed
        .find(char::is_whitespace)
        .map_or((trimmed, ""), |split| trimmed.split_at(split));

    match word {
        "add" => commands::parse_add(args),
        "edit" => commands::parse_edit(args),
        "delete" | "del" => commands::parse_delete(args),
        "clear" => Ok(Command::Clear),
        "fav" | "favourite" => commands::parse_favourite(args),
        "unfav" | "unfavourite" => commands::parse_unfavourite(args),
        "view" => commands::parse_view(args),
        "coursecolor" | "cc" => commands::parse_course_color(args),
        "addcourse" | "ac" => commands::parse_add_course(args),
        "removecourse" | "rc" => commands::parse_remove_course(args),
        "courses" => Ok(commands::parse_courses(args)),
        "viewcourse" | "vc" => commands::parse_view_course(args),
        "list" | "ls" => Ok(Command::List),
        "find" => commands::parse_find(args),
        "sort" => commands::parse_sort(args),
        "sortbday" | "sortbirthday" => Ok(Command::SortBirthday),
        "undo" => Ok(Command::Undo),
        "redo" => Ok(Command::Redo),
        "theme" => commands::parse_theme(args),
        "history" => Ok(Command::History),
        "help" => Ok(Command::Help),
        "exit" | "quit" => Ok(Command::Exit),
        unknown => Err(ParseError::UnknownCommand(unknown.to_string())),
    }
}

#[cfg(test)]
mod tests;
