use std::fmt::Write as _;

use super::{CommandError, CommandResult, Directive};
use crate::history::CommandHistory;
use crate::manager::Model;
use crate::model::Theme;

pub const MESSAGE_UNDO_SUCCESS: &str = "Undo success!";
pub const MESSAGE_REDO_SUCCESS: &str = "Redo success!";
pub const MESSAGE_UNDO_FAILURE: &str = "No more commands to undo!";
pub const MESSAGE_REDO_FAILURE: &str = "No more commands to redo!";
pub const MESSAGE_NO_HISTORY: &str = "You have not yet entered any commands.";
pub const MESSAGE_EXIT: &str = "Exiting CourseBook as requested ...";

pub const HELP_TEXT: &str = "\
Commands:
  add n/NAME p/PHONE e/EMAIL a/ADDRESS [b/DD-MM-YYYY] [t/TAG]... [c/CODE[,COLOR]]...
  edit INDEX [n/NAME] [p/PHONE] [e/EMAIL] [a/ADDRESS] [b/DD-MM-YYYY] [t/TAG]...
  delete INDEX [INDEX]...  |  delete NAME
  clear
  fav INDEX|NAME           unfav INDEX|NAME         view INDEX|NAME
  addcourse INDEX c/CODE[,COLOR]...
  removecourse INDEX c/CODE...
  coursecolor c/CODE,COLOR
  courses [KEYWORD]...     viewcourse CODE
  list                     find KEYWORD...  |  find [n/..] [p/..] [e/..] [a/..] [t/..] [c/..]
  sort [asc|desc]          sortbday
  undo                     redo
  theme light|dark         history
  help                     exit";

/// Emit a theme directive when undo/redo moved the theme.
fn theme_directive(before: Theme, after: Theme) -> Directive {
    if before == after {
        Directive::ShowPersons
    } else {
        change_theme(after)
    }
}

fn change_theme(theme: Theme) -> Directive {
    Directive::ChangeTheme {
        stylesheet: theme.stylesheet().to_string(),
        extensions: theme.extensions().to_string(),
    }
}

pub(super) fn undo(model: &mut Model) -> Result<CommandResult, CommandError> {
    let before = model.theme();
    model
        .undo()
        .map_err(|_| CommandError::NoHistory(MESSAGE_UNDO_FAILURE))?;
    Ok(CommandResult::new(MESSAGE_UNDO_SUCCESS).with_directive(theme_directive(before, model.theme())))
}

pub(super) fn redo(model: &mut Model) -> Result<CommandResult, CommandError> {
    let before = model.theme();
    model
        .redo()
        .map_err(|_| CommandError::NoHistory(MESSAGE_REDO_FAILURE))?;
    Ok(CommandResult::new(MESSAGE_REDO_SUCCESS).with_directive(theme_directive(before, model.theme())))
}

pub(super) fn theme(model: &mut Model, theme: Theme) -> Result<CommandResult, CommandError> {
    if model.theme() == theme {
        return Err(CommandError::AlreadySet(format!("Theme is already {theme}")));
    }
    model.set_theme(theme);
    model.commit();
    Ok(CommandResult::new(format!("Theme changed to {theme}")).with_directive(change_theme(theme)))
}

pub(super) fn history(history: &CommandHistory) -> CommandResult {
    if history.is_empty() {
        return CommandResult::new(MESSAGE_NO_HISTORY);
    }
    let mut feedback = String::from("Entered commands (from most recent to earliest):");
    for entry in history.newest_first() {
        let _ = write!(feedback, "\n{entry}");
    }
    CommandResult::new(feedback)
}

pub(super) fn help() -> CommandResult {
    CommandResult::new(HELP_TEXT).with_directive(Directive::ShowHelp)
}

pub(super) fn exit() -> CommandResult {
    CommandResult::new(MESSAGE_EXIT).with_directive(Directive::Exit)
}
