//! One interactive session: parse, execute, record, persist.

use tracing::{debug, info, warn};

use crate::book::CourseBook;
use crate::command::{CommandError, CommandResult, PendingConfirmation};
use crate::error::ErrorCode;
use crate::history::CommandHistory;
use crate::manager::Model;
use crate::parser::{parse_command, ParseError};
use crate::sample::sample_course_book;
use crate::storage::CourseBookStorage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

impl SessionError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Parse(err) => err.code(),
            Self::Command(err) => err.code(),
        }
    }
}

#[derive(Debug)]
pub struct Session<S> {
    model: Model,
    history: CommandHistory,
    storage: S,
    saved_revision: u64,
}

impl<S: CourseBookStorage> Session<S> {
    /// Start from whatever `storage` holds.
    ///
    /// Nothing stored yet: the sample book when `load_sample_data` is set,
    /// otherwise an empty one. Unreadable data: an empty book, with a
    /// warning; the stored data is only overwritten by the next change.
    pub fn open(storage: S, load_sample_data: bool) -> Self {
        let book = match storage.load() {
            Ok(Some(book)) => book,
            Ok(None) if load_sample_data => {
                info!("no saved course book, starting from sample data");
                sample_course_book()
            }
            Ok(None) => CourseBook::new(),
            Err(err) => {
                warn!(error = %err, code = %err.code(), "could not load course book, starting empty");
                CourseBook::new()
            }
        };
        Self::with_model(Model::new(book), storage)
    }

    /// Start from a prepared model; nothing is loaded.
    pub fn with_model(model: Model, storage: S) -> Self {
        Self {
            saved_revision: model.revision(),
            model,
            history: CommandHistory::new(),
            storage,
        }
    }

    #[must_use]
    pub const fn model(&self) -> &Model {
        &self.model
    }

    #[must_use]
    pub const fn history(&self) -> &CommandHistory {
        &self.history
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Run one line of input.
    ///
    /// The raw line is added to the history whatever the outcome. When the
    /// command changed the book it is saved; a failed save is reported as
    /// [`CommandError::Io`] and the change stays in memory.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Parse`] for malformed input and
    /// [`SessionError::Command`] when the command is rejected or the save
    /// fails.
    pub fn execute(&mut self, input: &str) -> Result<CommandResult, SessionError> {
        let outcome = self.run(input);
        self.history.add(input);
        if let Err(err) = &outcome {
            debug!(input, code = %err.code(), "command failed");
        }
        outcome
    }

    fn run(&mut self, input: &str) -> Result<CommandResult, SessionError> {
        let command = parse_command(input)?;
        let result = command.execute(&mut self.model, &self.history)?;
        self.persist()?;
        Ok(result)
    }

    /// Carry out a delete the user has agreed to. Not added to the history.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Command`] when a candidate has gone from the
    /// book since the request, or the save fails.
    pub fn confirm(&mut self, pending: &PendingConfirmation) -> Result<CommandResult, SessionError> {
        let result = pending
            .confirm_command()
            .execute(&mut self.model, &self.history)?;
        self.persist()?;
        Ok(result)
    }

    fn persist(&mut self) -> Result<(), CommandError> {
        if self.model.revision() == self.saved_revision {
            return Ok(());
        }
        self.storage
            .save(self.model.course_book())
            .map_err(|err| CommandError::Io(err.to_string()))?;
        self.saved_revision = self.model.revision();
        Ok(())
    }
}
