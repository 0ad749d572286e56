//! Commands: one enum variant per user action, executed against the
//! [`Model`] and the session's [`CommandHistory`].
//!
//! Every variant carries exactly the data it needs; [`Command::execute`] is
//! the single entry point and dispatches with an exhaustive `match`, so a new
//! variant cannot be added without handling it.
//!
//! Failing commands leave the model untouched. Commands that change data
//! commit a snapshot themselves; sort and filter commands never do.

mod course;
mod general;
mod listing;
mod person;

pub use general::{HELP_TEXT, MESSAGE_REDO_FAILURE, MESSAGE_UNDO_FAILURE};

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::ErrorCode;
use crate::history::CommandHistory;
use crate::manager::Model;
use crate::model::{
    Address, Birthday, CourseCode, CourseColor, CourseSpec, Email, Name, Person, Phone, Tag, Theme,
};
use crate::view::{CourseFilter, FindQuery, SortDirection};

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Zero-based position in the visible person list.
///
/// Users type one-based indices; the parser converts on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Index(usize);

impl Index {
    #[must_use]
    pub const fn from_zero_based(value: usize) -> Self {
        Self(value)
    }

    /// Convert a one-based index. Returns `None` for zero.
    #[must_use]
    pub const fn from_one_based(value: usize) -> Option<Self> {
        match value.checked_sub(1) {
            Some(zero) => Some(Self(zero)),
            None => None,
        }
    }

    #[must_use]
    pub const fn zero_based(self) -> usize {
        self.0
    }

    #[must_use]
    pub const fn one_based(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.one_based())
    }
}

/// A single person picked by list index or by full name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Index(Index),
    Name(Name),
}

/// Persons picked for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Indices(Vec<Index>),
    Name(Name),
}

/// A person as typed into `add`, before course colours are settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: Name,
    pub phone: Phone,
    pub email: Email,
    pub address: Address,
    pub birthday: Option<Birthday>,
    pub tags: BTreeSet<Tag>,
    pub courses: Vec<CourseSpec>,
}

impl PersonDraft {
    /// The draft without its courses, for duplicate checks.
    #[must_use]
    pub fn base_person(&self) -> Person {
        Person::new(
            self.name.clone(),
            self.phone.clone(),
            self.email.clone(),
            self.address.clone(),
        )
        .with_birthday(self.birthday)
        .with_tags(self.tags.iter().cloned())
    }
}

/// Fields to overwrite in `edit`; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditDescriptor {
    pub name: Option<Name>,
    pub phone: Option<Phone>,
    pub email: Option<Email>,
    pub address: Option<Address>,
    pub birthday: Option<Birthday>,
    pub tags: Option<BTreeSet<Tag>>,
}

impl EditDescriptor {
    #[must_use]
    pub const fn is_any_field_edited(&self) -> bool {
        self.name.is_some()
            || self.phone.is_some()
            || self.email.is_some()
            || self.address.is_some()
            || self.birthday.is_some()
            || self.tags.is_some()
    }

    /// Copy of `person` with the edited fields swapped in.
    #[must_use]
    pub fn apply(&self, person: &Person) -> Person {
        let mut edited = person.clone();
        if let Some(name) = &self.name {
            edited = edited.with_name(name.clone());
        }
        if let Some(phone) = &self.phone {
            edited = edited.with_phone(phone.clone());
        }
        if let Some(email) = &self.email {
            edited = edited.with_email(email.clone());
        }
        if let Some(address) = &self.address {
            edited = edited.with_address(address.clone());
        }
        if let Some(birthday) = self.birthday {
            edited = edited.with_birthday(Some(birthday));
        }
        if let Some(tags) = &self.tags {
            edited = edited.with_tags(tags.iter().cloned());
        }
        edited
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(PersonDraft),
    Edit {
        index: Index,
        edit: EditDescriptor,
    },
    Delete(DeleteTarget),
    Clear,
    /// Second phase of `delete` / `clear`, issued by the front-end once the
    /// user has confirmed.
    ConfirmDelete(Vec<Person>),
    Favourite(Target),
    Unfavourite(Target),
    View(Target),
    EditCourseColor {
        code: Option<CourseCode>,
        color: Option<CourseColor>,
    },
    AddCourse {
        index: Index,
        courses: Vec<CourseSpec>,
    },
    RemoveCourse {
        index: Index,
        courses: Vec<CourseCode>,
    },
    Courses(CourseFilter),
    ViewCourse(CourseCode),
    List,
    Find(FindQuery),
    Sort(SortDirection),
    SortBirthday,
    Undo,
    Redo,
    Theme(Theme),
    History,
    Help,
    Exit,
}

impl Command {
    /// Run the command.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] when the command is rejected by the
    /// current state; the model is left as it was.
    pub fn execute(
        &self,
        model: &mut Model,
        history: &CommandHistory,
    ) -> Result<CommandResult, CommandError> {
        match self {
            Self::Add(draft) => person::add(model, draft),
            Self::Edit { index, edit } => person::edit(model, *index, edit),
            Self::Delete(target) => person::delete(model, target),
            Self::Clear => person::clear(model),
            Self::ConfirmDelete(candidates) => person::confirm_delete(model, candidates),
            Self::Favourite(target) => person::set_favourite(model, target, true),
            Self::Unfavourite(target) => person::set_favourite(model, target, false),
            Self::View(target) => person::view(model, target),
            Self::EditCourseColor { code, color } => {
                course::edit_color(model, code.as_ref(), *color)
            }
            Self::AddCourse { index, courses } => course::add_courses(model, *index, courses),
            Self::RemoveCourse { index, courses } => {
                course::remove_courses(model, *index, courses)
            }
            Self::Courses(filter) => course::list_courses(model, filter),
            Self::ViewCourse(code) => course::view_course(model, code),
            Self::List => Ok(listing::list(model)),
            Self::Find(query) => Ok(listing::find(model, query)),
            Self::Sort(direction) => Ok(listing::sort_by_name(model, *direction)),
            Self::SortBirthday => Ok(listing::sort_by_birthday(model)),
            Self::Undo => general::undo(model),
            Self::Redo => general::redo(model),
            Self::Theme(theme) => general::theme(model, *theme),
            Self::History => Ok(general::history(history)),
            Self::Help => Ok(general::help()),
            Self::Exit => Ok(general::exit()),
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Destructive request waiting for the user's go-ahead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingConfirmation {
    pub candidates: Vec<Person>,
    pub summary: String,
}

impl PendingConfirmation {
    /// The command that carries out the confirmed request.
    #[must_use]
    pub fn confirm_command(&self) -> Command {
        Command::ConfirmDelete(self.candidates.clone())
    }
}

/// What the presentation layer should do after showing the feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    #[default]
    None,
    ShowHelp,
    Exit,
    ShowPersons,
    ShowCourses,
    ShowPerson {
        person: Person,
    },
    ChangeTheme {
        stylesheet: String,
        extensions: String,
    },
    PendingConfirmation(PendingConfirmation),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub feedback: String,
    pub directive: Directive,
}

impl CommandResult {
    #[must_use]
    pub fn new(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            directive: Directive::None,
        }
    }

    #[must_use]
    pub fn with_directive(mut self, directive: Directive) -> Self {
        self.directive = directive;
        self
    }

    #[must_use]
    pub const fn pending_confirmation(&self) -> Option<&PendingConfirmation> {
        match &self.directive {
            Directive::PendingConfirmation(pending) => Some(pending),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_exit(&self) -> bool {
        matches!(self.directive, Directive::Exit)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A well-formed command rejected by the current state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("This person already exists in the course book")]
    DuplicateEntity,
    #[error("The person could not be found in the course book")]
    NotFound,
    #[error("The person index {index} is invalid; the list shows {size} persons")]
    InvalidIndex { index: usize, size: usize },
    #[error("{0}")]
    NoMatch(String),
    #[error("More than one person is named {name}; use an index instead:\n{listing}")]
    AmbiguousMatch { name: String, listing: String },
    #[error("{0}")]
    AlreadyInState(String),
    #[error("{0}")]
    AlreadySet(String),
    #[error("Missing {0}")]
    MissingArgument(&'static str),
    #[error("{0} already takes all of these courses")]
    NoNewCourses(String),
    #[error("{0}")]
    NoHistory(&'static str),
    #[error("Could not save the course book: {0}")]
    Io(String),
}

impl CommandError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateEntity => ErrorCode::DuplicateEntity,
            Self::NotFound => ErrorCode::NotFound,
            Self::InvalidIndex { .. } => ErrorCode::InvalidIndex,
            Self::NoMatch(_) => ErrorCode::NoMatch,
            Self::AmbiguousMatch { .. } => ErrorCode::AmbiguousMatch,
            Self::AlreadyInState(_) => ErrorCode::AlreadyInState,
            Self::AlreadySet(_) => ErrorCode::AlreadySet,
            Self::MissingArgument(_) => ErrorCode::MissingArgument,
            Self::NoNewCourses(_) => ErrorCode::NoNewCourses,
            Self::NoHistory(_) => ErrorCode::NoHistory,
            Self::Io(_) => ErrorCode::StorageFailed,
        }
    }
}

impl From<crate::book::StoreError> for CommandError {
    fn from(err: crate::book::StoreError) -> Self {
        match err {
            crate::book::StoreError::DuplicateEntity => Self::DuplicateEntity,
            crate::book::StoreError::NotFound => Self::NotFound,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared lookups
// ---------------------------------------------------------------------------

/// Person at `index` in the visible list.
fn person_at(model: &Model, index: Index) -> Result<Person, CommandError> {
    let visible = model.filtered_persons();
    visible
        .get(index.zero_based())
        .map(|person| (*person).clone())
        .ok_or(CommandError::InvalidIndex {
            index: index.one_based(),
            size: visible.len(),
        })
}

/// Every stored person whose full name equals `name`, ignoring case.
fn persons_named(model: &Model, name: &Name) -> Vec<Person> {
    model
        .course_book()
        .persons()
        .iter()
        .filter(|person| person.name().eq_ignore_case(name))
        .cloned()
        .collect()
}

/// Resolve a single target, failing on zero or several name matches.
fn resolve_target(model: &Model, target: &Target) -> Result<Person, CommandError> {
    match target {
        Target::Index(index) => person_at(model, *index),
        Target::Name(name) => {
            let mut matches = persons_named(model, name);
            match matches.len() {
                0 => Err(no_person_named(name)),
                1 => Ok(matches.remove(0)),
                _ => Err(ambiguous(model, name, &matches)),
            }
        }
    }
}

fn no_person_named(name: &Name) -> CommandError {
    CommandError::NoMatch(format!("No person named {name} was found"))
}

fn ambiguous(model: &Model, name: &Name, matches: &[Person]) -> CommandError {
    CommandError::AmbiguousMatch {
        name: name.to_string(),
        listing: render_match_list(model, matches),
    }
}

/// One line per match, numbered by its position in the visible list, or
/// bulleted when the match is filtered out.
fn render_match_list(model: &Model, matches: &[Person]) -> String {
    let visible = model.filtered_persons();
    matches
        .iter()
        .map(|person| {
            let detail = format!("{} ({}, {})", person.name(), person.phone(), person.email());
            visible
                .iter()
                .position(|shown| *shown == person)
                .map_or_else(|| format!("- {detail}"), |pos| format!("{}. {detail}", pos + 1))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
