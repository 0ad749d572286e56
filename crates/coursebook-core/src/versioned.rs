//! Snapshot-based undo/redo over a [`CourseBook`].
//!
//! The versioned book keeps a linear list of full snapshots and a cursor:
//!
//! ```text
//! states:  [S0] [S1] [S2]
//! cursor:             ^
//! ```
//!
//! - `commit` drops every snapshot after the cursor, appends the live book
//!   and moves the cursor onto it. Redo history is lost on a fresh commit.
//! - `undo` / `redo` move the cursor one step and reload the live book from
//!   the snapshot under it.
//!
//! Mutations only touch the live book. A command that mutates but never
//! commits leaves the change in place without an undo point.

use tracing::debug;

use crate::book::{CourseBook, StoreError};
use crate::model::{CourseCode, CourseColor, Person, Theme};

/// Undo or redo requested with nothing to move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("no earlier state to undo to")]
    NoUndo,
    #[error("no later state to redo to")]
    NoRedo,
}

#[derive(Debug, Clone)]
pub struct VersionedCourseBook {
    live: CourseBook,
    states: Vec<CourseBook>,
    cursor: usize,
}

impl VersionedCourseBook {
    /// Start a history whose only snapshot is `initial`.
    #[must_use]
    pub fn new(initial: CourseBook) -> Self {
        Self {
            states: vec![initial.clone()],
            live: initial,
            cursor: 0,
        }
    }

    /// The live (possibly uncommitted) book.
    #[must_use]
    pub const fn live(&self) -> &CourseBook {
        &self.live
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of snapshots held, always at least one.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Snapshot at `index`, if any.
    #[must_use]
    pub fn state(&self, index: usize) -> Option<&CourseBook> {
        self.states.get(index)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateEntity`] on an identity-duplicate.
    pub fn add(&mut self, person: Person) -> Result<(), StoreError> {
        self.live.add(person)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when `person` is not stored.
    pub fn remove(&mut self, person: &Person) -> Result<(), StoreError> {
        self.live.remove(person)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when `target` is not stored.
    pub fn replace(&mut self, target: &Person, replacement: Person) -> Result<(), StoreError> {
        self.live.replace(target, replacement)
    }

    pub fn set_course_color(&mut self, code: &CourseCode, color: CourseColor) -> usize {
        self.live.set_course_color(code, color)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.live.set_theme(theme);
    }

    /// Replace the live book wholesale. Snapshots are untouched until the
    /// next commit.
    pub fn reset(&mut self, book: CourseBook) {
        self.live = book;
    }

    /// Record the live book as a new snapshot.
    pub fn commit(&mut self) {
        self.states.truncate(self.cursor + 1);
        self.states.push(self.live.clone());
        self.cursor += 1;
        debug!(cursor = self.cursor, states = self.states.len(), "committed course book state");
    }

    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.states.len()
    }

    /// Step back one snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NoUndo`] when already at the first snapshot.
    pub fn undo(&mut self) -> Result<(), HistoryError> {
        if !self.can_undo() {
            return Err(HistoryError::NoUndo);
        }
        self.cursor -= 1;
        self.reload();
        debug!(cursor = self.cursor, "undo");
        Ok(())
    }

    /// Step forward one snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NoRedo`] when already at the last snapshot.
    pub fn redo(&mut self) -> Result<(), HistoryError> {
        if !self.can_redo() {
            return Err(HistoryError::NoRedo);
        }
        self.cursor += 1;
        self.reload();
        debug!(cursor = self.cursor, "redo");
        Ok(())
    }

    fn reload(&mut self) {
        self.live.clone_from(&self.states[self.cursor]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{alice, benson, carl};

    fn book_with(persons: &[Person]) -> CourseBook {
        CourseBook::from_persons(persons.to_vec(), Theme::Dark).unwrap()
    }

    #[test]
    fn new_has_single_state() {
        let v = VersionedCourseBook::new(CourseBook::new());
        assert_eq!(v.state_count(), 1);
        assert_eq!(v.cursor(), 0);
        assert!(!v.can_undo());
        assert!(!v.can_redo());
    }

    #[test]
    fn commit_appends_and_advances() {
        let mut v = VersionedCourseBook::new(CourseBook::new());
        v.add(alice()).unwrap();
        v.commit();
        assert_eq!(v.state_count(), 2);
        assert_eq!(v.cursor(), 1);
        assert_eq!(v.state(1), Some(&book_with(&[alice()])));
    }

    #[test]
    fn undo_then_redo_restores_state() {
        let mut v = VersionedCourseBook::new(CourseBook::new());
        v.add(alice()).unwrap();
        v.commit();
        v.add(benson()).unwrap();
        v.commit();

        let before = v.live().clone();
        v.undo().unwrap();
        assert_eq!(v.live(), &book_with(&[alice()]));
        v.redo().unwrap();
        assert_eq!(v.live(), &before);
    }

    #[test]
    fn commit_after_undo_discards_redo_states() {
        let mut v = VersionedCourseBook::new(CourseBook::new());
        v.add(alice()).unwrap();
        v.commit();
        v.add(benson()).unwrap();
        v.commit();
        assert_eq!(v.state_count(), 3);

        v.undo().unwrap();
        v.add(carl()).unwrap();
        v.commit();

        assert_eq!(v.state_count(), 3);
        assert_eq!(v.cursor(), 2);
        assert_eq!(v.state(2), Some(&book_with(&[alice(), carl()])));
        assert_eq!(v.redo(), Err(HistoryError::NoRedo));
    }

    #[test]
    fn guards_fail_at_edges() {
        let mut v = VersionedCourseBook::new(CourseBook::new());
        assert_eq!(v.undo(), Err(HistoryError::NoUndo));
        assert_eq!(v.redo(), Err(HistoryError::NoRedo));
        assert_eq!(v.state_count(), 1);
    }

    #[test]
    fn uncommitted_change_is_dropped_by_undo() {
        let mut v = VersionedCourseBook::new(CourseBook::new());
        v.add(alice()).unwrap();
        v.commit();
        v.add(benson()).unwrap();
        v.undo().unwrap();
        assert!(v.live().is_empty());
        v.redo().unwrap();
        assert_eq!(v.live(), &book_with(&[alice()]));
    }

    #[test]
    fn theme_participates_in_history() {
        let mut v = VersionedCourseBook::new(CourseBook::new());
        v.set_theme(Theme::Light);
        v.commit();
        v.undo().unwrap();
        assert_eq!(v.live().theme(), Theme::Dark);
        v.redo().unwrap();
        assert_eq!(v.live().theme(), Theme::Light);
    }
}
