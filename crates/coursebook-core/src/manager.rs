//! [`Model`]: the versioned course book together with its live views.
//!
//! Commands never touch the versioned book directly; they go through the
//! model so that structural changes reset the person ordering and bump the
//! revision counter front-ends use to decide whether to persist.

use chrono::{Local, NaiveDate};

use crate::book::{CourseBook, StoreError};
use crate::model::{Course, CourseCode, CourseColor, CourseSpec, Person, Theme};
use crate::versioned::{HistoryError, VersionedCourseBook};
use crate::view::{course_roster, CourseEntry, CourseFilter, PersonFilter, PersonOrder, PersonView};

#[derive(Debug, Clone)]
pub struct Model {
    book: VersionedCourseBook,
    persons: PersonView,
    courses: CourseFilter,
    revision: u64,
    pinned_today: Option<NaiveDate>,
}

impl Model {
    #[must_use]
    pub fn new(initial: CourseBook) -> Self {
        Self {
            book: VersionedCourseBook::new(initial),
            persons: PersonView::default(),
            courses: CourseFilter::default(),
            revision: 0,
            pinned_today: None,
        }
    }

    /// Fix the date birthday ordering is measured from.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.pinned_today = Some(today);
        self
    }

    /// Today's date in local time, unless pinned with [`Model::with_today`].
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.pinned_today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// The live course book.
    #[must_use]
    pub const fn course_book(&self) -> &CourseBook {
        self.book.live()
    }

    /// Counter that moves on every change to the live book.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.book.live().theme()
    }

    // -- store ------------------------------------------------------------

    #[must_use]
    pub fn has_person(&self, person: &Person) -> bool {
        self.book.live().has_person(person)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateEntity`] on an identity-duplicate.
    pub fn add_person(&mut self, person: Person) -> Result<(), StoreError> {
        self.book.add(person)?;
        self.structural_change();
        self.persons.set_filter(PersonFilter::All);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when `person` is not stored.
    pub fn delete_person(&mut self, person: &Person) -> Result<(), StoreError> {
        self.book.remove(person)?;
        self.structural_change();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when `target` is not stored.
    pub fn set_person(&mut self, target: &Person, replacement: Person) -> Result<(), StoreError> {
        self.book.replace(target, replacement)?;
        self.revision += 1;
        Ok(())
    }

    pub fn set_course_color(&mut self, code: &CourseCode, color: CourseColor) -> usize {
        let touched = self.book.set_course_color(code, color);
        if touched > 0 {
            self.revision += 1;
        }
        touched
    }

    #[must_use]
    pub fn course_color(&self, code: &CourseCode) -> Option<CourseColor> {
        self.book.live().course_color(code)
    }

    /// Turn a typed course into a stored one, settling its colour.
    ///
    /// - code already in use, no colour given: adopt the colour in use;
    /// - code already in use, different colour given: recolour it globally;
    /// - code new to the book, no colour given: default colour.
    pub fn resolve_course(&mut self, spec: &CourseSpec) -> Course {
        let color = match (self.course_color(&spec.code), spec.color) {
            (Some(existing), None) => existing,
            (Some(existing), Some(requested)) => {
                if existing != requested {
                    self.set_course_color(&spec.code, requested);
                }
                requested
            }
            (None, requested) => requested.unwrap_or_default(),
        };
        Course::new(spec.code.clone(), color)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.book.set_theme(theme);
        self.revision += 1;
    }

    /// Replace the live book's contents. Like a removal, the filter stays.
    pub fn reset(&mut self, book: CourseBook) {
        self.book.reset(book);
        self.structural_change();
    }

    // -- history ----------------------------------------------------------

    pub fn commit(&mut self) {
        self.book.commit();
    }

    #[must_use]
    pub const fn can_undo(&self) -> bool {
        self.book.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.book.can_redo()
    }

    /// # Errors
    ///
    /// Returns [`HistoryError::NoUndo`] at the first snapshot.
    pub fn undo(&mut self) -> Result<(), HistoryError> {
        self.book.undo()?;
        self.structural_change();
        self.persons.set_filter(PersonFilter::All);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`HistoryError::NoRedo`] at the last snapshot.
    pub fn redo(&mut self) -> Result<(), HistoryError> {
        self.book.redo()?;
        self.structural_change();
        self.persons.set_filter(PersonFilter::All);
        Ok(())
    }

    // -- views ------------------------------------------------------------

    /// Persons currently visible, in display order.
    #[must_use]
    pub fn filtered_persons(&self) -> Vec<&Person> {
        self.persons.apply(self.book.live().persons())
    }

    #[must_use]
    pub const fn person_filter(&self) -> &PersonFilter {
        self.persons.filter()
    }

    #[must_use]
    pub const fn person_order(&self) -> Option<PersonOrder> {
        self.persons.order()
    }

    pub fn update_filtered_persons(&mut self, filter: PersonFilter) {
        self.persons.set_filter(filter);
    }

    pub fn sort_filtered_persons(&mut self, order: PersonOrder) {
        self.persons.sort_by(order);
    }

    /// Distinct courses visible in the roster.
    #[must_use]
    pub fn filtered_courses(&self) -> Vec<CourseEntry> {
        course_roster(self.book.live(), &self.courses)
    }

    pub fn update_filtered_courses(&mut self, filter: CourseFilter) {
        self.courses = filter;
    }

    fn structural_change(&mut self) {
        self.revision += 1;
        self.persons.clear_order();
    }
}
