//! The course book: an ordered, duplicate-free list of persons plus the
//! active theme.

use serde::{Deserialize, Serialize};

use crate::model::{CourseCode, CourseColor, Person, Theme};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Rejected store mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Another record already has the same name, phone and email.
    #[error("This person already exists in the course book")]
    DuplicateEntity,
    /// The record to remove or replace is not in the store.
    #[error("The person could not be found in the course book")]
    NotFound,
}

// ---------------------------------------------------------------------------
// CourseBook
// ---------------------------------------------------------------------------

/// Ordered collection of [`Person`] records.
///
/// No two entries are identity-duplicates of each other (see
/// [`Person::is_same_person`]); [`CourseBook::add`] enforces this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseBook {
    #[serde(default)]
    persons: Vec<Person>,
    #[serde(default)]
    theme: Theme,
}

impl CourseBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty book in `theme`.
    #[must_use]
    pub const fn with_theme(theme: Theme) -> Self {
        Self {
            persons: Vec::new(),
            theme,
        }
    }

    /// Build a book from a list, rejecting identity-duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateEntity`] on the first duplicate found.
    pub fn from_persons(
        persons: impl IntoIterator<Item = Person>,
        theme: Theme,
    ) -> Result<Self, StoreError> {
        let mut book = Self {
            persons: Vec::new(),
            theme,
        };
        for person in persons {
            book.add(person)?;
        }
        Ok(book)
    }

    #[must_use]
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Whether an identity-duplicate of `person` is stored.
    #[must_use]
    pub fn has_person(&self, person: &Person) -> bool {
        self.persons.iter().any(|p| p.is_same_person(person))
    }

    /// Append a person.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateEntity`] if an identity-duplicate is
    /// already stored.
    pub fn add(&mut self, person: Person) -> Result<(), StoreError> {
        if self.has_person(&person) {
            return Err(StoreError::DuplicateEntity);
        }
        self.persons.push(person);
        Ok(())
    }

    /// Remove the entry equal to `person`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no stored entry equals `person`.
    pub fn remove(&mut self, person: &Person) -> Result<(), StoreError> {
        let pos = self.position(person).ok_or(StoreError::NotFound)?;
        self.persons.remove(pos);
        Ok(())
    }

    /// Swap `target` for `replacement`, keeping its position.
    ///
    /// Only the presence of `target` is checked. `replacement` is not
    /// compared against the other entries; callers that change identity
    /// fields must check for duplicates themselves.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no stored entry equals `target`.
    pub fn replace(&mut self, target: &Person, replacement: Person) -> Result<(), StoreError> {
        let pos = self.position(target).ok_or(StoreError::NotFound)?;
        self.persons[pos] = replacement;
        Ok(())
    }

    /// Colour currently used for `code`, if anyone takes that course.
    #[must_use]
    pub fn course_color(&self, code: &CourseCode) -> Option<CourseColor> {
        self.persons
            .iter()
            .find_map(|p| p.course(code))
            .map(|course| course.color)
    }

    /// Redraw `code` in `color` for every person taking it.
    ///
    /// Returns the number of persons touched; zero when nobody takes the
    /// course.
    pub fn set_course_color(&mut self, code: &CourseCode, color: CourseColor) -> usize {
        let mut touched = 0;
        for person in &mut self.persons {
            if person.has_course(code) {
                *person = person.with_course_color(code, color);
                touched += 1;
            }
        }
        touched
    }

    fn position(&self, person: &Person) -> Option<usize> {
        self.persons.iter().position(|p| p == person)
    }
}
