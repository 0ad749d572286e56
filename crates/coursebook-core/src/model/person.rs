use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::birthday::Birthday;
use super::course::{Course, CourseCode, CourseColor};
use super::fields::{Address, Email, Name, Phone, Tag};

/// A person record.
///
/// Values are never edited in place: every `with_*` method consumes or
/// clones the person and returns a new value, and the store swaps the old
/// value for the new one.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Person {
    name: Name,
    phone: Phone,
    email: Email,
    address: Address,
    #[serde(default)]
    tags: BTreeSet<Tag>,
    #[serde(default)]
    courses: BTreeSet<Course>,
    #[serde(default)]
    birthday: Option<Birthday>,
    #[serde(default)]
    favourite: bool,
}

impl Person {
    #[must_use]
    pub const fn new(name: Name, phone: Phone, email: Email, address: Address) -> Self {
        Self {
            name,
            phone,
            email,
            address,
            tags: BTreeSet::new(),
            courses: BTreeSet::new(),
            birthday: None,
            favourite: false,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: Name) -> Self {
        self.name = name;
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: Phone) -> Self {
        self.phone = phone;
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: Email) -> Self {
        self.email = email;
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_courses(mut self, courses: impl IntoIterator<Item = Course>) -> Self {
        self.courses = courses.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_birthday(mut self, birthday: Option<Birthday>) -> Self {
        self.birthday = birthday;
        self
    }

    #[must_use]
    pub fn with_favourite(mut self, favourite: bool) -> Self {
        self.favourite = favourite;
        self
    }

    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    #[must_use]
    pub const fn phone(&self) -> &Phone {
        &self.phone
    }

    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    #[must_use]
    pub const fn address(&self) -> &Address {
        &self.address
    }

    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    #[must_use]
    pub const fn courses(&self) -> &BTreeSet<Course> {
        &self.courses
    }

    #[must_use]
    pub const fn birthday(&self) -> Option<Birthday> {
        self.birthday
    }

    #[must_use]
    pub const fn is_favourite(&self) -> bool {
        self.favourite
    }

    /// Look up one of this person's courses by code.
    #[must_use]
    pub fn course(&self, code: &CourseCode) -> Option<&Course> {
        self.courses.iter().find(|course| &course.code == code)
    }

    #[must_use]
    pub fn has_course(&self, code: &CourseCode) -> bool {
        self.course(code).is_some()
    }

    /// Copy of this person with the given course (if taken) redrawn in `color`.
    #[must_use]
    pub fn with_course_color(&self, code: &CourseCode, color: CourseColor) -> Self {
        let courses = self
            .courses
            .iter()
            .map(|course| {
                if &course.code == code {
                    course.with_color(color)
                } else {
                    course.clone()
                }
            })
            .collect();
        Self {
            courses,
            ..self.clone()
        }
    }

    /// Identity test used for duplicate detection.
    ///
    /// Two records denote the same person when name (ignoring case), phone
    /// and email (ignoring case) all match. Tags, courses, birthday and the
    /// favourite flag are not part of identity.
    #[must_use]
    pub fn is_same_person(&self, other: &Self) -> bool {
        self.name.eq_ignore_case(&other.name)
            && self.phone == other.phone
            && self.email.eq_ignore_case(&other.email)
    }
}

/// Full structural equality, including course colours.
impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.phone == other.phone
            && self.email == other.email
            && self.address == other.address
            && self.tags == other.tags
            && self.birthday == other.birthday
            && self.favourite == other.favourite
            && self.courses.len() == other.courses.len()
            && self
                .courses
                .iter()
                .zip(&other.courses)
                .all(|(a, b)| a.code == b.code && a.color == b.color)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}; Phone: {}; Email: {}; Address: {}",
            self.name, self.phone, self.email, self.address
        )?;
        if let Some(birthday) = self.birthday {
            write!(f, "; Birthday: {birthday}")?;
        }
        if !self.tags.is_empty() {
            let tags: Vec<&str> = self.tags.iter().map(Tag::as_str).collect();
            write!(f, "; Tags: {}", tags.join(", "))?;
        }
        if !self.courses.is_empty() {
            let courses: Vec<&str> = self.courses.iter().map(|c| c.code.as_str()).collect();
            write!(f, "; Courses: {}", courses.join(", "))?;
        }
        if self.favourite {
            f.write_str("; Favourite")?;
        }
        Ok(())
    }
}
