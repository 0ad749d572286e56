//! Filtered and sorted projections of the course book.
//!
//! A [`PersonView`] holds only a predicate and an optional order; the
//! visible list is recomputed from the live book every time it is asked
//! for, so it can never drift from the store. The course roster is derived
//! the same way from the distinct courses referenced by any person.

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::book::CourseBook;
use crate::model::{CourseCode, CourseColor, Person};

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Keywords per field for `find`.
///
/// A person matches when any keyword of any field is a case-insensitive
/// substring of that field (OR across fields, OR within a field).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindQuery {
    pub names: Vec<String>,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
    pub addresses: Vec<String>,
    pub tags: Vec<String>,
    pub courses: Vec<String>,
}

impl FindQuery {
    /// Query that searches names only.
    #[must_use]
    pub fn by_name(keywords: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: keywords.into_iter().collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
            && self.phones.is_empty()
            && self.emails.is_empty()
            && self.addresses.is_empty()
            && self.tags.is_empty()
            && self.courses.is_empty()
    }

    #[must_use]
    pub fn matches(&self, person: &Person) -> bool {
        any_contains(&self.names, person.name().as_str())
            || any_contains(&self.phones, person.phone().as_str())
            || any_contains(&self.emails, person.email().as_str())
            || any_contains(&self.addresses, person.address().as_str())
            || person
                .tags()
                .iter()
                .any(|tag| any_contains(&self.tags, tag.as_str()))
            || person
                .courses()
                .iter()
                .any(|course| any_contains(&self.courses, course.code.as_str()))
    }
}

fn any_contains(keywords: &[String], haystack: &str) -> bool {
    if keywords.is_empty() {
        return false;
    }
    let haystack = haystack.to_lowercase();
    keywords
        .iter()
        .any(|keyword| haystack.contains(&keyword.to_lowercase()))
}

/// Which persons the view shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PersonFilter {
    #[default]
    All,
    Find(FindQuery),
    /// Persons taking the given course.
    HasCourse(CourseCode),
}

impl PersonFilter {
    #[must_use]
    pub fn matches(&self, person: &Person) -> bool {
        match self {
            Self::All => true,
            Self::Find(query) => query.matches(person),
            Self::HasCourse(code) => person.has_course(code),
        }
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// How the visible subset is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonOrder {
    /// Case-insensitive name order.
    Name(SortDirection),
    /// Soonest upcoming birthday first, counted from `reference`. Persons
    /// without a birthday go last.
    Birthday { reference: NaiveDate },
}

impl PersonOrder {
    #[must_use]
    pub fn compare(self, a: &Person, b: &Person) -> Ordering {
        match self {
            Self::Name(direction) => {
                let ord = a
                    .name()
                    .as_str()
                    .to_lowercase()
                    .cmp(&b.name().as_str().to_lowercase());
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            }
            Self::Birthday { reference } => {
                birthday_distance(a, reference).cmp(&birthday_distance(b, reference))
            }
        }
    }
}

fn birthday_distance(person: &Person, reference: NaiveDate) -> i64 {
    person
        .birthday()
        .map_or(i64::MAX, |birthday| birthday.days_until_next(reference))
}

// ---------------------------------------------------------------------------
// PersonView
// ---------------------------------------------------------------------------

/// Predicate plus optional order over the live person list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonView {
    filter: PersonFilter,
    order: Option<PersonOrder>,
}

impl PersonView {
    #[must_use]
    pub const fn filter(&self) -> &PersonFilter {
        &self.filter
    }

    #[must_use]
    pub const fn order(&self) -> Option<PersonOrder> {
        self.order
    }

    /// Replace the predicate. Any active order is dropped.
    pub fn set_filter(&mut self, filter: PersonFilter) {
        self.filter = filter;
        self.order = None;
    }

    pub const fn sort_by(&mut self, order: PersonOrder) {
        self.order = Some(order);
    }

    pub const fn clear_order(&mut self) {
        self.order = None;
    }

    /// The visible persons, in store order unless an order is active.
    #[must_use]
    pub fn apply<'a>(&self, persons: &'a [Person]) -> Vec<&'a Person> {
        let mut visible: Vec<&Person> = persons
            .iter()
            .filter(|person| self.filter.matches(person))
            .collect();
        if let Some(order) = self.order {
            visible.sort_by(|a, b| order.compare(a, b));
        }
        visible
    }
}

// ---------------------------------------------------------------------------
// Course roster
// ---------------------------------------------------------------------------

/// One distinct course in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseEntry {
    pub code: CourseCode,
    pub color: CourseColor,
    /// Number of persons taking the course.
    pub takers: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CourseFilter {
    #[default]
    All,
    /// Codes containing any of the keywords (case-insensitive).
    Keywords(Vec<String>),
}

impl CourseFilter {
    #[must_use]
    pub fn matches(&self, code: &CourseCode) -> bool {
        match self {
            Self::All => true,
            Self::Keywords(keywords) => any_contains(keywords, code.as_str()),
        }
    }
}

/// Distinct courses across the book, ordered by code.
#[must_use]
pub fn course_roster(book: &CourseBook, filter: &CourseFilter) -> Vec<CourseEntry> {
    let mut roster: BTreeMap<&CourseCode, CourseEntry> = BTreeMap::new();
    for person in book.persons() {
        for course in person.courses() {
            roster
                .entry(&course.code)
                .or_insert_with(|| CourseEntry {
                    code: course.code.clone(),
                    color: course.color,
                    takers: 0,
                })
                .takers += 1;
        }
    }
    roster
        .into_values()
        .filter(|entry| filter.matches(&entry.code))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{alice, benson, carl, code, course, person};
    use crate::model::{Birthday, Tag, Theme};

    fn names(visible: &[&Person]) -> Vec<String> {
        visible.iter().map(|p| p.name().to_string()).collect()
    }

    #[test]
    fn bare_find_matches_name_substring() {
        let bob = person("Bob Choo", "22222222", "bob@example.com");
        let persons = vec![alice(), bob];
        let filter = PersonFilter::Find(FindQuery::by_name(["ali".to_string()]));
        let view = PersonView {
            filter,
            order: None,
        };
        assert_eq!(names(&view.apply(&persons)), vec!["Alice Pauline"]);
    }

    #[test]
    fn find_is_or_across_and_within_fields() {
        let tagged = benson().with_tags([Tag::parse("owesMoney").unwrap()]);
        let persons = vec![alice(), tagged, carl()];
        let query = FindQuery {
            names: vec!["kurz".into(), "nobody".into()],
            tags: vec!["OWES".into()],
            ..FindQuery::default()
        };
        let matched: Vec<_> = persons.iter().filter(|p| query.matches(p)).collect();
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].name().as_str(), "Benson Meier");
        assert_eq!(matched[1].name().as_str(), "Carl Kurz");
    }

    #[test]
    fn find_on_course_codes() {
        let taking = alice().with_courses([course("CS2103T", CourseColor::Green)]);
        let query = FindQuery {
            courses: vec!["cs21".into()],
            ..FindQuery::default()
        };
        assert!(query.matches(&taking));
        assert!(!query.matches(&benson()));
    }

    #[test]
    fn name_sort_both_directions() {
        let persons = vec![carl(), alice(), benson()];
        let mut view = PersonView::default();
        view.sort_by(PersonOrder::Name(SortDirection::Ascending));
        assert_eq!(
            names(&view.apply(&persons)),
            vec!["Alice Pauline", "Benson Meier", "Carl Kurz"]
        );
        view.sort_by(PersonOrder::Name(SortDirection::Descending));
        assert_eq!(
            names(&view.apply(&persons)),
            vec!["Carl Kurz", "Benson Meier", "Alice Pauline"]
        );
    }

    #[test]
    fn birthday_sort_ignores_birth_year() {
        let with_bday = |p: Person, b: &str| p.with_birthday(Some(Birthday::parse(b).unwrap()));
        let persons = vec![
            with_bday(carl(), "03-06-1985"),
            with_bday(alice(), "01-06-2010"),
            with_bday(benson(), "02-06-1970"),
        ];
        let reference = NaiveDate::from_ymd_opt(2026, 5, 20).unwrap();
        let mut view = PersonView::default();
        view.sort_by(PersonOrder::Birthday { reference });
        assert_eq!(
            names(&view.apply(&persons)),
            vec!["Alice Pauline", "Benson Meier", "Carl Kurz"]
        );
    }

    #[test]
    fn birthday_sort_puts_missing_last_and_wraps() {
        let persons = vec![
            alice(),
            benson().with_birthday(Some(Birthday::parse("10-01-1999").unwrap())),
            carl().with_birthday(Some(Birthday::parse("20-12-1999").unwrap())),
        ];
        let reference = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        let order = PersonOrder::Birthday { reference };
        let mut view = PersonView::default();
        view.sort_by(order);
        assert_eq!(
            names(&view.apply(&persons)),
            vec!["Carl Kurz", "Benson Meier", "Alice Pauline"]
        );
    }

    #[test]
    fn set_filter_drops_order() {
        let mut view = PersonView::default();
        view.sort_by(PersonOrder::Name(SortDirection::Descending));
        view.set_filter(PersonFilter::All);
        assert_eq!(view.order(), None);
    }

    #[test]
    fn has_course_filter_keeps_store_order() {
        let persons = vec![
            carl().with_courses([course("MA1521", CourseColor::Red)]),
            alice(),
            benson().with_courses([course("MA1521", CourseColor::Red)]),
        ];
        let mut view = PersonView::default();
        view.set_filter(PersonFilter::HasCourse(code("ma1521")));
        assert_eq!(names(&view.apply(&persons)), vec!["Carl Kurz", "Benson Meier"]);
    }

    #[test]
    fn roster_counts_takers_and_filters() {
        let book = CourseBook::from_persons(
            [
                alice().with_courses([course("MA1521", CourseColor::Pink)]),
                benson().with_courses([
                    course("CS2103T", CourseColor::Green),
                    course("MA1521", CourseColor::Pink),
                ]),
            ],
            Theme::Dark,
        )
        .unwrap();
        let all = course_roster(&book, &CourseFilter::All);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].code, code("CS2103T"));
        assert_eq!(all[1].takers, 2);

        let only_ma = course_roster(&book, &CourseFilter::Keywords(vec!["ma".into()]));
        assert_eq!(only_ma.len(), 1);
        assert_eq!(only_ma[0].color, CourseColor::Pink);
    }
}
