use coursebook_core::book::CourseBook;
use coursebook_core::versioned::VersionedCourseBook;
use proptest::prelude::*;

use generators::*;

/// Apply `change` to the live book and commit. Returns false when the change
/// was rejected and nothing was committed.
fn apply(book: &mut VersionedCourseBook, change: &Change) -> bool {
    let applied = match change {
        Change::Add(person) => book.add(person.clone()).is_ok(),
        Change::RemoveFirst => match book.live().persons().first().cloned() {
            Some(first) => book.remove(&first).is_ok(),
            None => false,
        },
        Change::Theme(theme) => {
            book.set_theme(*theme);
            true
        }
    };
    if applied {
        book.commit();
    }
    applied
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn undo_all_then_redo_all_round_trips(changes in prop::collection::vec(arb_change(), 0..24)) {
        let mut book = VersionedCourseBook::new(CourseBook::new());
        let mut snapshots = vec![book.live().clone()];
        for change in &changes {
            if apply(&mut book, change) {
                snapshots.push(book.live().clone());
            }
        }
        let last = book.live().clone();

        for expected in snapshots.iter().rev().skip(1) {
            book.undo().unwrap();
            prop_assert_eq!(book.live(), expected);
        }
        prop_assert!(!book.can_undo());

        while book.can_redo() {
            book.redo().unwrap();
        }
        prop_assert_eq!(book.live(), &last);
    }

    #[test]
    fn commit_after_undo_truncates(
        changes in prop::collection::vec(arb_change(), 1..16),
        undos in 0usize..16,
        extra in arb_theme(),
    ) {
        let mut book = VersionedCourseBook::new(CourseBook::new());
        for change in &changes {
            apply(&mut book, change);
        }
        for _ in 0..undos {
            if book.undo().is_err() {
                break;
            }
        }
        let cursor = book.cursor();
        book.set_theme(extra);
        book.commit();

        prop_assert_eq!(book.state_count(), cursor + 2);
        prop_assert_eq!(book.cursor(), cursor + 1);
        prop_assert!(!book.can_redo());
    }

    #[test]
    fn undo_then_redo_is_identity(changes in prop::collection::vec(arb_change(), 1..16)) {
        let mut book = VersionedCourseBook::new(CourseBook::new());
        for change in &changes {
            apply(&mut book, change);
        }
        prop_assume!(book.can_undo());
        let before = book.live().clone();
        book.undo().unwrap();
        book.redo().unwrap();
        prop_assert_eq!(book.live(), &before);
    }

    #[test]
    fn store_never_holds_identity_duplicates(changes in prop::collection::vec(arb_change(), 0..32)) {
        let mut book = VersionedCourseBook::new(CourseBook::new());
        for change in &changes {
            apply(&mut book, change);
        }
        let persons = book.live().persons();
        for (i, a) in persons.iter().enumerate() {
            for b in &persons[i + 1..] {
                prop_assert!(!a.is_same_person(b));
            }
        }
    }
}
