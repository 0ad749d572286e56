use std::collections::BTreeSet;

use super::*;
use crate::command::{DeleteTarget, EditDescriptor, Index, Target};
use crate::error::ErrorCode;
use crate::model::{CourseCode, CourseColor, Name, Tag, Theme};
use crate::view::{CourseFilter, FindQuery, SortDirection};

fn invalid_message(input: &str) -> String {
    match parse_command(input) {
        Err(ParseError::InvalidFormat { message, .. }) => message,
        other => panic!("expected InvalidFormat for {input:?}, got {other:?}"),
    }
}

fn idx(one_based: usize) -> Index {
    Index::from_one_based(one_based).unwrap()
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[test]
fn unknown_word_is_rejected() {
    let err = parse_command("frobnicate 1").unwrap_err();
    assert_eq!(err, ParseError::UnknownCommand("frobnicate".into()));
    assert_eq!(err.code(), ErrorCode::UnknownCommand);
    assert!(err.usage().is_none());
}

#[test]
fn empty_input_points_at_help() {
    let err = parse_command("   ").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidFormat);
    assert!(err.usage().unwrap().starts_with("help"));
}

#[test]
fn words_are_case_sensitive() {
    assert!(matches!(
        parse_command("LIST"),
        Err(ParseError::UnknownCommand(_))
    ));
}

#[test]
fn aliases_map_to_same_command() {
    let pairs = [
        ("list", "ls"),
        ("exit", "quit"),
        ("sortbday", "sortbirthday"),
        ("fav 1", "favourite 1"),
        ("unfav 1", "unfavourite 1"),
        ("delete 2", "del 2"),
        ("viewcourse CS2103T", "vc cs2103t"),
        ("coursecolor c/CS2103T,RED", "cc c/CS2103T,red"),
        ("addcourse 1 c/MA1521", "ac 1 c/MA1521"),
        ("removecourse 1 c/MA1521", "rc 1 c/MA1521"),
    ];
    for (word, alias) in pairs {
        assert_eq!(
            parse_command(word).unwrap(),
            parse_command(alias).unwrap(),
            "{word} vs {alias}"
        );
    }
}

#[test]
fn no_argument_commands_ignore_trailing_text() {
    assert_eq!(parse_command("list everything").unwrap(), Command::List);
    assert_eq!(parse_command("undo 3").unwrap(), Command::Undo);
    assert_eq!(parse_command("  help me ").unwrap(), Command::Help);
    assert_eq!(parse_command("clear").unwrap(), Command::Clear);
    assert_eq!(parse_command("history").unwrap(), Command::History);
}

// ---------------------------------------------------------------------------
// add / edit
// ---------------------------------------------------------------------------

#[test]
fn add_with_every_field() {
    let command = parse_command(
        "add n/Amy Bee p/85355255 e/amy@gmail.com a/123, Jurong West Ave 6 b/01-02-2000 \
         t/friend t/colleague c/cs2103t,blue c/MA1521",
    )
    .unwrap();
    let Command::Add(draft) = command else {
        panic!("expected add");
    };
    assert_eq!(draft.name.as_str(), "Amy Bee");
    assert_eq!(draft.address.as_str(), "123, Jurong West Ave 6");
    assert_eq!(draft.birthday.unwrap().to_string(), "01-02-2000");
    assert_eq!(draft.tags.len(), 2);
    assert_eq!(draft.courses.len(), 2);
    assert_eq!(draft.courses[0].code.as_str(), "CS2103T");
    assert_eq!(draft.courses[0].color, Some(CourseColor::Blue));
    assert_eq!(draft.courses[1].color, None);
}

#[test]
fn add_requires_identity_fields() {
    let message = invalid_message("add n/Amy Bee p/85355255");
    assert!(message.contains("e/"), "{message}");
    assert!(message.contains("a/"), "{message}");
}

#[test]
fn add_rejects_preamble_and_repeats() {
    assert!(invalid_message("add hello n/Amy p/123 e/a@bc.com a/x").contains("hello"));
    assert!(invalid_message("add n/Amy n/Bob p/123 e/a@bc.com a/x").contains("n/"));
}

#[test]
fn add_reports_field_constraint() {
    let message = invalid_message("add n/Amy p/12 e/a@bc.com a/x");
    assert!(message.starts_with("Phone numbers"), "{message}");
    let message = invalid_message("add n/Amy p/123 e/a@bc.com a/x b/31-02-2000");
    assert!(message.contains("dd-mm-yyyy") || message.contains("DD-MM-YYYY"), "{message}");
}

#[test]
fn edit_with_fields() {
    let command = parse_command("edit 2 p/91234567 t/").unwrap();
    assert_eq!(
        command,
        Command::Edit {
            index: idx(2),
            edit: EditDescriptor {
                phone: Some("91234567".parse().unwrap()),
                tags: Some(BTreeSet::new()),
                ..EditDescriptor::default()
            },
        }
    );
}

#[test]
fn edit_replaces_tags() {
    let Command::Edit { edit, .. } = parse_command("edit 1 t/a t/b").unwrap() else {
        panic!("expected edit");
    };
    let expected: BTreeSet<Tag> = ["a", "b"].iter().map(|t| t.parse().unwrap()).collect();
    assert_eq!(edit.tags, Some(expected));
}

#[test]
fn edit_needs_index_and_field() {
    assert_eq!(
        invalid_message("edit 1"),
        "At least one field to edit must be provided."
    );
    assert_eq!(invalid_message("edit n/Amy"), MESSAGE_INVALID_INDEX);
    assert_eq!(invalid_message("edit 0 n/Amy"), MESSAGE_INVALID_INDEX);
    assert!(invalid_message("edit 1 c/CS2103T").contains("addcourse"));
}

// ---------------------------------------------------------------------------
// targets
// ---------------------------------------------------------------------------

#[test]
fn delete_by_indices_or_name() {
    assert_eq!(
        parse_command("delete 1 3").unwrap(),
        Command::Delete(DeleteTarget::Indices(vec![idx(1), idx(3)]))
    );
    assert_eq!(
        parse_command("delete Alice Pauline").unwrap(),
        Command::Delete(DeleteTarget::Name(Name::parse("Alice Pauline").unwrap()))
    );
    assert_eq!(invalid_message("delete 01"), MESSAGE_INVALID_INDEX);
    assert!(parse_command("delete").is_err());
}

#[test]
fn fav_view_accept_index_or_name() {
    assert_eq!(
        parse_command("fav 4").unwrap(),
        Command::Favourite(Target::Index(idx(4)))
    );
    assert_eq!(
        parse_command("view Benson Meier").unwrap(),
        Command::View(Target::Name(Name::parse("Benson Meier").unwrap()))
    );
    assert!(parse_command("unfav").is_err());

    for input in ["fav 1 2", "view 3  4", "unfav 0"] {
        let err = parse_command(input).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFormat, "{input}");
        assert!(err.to_string().contains(MESSAGE_INVALID_INDEX), "{input}");
        assert!(err.usage().is_some(), "{input}");
    }
}

// ---------------------------------------------------------------------------
// courses
// ---------------------------------------------------------------------------

#[test]
fn course_color_keeps_missing_parts_for_execution() {
    assert_eq!(
        parse_command("coursecolor").unwrap(),
        Command::EditCourseColor {
            code: None,
            color: None
        }
    );
    assert_eq!(
        parse_command("cc c/CS2103T").unwrap(),
        Command::EditCourseColor {
            code: Some(CourseCode::parse("CS2103T").unwrap()),
            color: None
        }
    );
    assert_eq!(
        parse_command("cc c/,red").unwrap(),
        Command::EditCourseColor {
            code: None,
            color: Some(CourseColor::Red)
        }
    );
    assert!(parse_command("cc c/CS2103T,mauve").is_err());
}

#[test]
fn add_course_needs_index_and_course() {
    let Command::AddCourse { index, courses } =
        parse_command("addcourse 1 c/CS2103T c/ma1521,pink").unwrap()
    else {
        panic!("expected addcourse");
    };
    assert_eq!(index, idx(1));
    assert_eq!(courses[1].code.as_str(), "MA1521");
    assert_eq!(courses[1].color, Some(CourseColor::Pink));

    assert_eq!(
        invalid_message("addcourse 1"),
        "At least one course must be provided."
    );
    assert!(parse_command("addcourse c/CS2103T").is_err());
}

#[test]
fn remove_course_dedupes_codes() {
    assert_eq!(
        parse_command("rc 2 c/cs2103t c/CS2103T").unwrap(),
        Command::RemoveCourse {
            index: idx(2),
            courses: vec![CourseCode::parse("CS2103T").unwrap()],
        }
    );
}

#[test]
fn courses_and_view_course() {
    assert_eq!(
        parse_command("courses").unwrap(),
        Command::Courses(CourseFilter::All)
    );
    assert_eq!(
        parse_command("courses cs ma").unwrap(),
        Command::Courses(CourseFilter::Keywords(vec!["cs".into(), "ma".into()]))
    );
    assert!(parse_command("viewcourse").is_err());
    assert!(parse_command("viewcourse CS2103T MA1521").is_err());
}

// ---------------------------------------------------------------------------
// find / sort / theme
// ---------------------------------------------------------------------------

#[test]
fn bare_find_searches_names() {
    assert_eq!(
        parse_command("find alice  bob").unwrap(),
        Command::Find(FindQuery::by_name(["alice".to_string(), "bob".to_string()]))
    );
    assert!(parse_command("find").is_err());
}

#[test]
fn prefixed_find_searches_fields() {
    let Command::Find(query) = parse_command("find t/friends colleagues c/CS2103T").unwrap() else {
        panic!("expected find");
    };
    assert_eq!(query.tags, ["friends", "colleagues"]);
    assert_eq!(query.courses, ["CS2103T"]);
    assert!(query.names.is_empty());
}

#[test]
fn find_rejects_bad_prefix_usage() {
    assert!(invalid_message("find x/foo").contains("x/"));
    assert!(invalid_message("find alice n/bob").contains("alice"));
    assert!(invalid_message("find n/").contains("n/"));
}

#[test]
fn sort_directions() {
    assert_eq!(
        parse_command("sort").unwrap(),
        Command::Sort(SortDirection::Ascending)
    );
    assert_eq!(
        parse_command("sort asc").unwrap(),
        Command::Sort(SortDirection::Ascending)
    );
    assert_eq!(
        parse_command("sort desc").unwrap(),
        Command::Sort(SortDirection::Descending)
    );
    assert!(parse_command("sort sideways").is_err());
}

#[test]
fn theme_names() {
    assert_eq!(parse_command("theme light").unwrap(), Command::Theme(Theme::Light));
    assert_eq!(parse_command("theme DARK").unwrap(), Command::Theme(Theme::Dark));
    let err = parse_command("theme").unwrap_err();
    assert!(err.usage().unwrap().starts_with("theme"));
}
