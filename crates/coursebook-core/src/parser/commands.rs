//! One parser per command word. Each returns the built [`Command`] or an
//! [`ParseError::InvalidFormat`] carrying the command's usage line.

use std::collections::BTreeSet;

use super::ParseError;
use super::args::{parse_course_specs, parse_delete_target, parse_index, parse_target};
use super::tokenizer::{
    tokenize, unknown_prefix, ArgumentMultimap, Prefix, PREFIX_ADDRESS, PREFIX_BIRTHDAY,
    PREFIX_COURSE, PREFIX_EMAIL, PREFIX_NAME, PREFIX_PHONE, PREFIX_TAG,
};
use crate::command::{Command, EditDescriptor, Index, PersonDraft};
use crate::model::{
    Address, Birthday, CourseCode, CourseColor, Email, FieldError, Name, Phone, Tag, Theme,
};
use crate::view::{CourseFilter, FindQuery, SortDirection};

// ---------------------------------------------------------------------------
// Usage lines
// ---------------------------------------------------------------------------

pub const HELP_USAGE: &str = "help: Shows the list of commands.";
pub const ADD_USAGE: &str = "add: Adds a person to the course book.\n\
Parameters: n/NAME p/PHONE e/EMAIL a/ADDRESS [b/DD-MM-YYYY] [t/TAG]... [c/CODE[,COLOR]]...\n\
Example: add n/John Doe p/98765432 e/johnd@example.com a/311, Clementi Ave 2 t/friends c/CS2103T,BLUE";
pub const EDIT_USAGE: &str = "edit: Edits the person at the given index in the displayed list.\n\
Parameters: INDEX [n/NAME] [p/PHONE] [e/EMAIL] [a/ADDRESS] [b/DD-MM-YYYY] [t/TAG]...\n\
Example: edit 1 p/91234567 e/johndoe@example.com";
pub const DELETE_USAGE: &str = "delete: Deletes persons by their indices or by full name.\n\
Parameters: INDEX [INDEX]... or NAME\n\
Example: delete 1 3 or delete John Doe";
pub const FAVOURITE_USAGE: &str = "fav: Marks a person as a favourite.\n\
Parameters: INDEX or NAME\n\
Example: fav 1";
pub const UNFAVOURITE_USAGE: &str = "unfav: Removes a person from the favourites.\n\
Parameters: INDEX or NAME\n\
Example: unfav John Doe";
pub const VIEW_USAGE: &str = "view: Shows every detail of one person.\n\
Parameters: INDEX or NAME\n\
Example: view 2";
pub const COURSE_COLOR_USAGE: &str = "coursecolor: Sets the colour of a course for everyone taking it.\n\
Parameters: c/CODE,COLOR\n\
Example: coursecolor c/CS2103T,RED";
pub const ADD_COURSE_USAGE: &str = "addcourse: Adds courses to the person at the given index.\n\
Parameters: INDEX c/CODE[,COLOR]...\n\
Example: addcourse 1 c/CS2103T c/MA1521,PINK";
pub const REMOVE_COURSE_USAGE: &str = "removecourse: Removes courses from the person at the given index.\n\
Parameters: INDEX c/CODE...\n\
Example: removecourse 1 c/CS2103T";
pub const VIEW_COURSE_USAGE: &str = "viewcourse: Lists the persons taking a course.\n\
Parameters: CODE\n\
Example: viewcourse CS2103T";
pub const FIND_USAGE: &str = "find: Finds persons whose fields contain any of the keywords (case-insensitive).\n\
Parameters: KEYWORD [MORE_KEYWORDS]... or [n/NAME] [p/PHONE] [e/EMAIL] [a/ADDRESS] [t/TAG] [c/CODE]\n\
Example: find alice bob or find t/friends c/CS2103T";
pub const SORT_USAGE: &str = "sort: Sorts the displayed persons by name.\n\
Parameters: [asc|desc]\n\
Example: sort desc";
pub const THEME_USAGE: &str = "theme: Switches the colour theme.\n\
Parameters: light|dark\n\
Example: theme light";

const MESSAGE_NOT_EDITED: &str = "At least one field to edit must be provided.";
const MESSAGE_NO_COURSES: &str = "At least one course must be provided.";

const PERSON_PREFIXES: [Prefix; 7] = [
    PREFIX_NAME,
    PREFIX_PHONE,
    PREFIX_EMAIL,
    PREFIX_ADDRESS,
    PREFIX_BIRTHDAY,
    PREFIX_TAG,
    PREFIX_COURSE,
];
const SINGLE_VALUED: [Prefix; 5] = [
    PREFIX_NAME,
    PREFIX_PHONE,
    PREFIX_EMAIL,
    PREFIX_ADDRESS,
    PREFIX_BIRTHDAY,
];
const FIND_PREFIXES: [Prefix; 6] = [
    PREFIX_NAME,
    PREFIX_PHONE,
    PREFIX_EMAIL,
    PREFIX_ADDRESS,
    PREFIX_TAG,
    PREFIX_COURSE,
];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn field<T>(
    raw: &str,
    parse: impl FnOnce(&str) -> Result<T, FieldError>,
    usage: &'static str,
) -> Result<T, ParseError> {
    parse(raw).map_err(|err| ParseError::invalid(err.to_string(), usage))
}

fn optional_field<T>(
    map: &ArgumentMultimap,
    prefix: Prefix,
    parse: impl FnOnce(&str) -> Result<T, FieldError>,
    usage: &'static str,
) -> Result<Option<T>, ParseError> {
    map.value(prefix)
        .map(|raw| field(raw, parse, usage))
        .transpose()
}

fn reject_repeated(
    map: &ArgumentMultimap,
    prefixes: &[Prefix],
    usage: &'static str,
) -> Result<(), ParseError> {
    let repeated = map.repeated(prefixes);
    if repeated.is_empty() {
        return Ok(());
    }
    let listed: Vec<&str> = repeated.iter().map(|prefix| prefix.as_str()).collect();
    Err(ParseError::invalid(
        format!(
            "Multiple values specified for the following single-valued field(s): {}",
            listed.join(" ")
        ),
        usage,
    ))
}

fn tags(values: &[String], usage: &'static str) -> Result<BTreeSet<Tag>, ParseError> {
    values
        .iter()
        .map(|raw| field(raw, Tag::parse, usage))
        .collect()
}

fn index(raw: &str, usage: &'static str) -> Result<Index, ParseError> {
    parse_index(raw).map_err(|message| ParseError::invalid(message, usage))
}

// ---------------------------------------------------------------------------
// Person commands
// ---------------------------------------------------------------------------

pub fn parse_add(args: &str) -> Result<Command, ParseError> {
    let map = tokenize(args, &PERSON_PREFIXES);
    let required = [PREFIX_NAME, PREFIX_PHONE, PREFIX_EMAIL, PREFIX_ADDRESS];
    let missing: Vec<&str> = required
        .iter()
        .filter(|prefix| !map.contains(**prefix))
        .map(|prefix| prefix.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::invalid(
            format!("Missing required field(s): {}", missing.join(" ")),
            ADD_USAGE,
        ));
    }
    if !map.preamble().is_empty() {
        return Err(ParseError::invalid(
            format!("Unexpected text before the fields: {}", map.preamble()),
            ADD_USAGE,
        ));
    }
    reject_repeated(&map, &SINGLE_VALUED, ADD_USAGE)?;

    let draft = PersonDraft {
        name: field(map.value(PREFIX_NAME).unwrap_or_default(), Name::parse, ADD_USAGE)?,
        phone: field(map.value(PREFIX_PHONE).unwrap_or_default(), Phone::parse, ADD_USAGE)?,
        email: field(map.value(PREFIX_EMAIL).unwrap_or_default(), Email::parse, ADD_USAGE)?,
        address: field(
            map.value(PREFIX_ADDRESS).unwrap_or_default(),
            Address::parse,
            ADD_USAGE,
        )?,
        birthday: optional_field(&map, PREFIX_BIRTHDAY, Birthday::parse, ADD_USAGE)?,
        tags: tags(map.all_values(PREFIX_TAG), ADD_USAGE)?,
        courses: parse_course_specs(map.all_values(PREFIX_COURSE))
            .map_err(|err| ParseError::invalid(err.to_string(), ADD_USAGE))?,
    };
    Ok(Command::Add(draft))
}

pub fn parse_edit(args: &str) -> Result<Command, ParseError> {
    let map = tokenize(args, &PERSON_PREFIXES);
    let index = index(map.preamble(), EDIT_USAGE)?;
    if map.contains(PREFIX_COURSE) {
        return Err(ParseError::invalid(
            "Courses are changed with addcourse and removecourse.",
            EDIT_USAGE,
        ));
    }
    reject_repeated(&map, &SINGLE_VALUED, EDIT_USAGE)?;

    let tag_values = map.all_values(PREFIX_TAG);
    let edit_tags = match tag_values {
        [] => None,
        [only] if only.is_empty() => Some(BTreeSet::new()),
        values => Some(tags(values, EDIT_USAGE)?),
    };
    let edit = EditDescriptor {
        name: optional_field(&map, PREFIX_NAME, Name::parse, EDIT_USAGE)?,
        phone: optional_field(&map, PREFIX_PHONE, Phone::parse, EDIT_USAGE)?,
        email: optional_field(&map, PREFIX_EMAIL, Email::parse, EDIT_USAGE)?,
        address: optional_field(&map, PREFIX_ADDRESS, Address::parse, EDIT_USAGE)?,
        birthday: optional_field(&map, PREFIX_BIRTHDAY, Birthday::parse, EDIT_USAGE)?,
        tags: edit_tags,
    };
    if !edit.is_any_field_edited() {
        return Err(ParseError::invalid(MESSAGE_NOT_EDITED, EDIT_USAGE));
    }
    Ok(Command::Edit { index, edit })
}

pub fn parse_delete(args: &str) -> Result<Command, ParseError> {
    parse_delete_target(args)
        .map(Command::Delete)
        .map_err(|message| ParseError::invalid(message, DELETE_USAGE))
}

pub fn parse_favourite(args: &str) -> Result<Command, ParseError> {
    parse_target(args)
        .map(Command::Favourite)
        .map_err(|message| ParseError::invalid(message, FAVOURITE_USAGE))
}

pub fn parse_unfavourite(args: &str) -> Result<Command, ParseError> {
    parse_target(args)
        .map(Command::Unfavourite)
        .map_err(|message| ParseError::invalid(message, UNFAVOURITE_USAGE))
}

pub fn parse_view(args: &str) -> Result<Command, ParseError> {
    parse_target(args)
        .map(Command::View)
        .map_err(|message| ParseError::invalid(message, VIEW_USAGE))
}

// ---------------------------------------------------------------------------
// Course commands
// ---------------------------------------------------------------------------

/// `c/CODE,COLOR`. Missing parts are left `None` and reported when the
/// command runs.
pub fn parse_course_color(args: &str) -> Result<Command, ParseError> {
    let map = tokenize(args, &[PREFIX_COURSE]);
    if !map.preamble().is_empty() {
        return Err(ParseError::invalid(
            format!("Unexpected text before c/: {}", map.preamble()),
            COURSE_COLOR_USAGE,
        ));
    }
    reject_repeated(&map, &[PREFIX_COURSE], COURSE_COLOR_USAGE)?;

    let Some(value) = map.value(PREFIX_COURSE) else {
        return Ok(Command::EditCourseColor {
            code: None,
            color: None,
        });
    };
    let (raw_code, raw_color) = value.split_once(',').unwrap_or((value, ""));
    let code = (!raw_code.trim().is_empty())
        .then(|| field(raw_code, CourseCode::parse, COURSE_COLOR_USAGE))
        .transpose()?;
    let color = (!raw_color.trim().is_empty())
        .then(|| field(raw_color, str::parse::<CourseColor>, COURSE_COLOR_USAGE))
        .transpose()?;
    Ok(Command::EditCourseColor { code, color })
}

pub fn parse_add_course(args: &str) -> Result<Command, ParseError> {
    let map = tokenize(args, &[PREFIX_COURSE]);
    let index = index(map.preamble(), ADD_COURSE_USAGE)?;
    let courses = parse_course_specs(map.all_values(PREFIX_COURSE))
        .map_err(|err| ParseError::invalid(err.to_string(), ADD_COURSE_USAGE))?;
    if courses.is_empty() {
        return Err(ParseError::invalid(MESSAGE_NO_COURSES, ADD_COURSE_USAGE));
    }
    Ok(Command::AddCourse { index, courses })
}

pub fn parse_remove_course(args: &str) -> Result<Command, ParseError> {
    let map = tokenize(args, &[PREFIX_COURSE]);
    let index = index(map.preamble(), REMOVE_COURSE_USAGE)?;
    let mut courses: Vec<CourseCode> = Vec::new();
    for raw in map.all_values(PREFIX_COURSE) {
        let code = field(raw, CourseCode::parse, REMOVE_COURSE_USAGE)?;
        if !courses.contains(&code) {
            courses.push(code);
        }
    }
    if courses.is_empty() {
        return Err(ParseError::invalid(MESSAGE_NO_COURSES, REMOVE_COURSE_USAGE));
    }
    Ok(Command::RemoveCourse { index, courses })
}

pub fn parse_courses(args: &str) -> Command {
    let keywords: Vec<String> = args.split_whitespace().map(str::to_string).collect();
    if keywords.is_empty() {
        Command::Courses(CourseFilter::All)
    } else {
        Command::Courses(CourseFilter::Keywords(keywords))
    }
}

pub fn parse_view_course(args: &str) -> Result<Command, ParseError> {
    field(args, CourseCode::parse, VIEW_COURSE_USAGE).map(Command::ViewCourse)
}

// ---------------------------------------------------------------------------
// Listing and general commands
// ---------------------------------------------------------------------------

fn keywords(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Bare keywords search names; prefixed keywords search their own field.
pub fn parse_find(args: &str) -> Result<Command, ParseError> {
    if let Some(prefix) = unknown_prefix(args, &FIND_PREFIXES) {
        return Err(ParseError::invalid(
            format!("Unknown search field {prefix}"),
            FIND_USAGE,
        ));
    }
    let map = tokenize(args, &FIND_PREFIXES);
    let prefixed = FIND_PREFIXES.iter().any(|prefix| map.contains(*prefix));
    if !prefixed {
        let names = keywords(map.preamble());
        if names.is_empty() {
            return Err(ParseError::invalid("No keywords given.", FIND_USAGE));
        }
        return Ok(Command::Find(FindQuery::by_name(names)));
    }
    if !map.preamble().is_empty() {
        return Err(ParseError::invalid(
            format!("Keywords must follow a field prefix: {}", map.preamble()),
            FIND_USAGE,
        ));
    }

    let collect = |prefix: Prefix| -> Result<Vec<String>, ParseError> {
        let mut found = Vec::new();
        for value in map.all_values(prefix) {
            if value.is_empty() {
                return Err(ParseError::invalid(
                    format!("No keywords given after {prefix}"),
                    FIND_USAGE,
                ));
            }
            found.extend(keywords(value));
        }
        Ok(found)
    };
    let query = FindQuery {
        names: collect(PREFIX_NAME)?,
        phones: collect(PREFIX_PHONE)?,
        emails: collect(PREFIX_EMAIL)?,
        addresses: collect(PREFIX_ADDRESS)?,
        tags: collect(PREFIX_TAG)?,
        courses: collect(PREFIX_COURSE)?,
    };
    Ok(Command::Find(query))
}

pub fn parse_sort(args: &str) -> Result<Command, ParseError> {
    let direction = args.trim();
    if direction.is_empty() || direction.eq_ignore_ascii_case("asc") {
        Ok(Command::Sort(SortDirection::Ascending))
    } else if direction.eq_ignore_ascii_case("desc") {
        Ok(Command::Sort(SortDirection::Descending))
    } else {
        Err(ParseError::invalid(
            format!("Unknown sort direction: {direction}"),
            SORT_USAGE,
        ))
    }
}

pub fn parse_theme(args: &str) -> Result<Command, ParseError> {
    field(args, str::parse::<Theme>, THEME_USAGE).map(Command::Theme)
}
