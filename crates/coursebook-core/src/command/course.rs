use std::collections::BTreeSet;

use super::{person_at, CommandError, CommandResult, Directive, Index};
use crate::manager::Model;
use crate::model::{Course, CourseCode, CourseColor, CourseSpec, Person};
use crate::view::{CourseFilter, PersonFilter};

fn join_codes<'a>(codes: impl IntoIterator<Item = &'a CourseCode>) -> String {
    codes
        .into_iter()
        .map(CourseCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The stored copy of `person`, which may have been recoloured since it was
/// looked up.
fn refreshed(model: &Model, person: &Person) -> Result<Person, CommandError> {
    model
        .course_book()
        .persons()
        .iter()
        .find(|stored| stored.is_same_person(person))
        .cloned()
        .ok_or(CommandError::NotFound)
}

pub(super) fn edit_color(
    model: &mut Model,
    code: Option<&CourseCode>,
    color: Option<CourseColor>,
) -> Result<CommandResult, CommandError> {
    let code = code.ok_or(CommandError::MissingArgument("course code"))?;
    let color = color.ok_or(CommandError::MissingArgument("course colour"))?;
    let touched = model.set_course_color(code, color);
    if touched == 0 {
        return Ok(CommandResult::new(format!(
            "Nobody takes {code} yet; nothing was recoloured"
        )));
    }
    model.commit();
    Ok(CommandResult::new(format!("Colour of {code} set to {color}"))
        .with_directive(Directive::ShowPersons))
}

pub(super) fn add_courses(
    model: &mut Model,
    index: Index,
    specs: &[CourseSpec],
) -> Result<CommandResult, CommandError> {
    let target = person_at(model, index)?;
    let added: Vec<&CourseCode> = specs
        .iter()
        .map(|spec| &spec.code)
        .filter(|code| !target.has_course(code))
        .collect();
    if added.is_empty() {
        return Err(CommandError::NoNewCourses(target.name().to_string()));
    }

    let resolved: Vec<Course> = specs.iter().map(|spec| model.resolve_course(spec)).collect();
    let current = refreshed(model, &target)?;
    let mut courses: BTreeSet<Course> = current.courses().clone();
    for course in resolved {
        courses.replace(course);
    }
    let updated = current.clone().with_courses(courses);
    model.set_person(&current, updated)?;
    model.commit();
    Ok(CommandResult::new(format!(
        "Added courses to {}: {}",
        target.name(),
        join_codes(added)
    ))
    .with_directive(Directive::ShowPersons))
}

pub(super) fn remove_courses(
    model: &mut Model,
    index: Index,
    codes: &[CourseCode],
) -> Result<CommandResult, CommandError> {
    let target = person_at(model, index)?;
    let removed: BTreeSet<&CourseCode> = codes.iter().filter(|code| target.has_course(code)).collect();
    if removed.is_empty() {
        return Err(CommandError::NoMatch(format!(
            "{} does not take any of these courses",
            target.name()
        )));
    }
    let kept: Vec<Course> = target
        .courses()
        .iter()
        .filter(|course| !removed.contains(&course.code))
        .cloned()
        .collect();
    let updated = target.clone().with_courses(kept);
    model.set_person(&target, updated)?;
    model.commit();
    Ok(CommandResult::new(format!(
        "Removed courses from {}: {}",
        target.name(),
        join_codes(removed)
    ))
    .with_directive(Directive::ShowPersons))
}

pub(super) fn list_courses(
    model: &mut Model,
    filter: &CourseFilter,
) -> Result<CommandResult, CommandError> {
    model.update_filtered_courses(filter.clone());
    let count = model.filtered_courses().len();
    Ok(CommandResult::new(format!("Listed {count} courses")).with_directive(Directive::ShowCourses))
}

pub(super) fn view_course(
    model: &mut Model,
    code: &CourseCode,
) -> Result<CommandResult, CommandError> {
    model.update_filtered_persons(PersonFilter::HasCourse(code.clone()));
    let count = model.filtered_persons().len();
    Ok(
        CommandResult::new(format!("{count} persons listed taking {code}"))
            .with_directive(Directive::ShowPersons),
    )
}
