use super::{
    ambiguous, no_person_named, person_at, persons_named, render_match_list, resolve_target,
    CommandError, CommandResult, DeleteTarget, Directive, EditDescriptor, Index, PendingConfirmation,
    PersonDraft, Target,
};
use crate::book::CourseBook;
use crate::manager::Model;
use crate::model::Person;

pub(super) fn add(model: &mut Model, draft: &PersonDraft) -> Result<CommandResult, CommandError> {
    let base = draft.base_person();
    if model.has_person(&base) {
        return Err(CommandError::DuplicateEntity);
    }
    let courses: Vec<_> = draft
        .courses
        .iter()
        .map(|spec| model.resolve_course(spec))
        .collect();
    let person = base.with_courses(courses);
    model.add_person(person.clone())?;
    model.commit();
    Ok(CommandResult::new(format!("New person added: {person}")).with_directive(Directive::ShowPersons))
}

pub(super) fn edit(
    model: &mut Model,
    index: Index,
    descriptor: &EditDescriptor,
) -> Result<CommandResult, CommandError> {
    let target = person_at(model, index)?;
    let edited = descriptor.apply(&target);
    if !target.is_same_person(&edited) && model.has_person(&edited) {
        return Err(CommandError::DuplicateEntity);
    }
    model.set_person(&target, edited.clone())?;
    model.update_filtered_persons(crate::view::PersonFilter::All);
    model.commit();
    Ok(CommandResult::new(format!("Edited Person: {edited}")).with_directive(Directive::ShowPersons))
}

/// First phase of a delete: work out who would go and ask for confirmation.
pub(super) fn delete(model: &Model, target: &DeleteTarget) -> Result<CommandResult, CommandError> {
    let candidates = match target {
        DeleteTarget::Indices(indices) => {
            let mut picked: Vec<Person> = Vec::with_capacity(indices.len());
            for index in indices {
                let person = person_at(model, *index)?;
                if !picked.contains(&person) {
                    picked.push(person);
                }
            }
            picked
        }
        DeleteTarget::Name(name) => {
            let matches = persons_named(model, name);
            match matches.len() {
                0 => return Err(no_person_named(name)),
                1 => matches,
                _ => return Err(ambiguous(model, name, &matches)),
            }
        }
    };
    Ok(confirmation(model, candidates, "Delete"))
}

pub(super) fn clear(model: &Model) -> Result<CommandResult, CommandError> {
    let everyone = model.course_book().persons().to_vec();
    if everyone.is_empty() {
        return Ok(CommandResult::new("The course book is already empty"));
    }
    Ok(confirmation(model, everyone, "Clear the course book and delete"))
}

fn confirmation(model: &Model, candidates: Vec<Person>, verb: &str) -> CommandResult {
    let count = candidates.len();
    let noun = if count == 1 { "person" } else { "persons" };
    let summary = format!(
        "{verb} {count} {noun}?\n{}",
        render_match_list(model, &candidates)
    );
    CommandResult::new(summary.clone()).with_directive(Directive::PendingConfirmation(
        PendingConfirmation {
            candidates,
            summary,
        },
    ))
}

/// Second phase: remove the confirmed candidates in one undoable step.
pub(super) fn confirm_delete(
    model: &mut Model,
    candidates: &[Person],
) -> Result<CommandResult, CommandError> {
    let mut distinct: Vec<&Person> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !distinct.contains(&candidate) {
            distinct.push(candidate);
        }
    }
    let stored = model.course_book().persons();
    if distinct.iter().any(|candidate| !stored.contains(candidate)) {
        return Err(CommandError::NotFound);
    }
    if stored.iter().all(|person| distinct.contains(&person)) {
        let emptied = CourseBook::with_theme(model.theme());
        model.reset(emptied);
    } else {
        for candidate in &distinct {
            model.delete_person(candidate)?;
        }
    }
    model.commit();
    let feedback = match distinct.as_slice() {
        [only] => format!("Deleted Person: {only}"),
        _ => format!("Deleted {} persons", distinct.len()),
    };
    Ok(CommandResult::new(feedback).with_directive(Directive::ShowPersons))
}

pub(super) fn set_favourite(
    model: &mut Model,
    target: &Target,
    favourite: bool,
) -> Result<CommandResult, CommandError> {
    let person = resolve_target(model, target)?;
    if person.is_favourite() == favourite {
        let message = if favourite {
            format!("{} is already a favourite", person.name())
        } else {
            format!("{} is not a favourite", person.name())
        };
        return Err(CommandError::AlreadyInState(message));
    }
    let updated = person.clone().with_favourite(favourite);
    model.set_person(&person, updated)?;
    model.commit();
    let feedback = if favourite {
        format!("Added {} to favourites", person.name())
    } else {
        format!("Removed {} from favourites", person.name())
    };
    Ok(CommandResult::new(feedback).with_directive(Directive::ShowPersons))
}

pub(super) fn view(model: &Model, target: &Target) -> Result<CommandResult, CommandError> {
    let person = resolve_target(model, target)?;
    Ok(
        CommandResult::new(format!("Viewing {}", person.name()))
            .with_directive(Directive::ShowPerson { person }),
    )
}
