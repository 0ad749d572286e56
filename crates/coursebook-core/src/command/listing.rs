use super::{CommandResult, Directive};
use crate::manager::Model;
use crate::view::{FindQuery, PersonFilter, PersonOrder, SortDirection};

pub(super) fn list(model: &mut Model) -> CommandResult {
    model.update_filtered_persons(PersonFilter::All);
    CommandResult::new("Listed all persons").with_directive(Directive::ShowPersons)
}

pub(super) fn find(model: &mut Model, query: &FindQuery) -> CommandResult {
    model.update_filtered_persons(PersonFilter::Find(query.clone()));
    let count = model.filtered_persons().len();
    CommandResult::new(format!("{count} persons listed!")).with_directive(Directive::ShowPersons)
}

pub(super) fn sort_by_name(model: &mut Model, direction: SortDirection) -> CommandResult {
    model.sort_filtered_persons(PersonOrder::Name(direction));
    let label = match direction {
        SortDirection::Ascending => "ascending",
        SortDirection::Descending => "descending",
    };
    CommandResult::new(format!("Sorted persons by name ({label})"))
        .with_directive(Directive::ShowPersons)
}

pub(super) fn sort_by_birthday(model: &mut Model) -> CommandResult {
    let reference = model.today();
    model.sort_filtered_persons(PersonOrder::Birthday { reference });
    CommandResult::new("Sorted persons by upcoming birthday").with_directive(Directive::ShowPersons)
}
