//! Record model: validated field newtypes, courses, themes and the
//! [`Person`] aggregate.

pub mod birthday;
pub mod course;
pub mod fields;
pub mod person;
pub mod theme;

pub use birthday::Birthday;
pub use course::{Course, CourseCode, CourseColor, CourseSpec};
pub use fields::{Address, Email, FieldError, Name, Phone, Tag};
pub use person::Person;
pub use theme::Theme;
