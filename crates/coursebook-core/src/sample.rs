//! Persons a fresh course book starts with.

use tracing::warn;

use crate::book::CourseBook;
use crate::model::{
    Address, Birthday, Course, CourseCode, CourseColor, Email, FieldError, Name, Person, Phone, Tag,
    Theme,
};

struct SamplePerson {
    name: &'static str,
    phone: &'static str,
    email: &'static str,
    address: &'static str,
    birthday: Option<&'static str>,
    tags: &'static [&'static str],
    courses: &'static [(&'static str, CourseColor)],
}

const SAMPLE_PERSONS: &[SamplePerson] = &[
    SamplePerson {
        name: "Alex Yeoh",
        phone: "87438807",
        email: "alexyeoh@example.com",
        address: "Blk 30 Geylang Street 29, #06-40",
        birthday: Some("14-03-2002"),
        tags: &["friends"],
        courses: &[("CS2103T", CourseColor::Blue), ("MA1521", CourseColor::Orange)],
    },
    SamplePerson {
        name: "Bernice Yu",
        phone: "99272758",
        email: "berniceyu@example.com",
        address: "Blk 30 Lorong 3 Serangoon Gardens, #07-18",
        birthday: Some("02-11-2001"),
        tags: &["colleagues", "friends"],
        courses: &[("CS2103T", CourseColor::Blue)],
    },
    SamplePerson {
        name: "Charlotte Oliveiro",
        phone: "93210283",
        email: "charlotte@example.com",
        address: "Blk 11 Ang Mo Kio Street 74, #11-04",
        birthday: None,
        tags: &["neighbours"],
        courses: &[("GEA1000", CourseColor::Teal)],
    },
    SamplePerson {
        name: "David Li",
        phone: "91031282",
        email: "lidavid@example.com",
        address: "Blk 436 Serangoon Gardens Street 26, #16-43",
        birthday: Some("29-02-2004"),
        tags: &["family"],
        courses: &[("MA1521", CourseColor::Orange), ("CS2101", CourseColor::Purple)],
    },
    SamplePerson {
        name: "Irfan Ibrahim",
        phone: "92492021",
        email: "irfan@example.com",
        address: "Blk 47 Tampines Street 20, #17-35",
        birthday: None,
        tags: &["classmates"],
        courses: &[],
    },
    SamplePerson {
        name: "Roy Balakrishnan",
        phone: "92624417",
        email: "royb@example.com",
        address: "Blk 45 Aljunied Street 85, #11-31",
        birthday: Some("30-07-2000"),
        tags: &["colleagues"],
        courses: &[("CS2101", CourseColor::Purple)],
    },
];

impl SamplePerson {
    fn build(&self) -> Result<Person, FieldError> {
        let birthday = self.birthday.map(Birthday::parse).transpose()?;
        let tags = self
            .tags
            .iter()
            .map(|tag| Tag::parse(tag))
            .collect::<Result<Vec<_>, _>>()?;
        let courses = self
            .courses
            .iter()
            .map(|(code, color)| CourseCode::parse(code).map(|code| Course::new(code, *color)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Person::new(
            Name::parse(self.name)?,
            Phone::parse(self.phone)?,
            Email::parse(self.email)?,
            Address::parse(self.address)?,
        )
        .with_birthday(birthday)
        .with_tags(tags)
        .with_courses(courses))
    }
}

/// The sample course book, in the default theme.
#[must_use]
pub fn sample_course_book() -> CourseBook {
    let persons: Result<Vec<Person>, FieldError> =
        SAMPLE_PERSONS.iter().map(SamplePerson::build).collect();
    match persons.map(|persons| CourseBook::from_persons(persons, Theme::default())) {
        Ok(Ok(book)) => book,
        Ok(Err(err)) => {
            warn!(error = %err, "sample data rejected; starting empty");
            CourseBook::new()
        }
        Err(err) => {
            warn!(field = err.field, error = %err, "sample data rejected; starting empty");
            CourseBook::new()
        }
    }
}
