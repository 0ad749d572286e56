use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::fields::FieldError;

pub const COURSE_CODE_CONSTRAINTS: &str =
    "Course codes should only contain alphanumeric characters and hyphens, and it should not be blank";
pub const COURSE_COLOR_CONSTRAINTS: &str =
    "Course colours should be one of: RED, ORANGE, YELLOW, GREEN, BLUE, PURPLE, PINK, TEAL";

/// An uppercase course code such as `CS2103T`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseCode(String);

impl CourseCode {
    /// Validate a course code and normalise it to uppercase.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] for blank codes or codes with characters other
    /// than ASCII alphanumerics and `-`.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        let trimmed = raw.trim();
        if !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(FieldError {
                field: "course",
                constraint: COURSE_CODE_CONSTRAINTS,
            })
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CourseCode {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CourseCode> for String {
    fn from(value: CourseCode) -> Self {
        value.0
    }
}

impl FromStr for CourseCode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed palette a course can be drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CourseColor {
    Red,
    Orange,
    Yellow,
    #[default]
    Green,
    Blue,
    Purple,
    Pink,
    Teal,
}

impl CourseColor {
    pub const ALL: [Self; 8] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Blue,
        Self::Purple,
        Self::Pink,
        Self::Teal,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Orange => "ORANGE",
            Self::Yellow => "YELLOW",
            Self::Green => "GREEN",
            Self::Blue => "BLUE",
            Self::Purple => "PURPLE",
            Self::Pink => "PINK",
            Self::Teal => "TEAL",
        }
    }
}

impl FromStr for CourseColor {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == normalized)
            .ok_or(FieldError {
                field: "course colour",
                constraint: COURSE_COLOR_CONSTRAINTS,
            })
    }
}

impl fmt::Display for CourseColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A course a person takes, drawn in a colour shared by everyone taking it.
///
/// Equality, hashing and ordering only look at the code, so recolouring a
/// course never changes set membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub code: CourseCode,
    pub color: CourseColor,
}

impl Course {
    #[must_use]
    pub const fn new(code: CourseCode, color: CourseColor) -> Self {
        Self { code, color }
    }

    #[must_use]
    pub fn with_color(&self, color: CourseColor) -> Self {
        Self::new(self.code.clone(), color)
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Course {}

impl Hash for Course {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl PartialOrd for Course {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Course {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code.cmp(&other.code)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.color)
    }
}

/// A course as typed by the user: `CODE` or `CODE,COLOR`.
///
/// The colour stays optional until the command resolves it against the
/// colours already in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSpec {
    pub code: CourseCode,
    pub color: Option<CourseColor>,
}

impl CourseSpec {
    /// Parse a `CODE` or `CODE,COLOR` token.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] when the code or the colour is invalid.
    pub fn parse(raw: &str) -> Result<Self, FieldError> {
        match raw.split_once(',') {
            Some((code, color)) => Ok(Self {
                code: CourseCode::parse(code)?,
                color: Some(color.parse()?),
            }),
            None => Ok(Self {
                code: CourseCode::parse(raw)?,
                color: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn code_is_uppercased() {
        let code = CourseCode::parse(" cs2103t ").unwrap();
        assert_eq!(code.as_str(), "CS2103T");
        assert!(CourseCode::parse("GE-1234").is_ok());
        assert!(CourseCode::parse("CS 2103").is_err());
        assert!(CourseCode::parse("").is_err());
    }

    #[test]
    fn color_parse_is_case_insensitive() {
        assert_eq!("blue".parse::<CourseColor>().unwrap(), CourseColor::Blue);
        assert_eq!("TEAL".parse::<CourseColor>().unwrap(), CourseColor::Teal);
        assert!("magenta".parse::<CourseColor>().is_err());
        assert_eq!(CourseColor::default(), CourseColor::Green);
    }

    #[test]
    fn course_identity_ignores_color() {
        let code = CourseCode::parse("CS2103T").unwrap();
        let red = Course::new(code.clone(), CourseColor::Red);
        let blue = Course::new(code, CourseColor::Blue);
        assert_eq!(red, blue);

        let mut set = BTreeSet::new();
        set.insert(red);
        assert!(!set.insert(blue));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn spec_parse() {
        let plain = CourseSpec::parse("ma1521").unwrap();
        assert_eq!(plain.code.as_str(), "MA1521");
        assert!(plain.color.is_none());

        let colored = CourseSpec::parse("MA1521,pink").unwrap();
        assert_eq!(colored.color, Some(CourseColor::Pink));

        assert!(CourseSpec::parse("MA1521,").is_err());
        assert!(CourseSpec::parse("MA1521,mauve").is_err());
    }

    #[test]
    fn serde_shape() {
        let course = Course::new(CourseCode::parse("CS2040").unwrap(), CourseColor::Purple);
        let json = serde_json::to_string(&course).unwrap();
        assert_eq!(json, r#"{"code":"CS2040","color":"PURPLE"}"#);
        let back: Course = serde_json::from_str(&json).unwrap();
        assert_eq!(back.color, CourseColor::Purple);
    }
}
