//! Validated scalar fields of a [`Person`](super::Person).
//!
//! Every field is a newtype over `String` that can only be built through its
//! `parse` constructor, so an invalid value never reaches the store. Serde
//! goes through the same constructors (`try_from = "String"`), which means a
//! hand-edited data file is validated exactly like typed input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rejection of a raw field value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{constraint}")]
pub struct FieldError {
    /// Which field was being parsed (`"name"`, `"phone"`, ...).
    pub field: &'static str,
    /// Human-readable rule the value broke.
    pub constraint: &'static str,
}

impl FieldError {
    const fn new(field: &'static str, constraint: &'static str) -> Self {
        Self { field, constraint }
    }
}

pub const NAME_CONSTRAINTS: &str =
    "Names should only contain alphanumeric characters and spaces, and it should not be blank";
pub const PHONE_CONSTRAINTS: &str =
    "Phone numbers should only contain numbers, and it should be at least 3 digits long";
pub const EMAIL_CONSTRAINTS: &str = "Emails should be of the format local-part@domain. \
The local-part should only contain alphanumeric characters and + _ . -, and may not start or end with a special character. \
The domain is made of labels separated by periods; labels are alphanumeric with inner hyphens \
and the last label is at least 2 characters long";
pub const ADDRESS_CONSTRAINTS: &str = "Addresses can take any values, and it should not be blank";
pub const TAG_CONSTRAINTS: &str = "Tag names should be alphanumeric";

macro_rules! string_field {
    ($(#[$meta:meta])* $ty:ident, $field:literal, $validate:path, $constraint:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $ty(String);

        impl $ty {
            /// Validate and wrap a raw value (surrounding whitespace is trimmed).
            ///
            /// # Errors
            ///
            /// Returns [`FieldError`] when the value breaks the field's format rule.
            pub fn parse(raw: &str) -> Result<Self, FieldError> {
                let trimmed = raw.trim();
                if $validate(trimmed) {
                    Ok(Self(trimmed.to_string()))
                } else {
                    Err(FieldError::new($field, $constraint))
                }
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $ty {
            type Err = FieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = FieldError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_field!(
    /// A person's full name.
    Name,
    "name",
    is_valid_name,
    NAME_CONSTRAINTS
);
string_field!(
    /// A phone number (digits only).
    Phone,
    "phone",
    is_valid_phone,
    PHONE_CONSTRAINTS
);
string_field!(
    /// An email address.
    Email,
    "email",
    is_valid_email,
    EMAIL_CONSTRAINTS
);
string_field!(
    /// A free-form postal address.
    Address,
    "address",
    is_valid_address,
    ADDRESS_CONSTRAINTS
);
string_field!(
    /// A single-word label attached to a person.
    Tag,
    "tag",
    is_valid_tag,
    TAG_CONSTRAINTS
);

impl Name {
    /// Case-insensitive comparison against another name.
    #[must_use]
    pub fn eq_ignore_case(&self, other: &Self) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl Email {
    #[must_use]
    pub fn eq_ignore_case(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

fn is_valid_name(value: &str) -> bool {
    let mut chars = value.chars();
    matches!(chars.next(), Some(c) if c.is_alphanumeric())
        && chars.all(|c| c.is_alphanumeric() || c == ' ')
}

fn is_valid_phone(value: &str) -> bool {
    value.len() >= 3 && value.chars().all(|c| c.is_ascii_digit())
}

fn is_valid_address(value: &str) -> bool {
    !value.is_empty()
}

fn is_valid_tag(value: &str) -> bool {
    !value.is_empty() && value.chars().all(char::is_alphanumeric)
}

const EMAIL_SPECIALS: [char; 4] = ['+', '_', '.', '-'];

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    is_valid_local_part(local) && is_valid_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    let (Some(first), Some(last)) = (local.chars().next(), local.chars().last()) else {
        return false;
    };
    first.is_ascii_alphanumeric()
        && last.is_ascii_alphanumeric()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || EMAIL_SPECIALS.contains(&c))
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    let Some(last) = labels.last() else {
        return false;
    };
    last.len() >= 2 && labels.iter().all(|label| is_valid_domain_label(label))
}

fn is_valid_domain_label(label: &str) -> bool {
    let (Some(first), Some(last)) = (label.chars().next(), label.chars().last()) else {
        return false;
    };
    first.is_ascii_alphanumeric()
        && last.is_ascii_alphanumeric()
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
