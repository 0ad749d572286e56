use std::fmt;

/// Machine-readable error codes for scripted front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnknownCommand,
    InvalidFormat,
    DuplicateEntity,
    NotFound,
    InvalidIndex,
    NoMatch,
    AmbiguousMatch,
    AlreadyInState,
    AlreadySet,
    MissingArgument,
    NoNewCourses,
    NoHistory,
    StorageFailed,
    ConfigParseError,
    LockContention,
    CorruptDataFile,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnknownCommand => "E1001",
            Self::InvalidFormat => "E1002",
            Self::DuplicateEntity => "E2001",
            Self::NotFound => "E2002",
            Self::InvalidIndex => "E2003",
            Self::NoMatch => "E2004",
            Self::AmbiguousMatch => "E2005",
            Self::AlreadyInState => "E2006",
            Self::AlreadySet => "E2007",
            Self::MissingArgument => "E2008",
            Self::NoNewCourses => "E2009",
            Self::NoHistory => "E3001",
            Self::StorageFailed => "E5001",
            Self::ConfigParseError => "E5002",
            Self::LockContention => "E5003",
            Self::CorruptDataFile => "E5004",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::UnknownCommand => "Unknown command",
            Self::InvalidFormat => "Invalid command format",
            Self::DuplicateEntity => "Person already exists",
            Self::NotFound => "Person not found",
            Self::InvalidIndex => "Index out of range",
            Self::NoMatch => "No matching person or course",
            Self::AmbiguousMatch => "More than one person matches",
            Self::AlreadyInState => "Person already in requested state",
            Self::AlreadySet => "Value already set",
            Self::MissingArgument => "Required argument missing",
            Self::NoNewCourses => "No new courses to add",
            Self::NoHistory => "Nothing to undo or redo",
            Self::StorageFailed => "Could not save data file",
            Self::ConfigParseError => "Config file parse error",
            Self::LockContention => "Lock contention",
            Self::CorruptDataFile => "Data file is not a valid course book",
        }
    }

    /// Optional remediation hint that can be surfaced to users and scripts.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::UnknownCommand => Some("Type `help` to see the available commands."),
            Self::InvalidFormat => Some("Check the usage line printed with this error."),
            Self::AmbiguousMatch => Some("Use the list index instead of the name."),
            Self::InvalidIndex => Some("Use an index shown in the current list."),
            Self::StorageFailed => {
                Some("Check disk space and write permissions. Changes stay in memory until the next successful save.")
            }
            Self::ConfigParseError => Some("Fix syntax in the config file and retry."),
            Self::LockContention => Some("Retry after the other `cb` process releases its lock."),
            Self::CorruptDataFile => {
                Some("Fix or remove the data file; the next save starts from an empty book.")
            }
            Self::DuplicateEntity
            | Self::NotFound
            | Self::NoMatch
            | Self::AlreadyInState
            | Self::AlreadySet
            | Self::MissingArgument
            | Self::NoNewCourses
            | Self::NoHistory => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::UnknownCommand,
            ErrorCode::InvalidFormat,
            ErrorCode::DuplicateEntity,
            ErrorCode::NotFound,
            ErrorCode::InvalidIndex,
            ErrorCode::NoMatch,
            ErrorCode::AmbiguousMatch,
            ErrorCode::AlreadyInState,
            ErrorCode::AlreadySet,
            ErrorCode::MissingArgument,
            ErrorCode::NoNewCourses,
            ErrorCode::NoHistory,
            ErrorCode::StorageFailed,
            ErrorCode::ConfigParseError,
            ErrorCode::LockContention,
            ErrorCode::CorruptDataFile,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::AmbiguousMatch.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }
}
