use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::fields::FieldError;

pub const THEME_CONSTRAINTS: &str = "Theme should be either `light` or `dark`";

/// Colour scheme of the presentation layer.
///
/// Stored inside the course book so switching themes is undoable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Main stylesheet asset the front-end should load.
    #[must_use]
    pub const fn stylesheet(self) -> &'static str {
        match self {
            Self::Light => "LightTheme.css",
            Self::Dark => "DarkTheme.css",
        }
    }

    /// Companion stylesheet with component overrides.
    #[must_use]
    pub const fn extensions(self) -> &'static str {
        match self {
            Self::Light => "LightExtensions.css",
            Self::Dark => "DarkExtensions.css",
        }
    }
}

impl FromStr for Theme {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(FieldError {
                field: "theme",
                constraint: THEME_CONSTRAINTS,
            }),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Theme;

    #[test]
    fn parse_and_assets() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!(" dark ".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("solarized".parse::<Theme>().is_err());
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Light.stylesheet(), "LightTheme.css");
        assert_eq!(Theme::Dark.extensions(), "DarkExtensions.css");
    }
}
