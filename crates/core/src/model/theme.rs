use serde::{Deserialize, Serialize};
use std::fmt;

/// Display theme preference persisted alongside statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    System,
    Light,
    Dark,
}

impl ThemePreference {
    /// Interpret a stored value, falling back to `System` when absent or unknown.
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("light") => Self::Light,
            Some("dark") => Self::Dark,
            _ => Self::System,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Next preference in the toggle cycle: system, light, dark, system.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::System => Self::Light,
            Self::Light => Self::Dark,
            Self::Dark => Self::System,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_or_missing_values_default_to_system() {
        assert_eq!(ThemePreference::parse_or_default(None), ThemePreference::System);
        assert_eq!(
            ThemePreference::parse_or_default(Some("sepia")),
            ThemePreference::System
        );
        assert_eq!(
            ThemePreference::parse_or_default(Some("dark")),
            ThemePreference::Dark
        );
    }

    #[test]
    fn cycle_visits_every_preference() {
        let start = ThemePreference::System;
        assert_eq!(start.next(), ThemePreference::Light);
        assert_eq!(start.next().next(), ThemePreference::Dark);
        assert_eq!(start.next().next().next(), start);
    }
}
