// SPDX-License-Identifier: MIT OR Apache-2.0

//! Option names and their grammar.
//!
//! An option name is a non-empty sequence of dot-separated segments, each made of
//! ASCII letters, digits, `_`, `+` and `-`. Section names in option files follow
//! the same grammar.

use crate::domain::errors::{ConfigError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static OPTION_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_+-]+(\.[a-zA-Z0-9_+-]+)*$").expect("option name pattern is valid")
});

/// A validated option name.
///
/// # Examples
///
/// ```
/// use optcfg::domain::option_name::OptionName;
///
/// let name = OptionName::new("cpa.output.file").unwrap();
/// assert_eq!(name.as_str(), "cpa.output.file");
/// assert!(OptionName::new("no spaces").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionName(String);

impl OptionName {
    /// Creates a new `OptionName`, checking it against the grammar.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if Self::is_valid(&name) {
            Ok(OptionName(name))
        } else {
            Err(ConfigError::invalid(format!(
                "Option name '{name}' contains illegal characters"
            )))
        }
    }

    /// Checks whether a string follows the option-name grammar.
    pub fn is_valid(name: &str) -> bool {
        OPTION_NAME_PATTERN.is_match(name)
    }

    /// Joins a prefix and a local name with a dot; an empty prefix yields the name.
    pub fn qualify(prefix: &str, name: &str) -> String {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        }
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `OptionName` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for OptionName {
    type Error = ConfigError;

    fn try_from(s: &str) -> Result<Self> {
        OptionName::new(s)
    }
}

impl From<OptionName> for String {
    fn from(name: OptionName) -> Self {
        name.0
    }
}

impl AsRef<str> for OptionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["a", "foo.bar", "a_b.c-d.e+f", "x1.2y", "analysis.algorithm.CEGAR"] {
            assert!(OptionName::is_valid(name), "rejected {name}");
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", ".", "a.", ".a", "a..b", "a b", "a=b", "a/b", "ä"] {
            assert!(!OptionName::is_valid(name), "accepted {name}");
        }
    }

    #[test]
    fn test_new_rejects_invalid() {
        let err = OptionName::new("bad name").unwrap_err();
        assert!(err.to_string().contains("bad name"));
    }

    #[test]
    fn test_qualify() {
        assert_eq!(OptionName::qualify("", "name"), "name");
        assert_eq!(OptionName::qualify("prefix", "name"), "prefix.name");
        assert_eq!(OptionName::qualify("a.b", "c"), "a.b.c");
    }

    #[test]
    fn test_display_and_conversions() {
        let name = OptionName::try_from("foo.bar").unwrap();
        assert_eq!(format!("{name}"), "foo.bar");
        let s: &str = name.as_ref();
        assert_eq!(s, "foo.bar");
        assert_eq!(String::from(name.clone()), "foo.bar");
        assert_eq!(name.into_string(), "foo.bar");
    }
}
