// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the option library.
//!
//! Errors fall into four groups: option-file parse errors, I/O errors from the
//! environment (missing include files and the like), user configuration errors
//! (bad values supplied by the end user) and schema errors (mistakes in how a
//! type declares its options). All errors use `thiserror`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The specific rule of the option-file grammar that a line violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// The key in front of `=` does not follow the option-name grammar.
    IllegalKey,
    /// The name inside `[...]` does not follow the option-name grammar.
    IllegalSection,
    /// A non-comment line without a `=` separator.
    MissingSeparator,
    /// A line too short to contain an option.
    LineTooShort,
    /// A `#` line that is neither a comment nor `#include`.
    IllegalDirective,
    /// An `#include` without a file argument.
    MissingInclude,
    /// The same fully-qualified option was defined twice in one file.
    DuplicateOption,
    /// A file includes itself, directly or transitively.
    CircularInclusion,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParseErrorKind::IllegalKey => "Illegal character in option name",
            ParseErrorKind::IllegalSection => "Illegal character in section name",
            ParseErrorKind::MissingSeparator => "Missing key-value separator",
            ParseErrorKind::LineTooShort => "Line too short to contain an option",
            ParseErrorKind::IllegalDirective => "Illegal parser directive",
            ParseErrorKind::MissingInclude => "Include without filename",
            ParseErrorKind::DuplicateOption => "Duplicate option",
            ParseErrorKind::CircularInclusion => "Circular inclusion of file",
        };
        f.write_str(text)
    }
}

/// The main error type for option operations.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use optcfg::domain::errors::ConfigError;
///
/// fn check_threads(value: &str) -> Result<u32, ConfigError> {
///     value.parse().map_err(|_| {
///         ConfigError::invalid(format!("Invalid value '{value}' for option 'threads'"))
///     })
/// }
///
/// assert!(check_threads("many").is_err());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// An option file violates the file grammar.
    #[error("{kind} in line {line} of {source_name}: {text}")]
    Parse {
        /// Which rule was violated
        kind: ParseErrorKind,
        /// The source (file or name) being parsed
        source_name: String,
        /// One-based line number
        line: usize,
        /// The offending line, trimmed
        text: String,
    },

    /// A file named by `#include` could not be read.
    #[error("Cannot read included file {} (line {line} of {source_name}): {source}", path.display())]
    Include {
        /// The resolved include path
        path: PathBuf,
        /// The source containing the directive
        source_name: String,
        /// One-based line number of the directive
        line: usize,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// A primary option file could not be read.
    #[error("Cannot read option file {}: {source}", path.display())]
    Read {
        /// The file that was requested
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// A value supplied by the user is not acceptable for its option.
    #[error("{message}")]
    InvalidConfiguration {
        /// Human-readable message naming the option and the value
        message: String,
    },

    /// A command-line argument is not of the form `--key=value`.
    #[error("Invalid command-line argument '{argument}': {message}")]
    InvalidCmdlineArgument {
        /// The argument as given
        argument: String,
        /// What is wrong with it
        message: String,
    },

    /// The option declaration itself is wrong; the declaring code needs fixing.
    #[error("Unsupported declaration of option {option}: {message}")]
    UnsupportedOption {
        /// The qualified option name
        option: String,
        /// What is wrong with the declaration
        message: String,
    },

    /// An option setter failed with something other than a validation error.
    #[error("Unexpected failure while setting option {option}: {source}")]
    SetterFailed {
        /// The qualified option name
        option: String,
        /// The error returned by the setter
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A builder method was called in a state where it is not allowed.
    #[error("Illegal builder state: {message}")]
    BuilderState {
        /// What was wrong
        message: String,
    },
}

impl ConfigError {
    /// Creates an `InvalidConfiguration` error from a message.
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Creates an `UnsupportedOption` error for a schema mistake.
    pub fn unsupported(option: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::UnsupportedOption {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Returns the parse error kind if this is a parse error.
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            ConfigError::Parse { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns true for errors caused by values the end user supplied.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::InvalidConfiguration { .. } | ConfigError::InvalidCmdlineArgument { .. }
        )
    }
}

/// A specialized Result type for option operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let error = ConfigError::Parse {
            kind: ParseErrorKind::DuplicateOption,
            source_name: "test.properties".to_string(),
            line: 3,
            text: "foo=bar".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Duplicate option in line 3 of test.properties: foo=bar"
        );
        assert_eq!(error.parse_kind(), Some(ParseErrorKind::DuplicateOption));
    }

    #[test]
    fn test_include_error_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = ConfigError::Include {
            path: PathBuf::from("missing.properties"),
            source_name: "main.properties".to_string(),
            line: 7,
            source: io_error,
        };
        let msg = error.to_string();
        assert!(msg.contains("missing.properties"));
        assert!(msg.contains("line 7"));
        assert!(error.parse_kind().is_none());
    }

    #[test]
    fn test_invalid_configuration() {
        let error = ConfigError::invalid("Invalid value 'x' for option 'a.b'");
        assert_eq!(error.to_string(), "Invalid value 'x' for option 'a.b'");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_unsupported_option() {
        let error = ConfigError::unsupported("a.b", "needs a FileOption");
        assert!(error.to_string().contains("a.b"));
        assert!(error.to_string().contains("needs a FileOption"));
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_setter_failed() {
        let source = "not_a_number".parse::<i32>().unwrap_err();
        let error = ConfigError::SetterFailed {
            option: "a.b".to_string(),
            source: Box::new(source),
        };
        assert!(error.to_string().contains("a.b"));
    }

    #[test]
    fn test_parse_error_kinds_display_distinctly() {
        let kinds = [
            ParseErrorKind::IllegalKey,
            ParseErrorKind::IllegalSection,
            ParseErrorKind::MissingSeparator,
            ParseErrorKind::LineTooShort,
            ParseErrorKind::IllegalDirective,
            ParseErrorKind::MissingInclude,
            ParseErrorKind::DuplicateOption,
            ParseErrorKind::CircularInclusion,
        ];
        let texts: std::collections::HashSet<String> =
            kinds.iter().map(|k| k.to_string()).collect();
        assert_eq!(texts.len(), kinds.len());
    }
}
