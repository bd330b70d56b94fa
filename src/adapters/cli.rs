// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line argument option source adapter.
//!
//! This module provides an adapter that reads option values from
//! command-line arguments.

use crate::domain::{ConfigError, OptionName, OptionSource, ParsedOptions, Result};
use std::collections::BTreeMap;

/// Option source adapter for command-line arguments.
///
/// Two argument formats are accepted:
/// - `--key=value`: Long form with equals sign
/// - `--key value`: Long form with space-separated value
///
/// Every key must be a valid option name. Anything else, including positional
/// arguments and a trailing `--key` without value, is rejected.
///
/// # Examples
///
/// ```rust
/// use optcfg::adapters::CommandLineAdapter;
///
/// let args = vec!["--analysis.threads=4", "--output.path", "results/"];
/// let adapter = CommandLineAdapter::from_args(args).unwrap();
/// assert_eq!(adapter.get("analysis.threads"), Some("4"));
/// assert_eq!(adapter.get("output.path"), Some("results/"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandLineAdapter {
    /// Parsed option values
    values: BTreeMap<String, String>,
}

impl CommandLineAdapter {
    /// Creates a new command-line adapter with no arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use optcfg::adapters::CommandLineAdapter;
    ///
    /// let adapter = CommandLineAdapter::new();
    /// assert!(adapter.values().is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Creates a new command-line adapter from a list of arguments.
    ///
    /// If the same key appears more than once, the last value wins.
    ///
    /// # Arguments
    ///
    /// * `args` - The arguments, without the program name
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCmdlineArgument`] for arguments of any other form.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut adapter = Self::new();
        adapter.parse_args(args)?;
        Ok(adapter)
    }

    /// Creates a new command-line adapter from the process's command-line arguments.
    ///
    /// This skips the first argument (the program name) and parses the rest.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use optcfg::adapters::CommandLineAdapter;
    ///
    /// let adapter = CommandLineAdapter::from_env_args().unwrap();
    /// ```
    pub fn from_env_args() -> Result<Self> {
        Self::from_args(std::env::args().skip(1))
    }

    /// Parses command-line arguments and populates the values map.
    fn parse_args<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            let invalid = |message: &str| ConfigError::InvalidCmdlineArgument {
                argument: arg.to_string(),
                message: message.to_string(),
            };

            let Some(option) = arg.strip_prefix("--") else {
                return Err(invalid("expected --key=value or --key value"));
            };

            // Handle --key=value format, then --key value format
            let (key, value) = match option.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => {
                    let value = args
                        .next()
                        .ok_or_else(|| invalid("missing value"))?
                        .as_ref()
                        .to_string();
                    (option.to_string(), value)
                }
            };

            if !OptionName::is_valid(&key) {
                return Err(invalid("illegal option name"));
            }
            self.values.insert(key, value);
        }
        Ok(())
    }

    /// The value given for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// All parsed values.
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Converts the arguments into parsed options with a manual source.
    pub fn into_parsed_options(self) -> ParsedOptions {
        let mut parsed = ParsedOptions::new();
        for (key, value) in self.values {
            parsed.insert(key, value, OptionSource::Manual);
        }
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_adapter_empty() {
        let adapter = CommandLineAdapter::new();
        assert!(adapter.get("test.key").is_none());
    }

    #[test]
    fn test_cli_adapter_long_form_equals() {
        let args = vec!["--database.host=localhost", "--database.port=5432"];
        let adapter = CommandLineAdapter::from_args(args).unwrap();
        assert_eq!(adapter.get("database.host"), Some("localhost"));
        assert_eq!(adapter.get("database.port"), Some("5432"));
    }

    #[test]
    fn test_cli_adapter_long_form_space() {
        let args = vec!["--host", "localhost", "--port", "8080"];
        let adapter = CommandLineAdapter::from_args(args).unwrap();
        assert_eq!(adapter.get("host"), Some("localhost"));
        assert_eq!(adapter.get("port"), Some("8080"));
    }

    #[test]
    fn test_cli_adapter_value_may_start_with_dash() {
        let args = vec!["--offset", "-3"];
        let adapter = CommandLineAdapter::from_args(args).unwrap();
        assert_eq!(adapter.get("offset"), Some("-3"));
    }

    #[test]
    fn test_cli_adapter_missing_value() {
        let error = CommandLineAdapter::from_args(vec!["--host"]).unwrap_err();
        match error {
            ConfigError::InvalidCmdlineArgument { argument, message } => {
                assert_eq!(argument, "--host");
                assert_eq!(message, "missing value");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cli_adapter_positional_argument() {
        let error = CommandLineAdapter::from_args(vec!["positional"]).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidCmdlineArgument { .. }));
        assert!(error.is_user_error());
    }

    #[test]
    fn test_cli_adapter_illegal_key() {
        let error = CommandLineAdapter::from_args(vec!["--a b=1"]).unwrap_err();
        assert!(error.to_string().contains("illegal option name"));
    }

    #[test]
    fn test_cli_adapter_equals_in_value() {
        let args = vec!["--connection-string=host=localhost;port=5432"];
        let adapter = CommandLineAdapter::from_args(args).unwrap();
        assert_eq!(adapter.get("connection-string"), Some("host=localhost;port=5432"));
    }

    #[test]
    fn test_cli_adapter_empty_value() {
        let adapter = CommandLineAdapter::from_args(vec!["--key="]).unwrap();
        assert_eq!(adapter.get("key"), Some(""));
    }

    #[test]
    fn test_cli_adapter_override_value() {
        // If the same key appears multiple times, the last value should win
        let args = vec!["--key=value1", "--key=value2"];
        let adapter = CommandLineAdapter::from_args(args).unwrap();
        assert_eq!(adapter.get("key"), Some("value2"));
    }

    #[test]
    fn test_cli_adapter_into_parsed_options() {
        let adapter = CommandLineAdapter::from_args(vec!["--a=1", "--b", "2"]).unwrap();
        let parsed = adapter.into_parsed_options();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.source("b"), Some(&OptionSource::Manual));
    }
}
