// SPDX-License-Identifier: MIT OR Apache-2.0

//! Option-file parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which provides an interface for
//! turning option sources into a flat map of fully-qualified option names.

use crate::domain::{ParsedOptions, Result};
use std::path::Path;

/// A trait for parsing option sources.
///
/// Parsers produce a flat [`ParsedOptions`] map whose keys are fully-qualified
/// option names (`section.key`) and which records, for every option, the source
/// that defined it.
///
/// # Examples
///
/// ```rust
/// use optcfg::domain::{OptionSource, ParsedOptions, Result};
/// use optcfg::ports::ConfigParser;
/// use std::path::Path;
///
/// struct SingleLineParser;
///
/// impl ConfigParser for SingleLineParser {
///     fn parse(&self, content: &str, _base_dir: Option<&Path>, source_name: &str) -> Result<ParsedOptions> {
///         let mut parsed = ParsedOptions::new();
///         if let Some((key, value)) = content.split_once('=') {
///             parsed.insert(key.trim(), value.trim(), OptionSource::Path(source_name.into()));
///         }
///         Ok(parsed)
///     }
///
///     fn parse_file(&self, path: &Path) -> Result<ParsedOptions> {
///         self.parse("", path.parent(), &path.display().to_string())
///     }
/// }
///
/// let parsed = SingleLineParser.parse("a.b = 1", None, "inline").unwrap();
/// assert_eq!(parsed.get("a.b"), Some("1"));
/// ```
pub trait ConfigParser {
    /// Parses option content.
    ///
    /// # Arguments
    ///
    /// * `content` - The raw content
    /// * `base_dir` - The directory relative `#include` paths are resolved against,
    ///   if the content has one
    /// * `source_name` - The name reported in errors and recorded as the source
    ///   of every option
    ///
    /// # Returns
    ///
    /// * `Ok(ParsedOptions)` - The parsed options and their sources
    /// * `Err(ConfigError)` - A grammar violation or an unreadable include
    fn parse(
        &self,
        content: &str,
        base_dir: Option<&Path>,
        source_name: &str,
    ) -> Result<ParsedOptions>;

    /// Reads and parses an option file.
    ///
    /// Relative includes are resolved against the file's directory.
    fn parse_file(&self, path: &Path) -> Result<ParsedOptions>;
}
