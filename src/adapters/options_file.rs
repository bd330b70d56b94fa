// SPDX-License-Identifier: MIT OR Apache-2.0

//! Option-file parser.
//!
//! The format is line based:
//!
//! ```text
//! // comment
//! # comment
//! #include common.properties
//!
//! [analysis]
//! threads = 4
//! sourceFiles = a.c, \
//!     b.c
//! []
//! log.level = FINE
//! ```
//!
//! Lines starting with `# ` or `//` are comments. `#include <file>` reads
//! another file; options defined directly in a file override those it includes,
//! and later includes override earlier ones. `[name]` prefixes all following
//! keys with `name.` until the next section header; `[]` clears the prefix. A
//! value ending in a single `\` continues on the next line.

use crate::domain::{ConfigError, OptionName, OptionSource, ParseErrorKind, ParsedOptions, Result};
use crate::ports::{ConfigParser, FileReader};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::file_system::FsFileReader;

/// Parser for the option-file format.
///
/// # Examples
///
/// ```rust
/// use optcfg::adapters::OptionsFileParser;
/// use optcfg::ports::ConfigParser;
///
/// let parser = OptionsFileParser::new();
/// let parsed = parser
///     .parse("[analysis]\nthreads = 4\nname = long \\\nname", None, "inline")
///     .unwrap();
/// assert_eq!(parsed.get("analysis.threads"), Some("4"));
/// assert_eq!(parsed.get("analysis.name"), Some("long name"));
/// ```
#[derive(Clone)]
pub struct OptionsFileParser {
    reader: Arc<dyn FileReader>,
}

/// A key whose value continues on the next line.
struct PendingValue {
    key: String,
    value: String,
}

struct ParseState<'a> {
    source_name: &'a str,
    base_dir: Option<&'a Path>,
    include_stack: &'a [PathBuf],
}

impl ParseState<'_> {
    fn error(&self, kind: ParseErrorKind, line: usize, text: &str) -> ConfigError {
        ConfigError::Parse {
            kind,
            source_name: self.source_name.to_string(),
            line,
            text: text.to_string(),
        }
    }
}

impl OptionsFileParser {
    /// Creates a parser reading includes from the file system.
    pub fn new() -> Self {
        Self::with_reader(Arc::new(FsFileReader::new()))
    }

    /// Creates a parser reading includes through `reader`.
    pub fn with_reader(reader: Arc<dyn FileReader>) -> Self {
        OptionsFileParser { reader }
    }

    /// The file reader used for includes.
    pub fn reader(&self) -> &Arc<dyn FileReader> {
        &self.reader
    }

    /// Strips a single trailing `\`, reporting whether one was there.
    fn strip_continuation(value: &str) -> (&str, bool) {
        if value.ends_with('\\') && !value.ends_with("\\\\") {
            (&value[..value.len() - 1], true)
        } else {
            (value, false)
        }
    }

    fn parse_with_stack(
        &self,
        content: &str,
        state: &ParseState<'_>,
    ) -> Result<ParsedOptions> {
        let mut direct = ParsedOptions::new();
        let mut included = ParsedOptions::new();
        let mut prefix = String::new();
        let mut pending: Option<PendingValue> = None;
        let source = OptionSource::Path(PathBuf::from(state.source_name));

        for (index, raw_line) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw_line.trim();

            if let Some(mut continued) = pending.take() {
                let (part, more) = Self::strip_continuation(line);
                continued.value.push_str(part);
                if more {
                    pending = Some(continued);
                } else {
                    direct.insert(continued.key, continued.value, source.clone());
                }
                continue;
            }

            if line.is_empty() || line.starts_with("# ") || line.starts_with("//") {
                continue;
            }

            if line.starts_with('#') {
                let Some(argument) = line.strip_prefix("#include") else {
                    return Err(state.error(ParseErrorKind::IllegalDirective, line_no, line));
                };
                let argument = argument.trim();
                if argument.is_empty() {
                    return Err(state.error(ParseErrorKind::MissingInclude, line_no, line));
                }
                let nested = self.parse_include(argument, state, line_no, line)?;
                included.extend(nested);
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') && line.len() >= 2 {
                let section = line[1..line.len() - 1].trim();
                if section.is_empty() {
                    prefix.clear();
                } else if OptionName::is_valid(section) {
                    prefix = format!("{section}.");
                } else {
                    return Err(state.error(ParseErrorKind::IllegalSection, line_no, line));
                }
                continue;
            }

            if line.chars().count() < 2 {
                return Err(state.error(ParseErrorKind::LineTooShort, line_no, line));
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(state.error(ParseErrorKind::MissingSeparator, line_no, line));
            };
            let key = key.trim();
            if !OptionName::is_valid(key) {
                return Err(state.error(ParseErrorKind::IllegalKey, line_no, line));
            }
            let full_key = format!("{prefix}{key}");
            if direct.contains(&full_key) {
                return Err(state.error(ParseErrorKind::DuplicateOption, line_no, line));
            }

            let (value, more) = Self::strip_continuation(value.trim());
            if more {
                pending = Some(PendingValue {
                    key: full_key,
                    value: value.to_string(),
                });
            } else {
                direct.insert(full_key, value, source.clone());
            }
        }

        if let Some(continued) = pending {
            direct.insert(continued.key, continued.value, source.clone());
        }

        // Direct assignments win over everything that was included.
        let mut result = included;
        result.extend(direct);
        result.set_all_sources(&source);
        tracing::trace!(
            "Parsed {} options from '{}'",
            result.len(),
            state.source_name
        );
        Ok(result)
    }

    fn parse_include(
        &self,
        argument: &str,
        state: &ParseState<'_>,
        line_no: usize,
        line: &str,
    ) -> Result<ParsedOptions> {
        let mut path = PathBuf::from(argument);
        if path.is_relative() {
            if let Some(base_dir) = state.base_dir {
                path = base_dir.join(path);
            }
        }

        let include_error = |path: &Path, source: std::io::Error| ConfigError::Include {
            path: path.to_path_buf(),
            source_name: state.source_name.to_string(),
            line: line_no,
            source,
        };

        let canonical = self
            .reader
            .canonicalize(&path)
            .map_err(|e| include_error(&path, e))?;
        if state.include_stack.contains(&canonical) {
            return Err(state.error(ParseErrorKind::CircularInclusion, line_no, line));
        }
        let content = self
            .reader
            .read_to_string(&canonical)
            .map_err(|e| include_error(&canonical, e))?;

        tracing::debug!(
            "Including '{}' from line {} of '{}'",
            canonical.display(),
            line_no,
            state.source_name
        );

        let mut include_stack = state.include_stack.to_vec();
        include_stack.push(canonical.clone());
        let source_name = path.display().to_string();
        let nested = ParseState {
            source_name: &source_name,
            base_dir: canonical.parent(),
            include_stack: &include_stack,
        };
        self.parse_with_stack(&content, &nested)
    }
}

impl Default for OptionsFileParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OptionsFileParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsFileParser")
            .field("reader", &self.reader)
            .finish()
    }
}

impl ConfigParser for OptionsFileParser {
    fn parse(
        &self,
        content: &str,
        base_dir: Option<&Path>,
        source_name: &str,
    ) -> Result<ParsedOptions> {
        let state = ParseState {
            source_name,
            base_dir,
            include_stack: &[],
        };
        self.parse_with_stack(content, &state)
    }

    fn parse_file(&self, path: &Path) -> Result<ParsedOptions> {
        let read_error = |source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        };
        let canonical = self.reader.canonicalize(path).map_err(read_error)?;
        let content = self.reader.read_to_string(&canonical).map_err(read_error)?;
        let source_name = path.display().to_string();
        let include_stack = [canonical.clone()];
        let state = ParseState {
            source_name: &source_name,
            base_dir: canonical.parent(),
            include_stack: &include_stack,
        };
        self.parse_with_stack(&content, &state)
    }
}
