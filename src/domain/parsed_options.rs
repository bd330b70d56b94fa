// SPDX-License-Identifier: MIT OR Apache-2.0

//! The flat result of parsing one option source.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where an option value came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum OptionSource {
    /// Defined in a file, or in a string source carrying a path-like name.
    Path(PathBuf),
    /// Set programmatically or on the command line.
    Manual,
}

impl OptionSource {
    /// The path of the defining source, if it has one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            OptionSource::Path(path) => Some(path),
            OptionSource::Manual => None,
        }
    }
}

impl fmt::Display for OptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSource::Path(path) => write!(f, "{}", path.display()),
            OptionSource::Manual => f.write_str("manually set"),
        }
    }
}

/// Option values and their sources, keyed by fully-qualified option name.
///
/// Both maps always have the same key set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedOptions {
    options: BTreeMap<String, String>,
    sources: BTreeMap<String, OptionSource>,
}

impl ParsedOptions {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option, replacing any earlier value and source.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>, source: OptionSource) {
        let name = name.into();
        self.sources.insert(name.clone(), source);
        self.options.insert(name, value.into());
    }

    /// Adds all options of `other`, which win on collisions.
    pub fn extend(&mut self, other: ParsedOptions) {
        self.options.extend(other.options);
        self.sources.extend(other.sources);
    }

    /// Replaces the source of every option.
    pub fn set_all_sources(&mut self, source: &OptionSource) {
        for value in self.sources.values_mut() {
            *value = source.clone();
        }
    }

    /// The value of an option.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    /// The source of an option.
    pub fn source(&self, name: &str) -> Option<&OptionSource> {
        self.sources.get(name)
    }

    /// True if the option is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// True if no option is defined.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// The option values.
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// The option sources.
    pub fn sources(&self) -> &BTreeMap<String, OptionSource> {
        &self.sources
    }

    /// Splits the result into its value and source maps.
    pub fn into_parts(self) -> (BTreeMap<String, String>, BTreeMap<String, OptionSource>) {
        (self.options, self.sources)
    }
}
