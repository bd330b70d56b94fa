// SPDX-License-Identifier: MIT OR Apache-2.0

//! Character set names.
//!
//! Options naming a character set accept the canonical name or one of its common
//! aliases, case-insensitively. Names that are not legal charset names at all
//! are reported differently from legal names that are simply unknown.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported character set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Charset {
    /// UTF-8
    Utf8,
    /// UTF-16 with byte-order mark
    Utf16,
    /// UTF-16 big endian
    Utf16Be,
    /// UTF-16 little endian
    Utf16Le,
    /// 7-bit ASCII
    UsAscii,
    /// Latin-1
    Iso8859_1,
}

/// Why a charset name was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharsetError {
    /// The name contains characters no charset name may contain.
    IllegalName,
    /// The name is well-formed but not supported.
    Unsupported,
}

const ALIASES: &[(&str, Charset)] = &[
    ("UTF-8", Charset::Utf8),
    ("UTF8", Charset::Utf8),
    ("UTF-16", Charset::Utf16),
    ("UTF16", Charset::Utf16),
    ("UTF-16BE", Charset::Utf16Be),
    ("UTF-16LE", Charset::Utf16Le),
    ("US-ASCII", Charset::UsAscii),
    ("ASCII", Charset::UsAscii),
    ("ISO-8859-1", Charset::Iso8859_1),
    ("ISO8859-1", Charset::Iso8859_1),
    ("LATIN1", Charset::Iso8859_1),
];

impl Charset {
    /// Looks up a charset by name.
    pub fn for_name(name: &str) -> std::result::Result<Charset, CharsetError> {
        let legal = !name.is_empty()
            && name.starts_with(|c: char| c.is_ascii_alphanumeric())
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | ':' | '_' | '.'));
        if !legal {
            return Err(CharsetError::IllegalName);
        }
        ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
            .map(|(_, charset)| *charset)
            .ok_or(CharsetError::Unsupported)
    }

    /// The canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Utf16 => "UTF-16",
            Charset::Utf16Be => "UTF-16BE",
            Charset::Utf16Le => "UTF-16LE",
            Charset::UsAscii => "US-ASCII",
            Charset::Iso8859_1 => "ISO-8859-1",
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
