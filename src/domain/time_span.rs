// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time units and time spans.
//!
//! A [`TimeSpan`] is a number together with the unit it was written in. The unit
//! is kept so that a span given as `10min` is displayed as `10min` again, even
//! when the code works with it in seconds.

use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// A unit of time, ordered from finest to coarsest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Nanoseconds
    Nanoseconds,
    /// Microseconds
    Microseconds,
    /// Milliseconds
    Milliseconds,
    /// Seconds
    Seconds,
    /// Minutes
    Minutes,
    /// Hours
    Hours,
    /// Days
    Days,
}

impl TimeUnit {
    /// Suffixes accepted in option values, with the unit each stands for.
    pub const SUFFIXES: [(&'static str, TimeUnit); 5] = [
        ("ns", TimeUnit::Nanoseconds),
        ("ms", TimeUnit::Milliseconds),
        ("s", TimeUnit::Seconds),
        ("min", TimeUnit::Minutes),
        ("h", TimeUnit::Hours),
    ];

    /// Looks up a unit by its option-value suffix.
    pub fn from_suffix(suffix: &str) -> Option<TimeUnit> {
        Self::SUFFIXES
            .iter()
            .find(|(s, _)| *s == suffix)
            .map(|(_, unit)| *unit)
    }

    /// The suffix used when displaying spans in this unit.
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "min",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        }
    }

    fn nanos(self) -> i64 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Microseconds => 1_000,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Seconds => 1_000_000_000,
            TimeUnit::Minutes => 60_000_000_000,
            TimeUnit::Hours => 3_600_000_000_000,
            TimeUnit::Days => 86_400_000_000_000,
        }
    }

    /// Converts `value` given in `from` into this unit.
    ///
    /// Conversions to a coarser unit truncate toward zero; conversions to a finer
    /// unit saturate at `i64::MIN` / `i64::MAX`.
    pub fn convert(self, value: i64, from: TimeUnit) -> i64 {
        let (target, source) = (self.nanos(), from.nanos());
        if source >= target {
            value.saturating_mul(source / target)
        } else {
            value / (target / source)
        }
    }
}

/// A span of time in a particular unit.
///
/// # Examples
///
/// ```
/// use optcfg::domain::time_span::{TimeSpan, TimeUnit};
///
/// let span: TimeSpan = "10min".parse().unwrap();
/// assert_eq!(span.as_unit(TimeUnit::Seconds), 600);
/// assert_eq!(span.to_string(), "10min");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSpan {
    span: i64,
    unit: TimeUnit,
}

impl TimeSpan {
    /// Creates a span of `span` units.
    pub fn of(span: i64, unit: TimeUnit) -> Self {
        TimeSpan { span, unit }
    }

    /// Creates an empty span in seconds.
    pub fn empty() -> Self {
        TimeSpan::of(0, TimeUnit::Seconds)
    }

    /// The raw number as written.
    pub fn span(&self) -> i64 {
        self.span
    }

    /// The unit the span was written in.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// The span expressed in another unit.
    pub fn as_unit(&self, unit: TimeUnit) -> i64 {
        unit.convert(self.span, self.unit)
    }

    /// The span as a `std::time::Duration`, clamping negative spans to zero.
    pub fn as_duration(&self) -> Duration {
        let nanos = self.as_unit(TimeUnit::Nanoseconds);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(0))
    }

    /// Splits `value` into its numeric part and its trailing unit letters.
    pub(crate) fn split_unit(value: &str) -> (&str, &str) {
        let boundary = value
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_alphabetic())
            .last()
            .map(|(i, _)| i)
            .unwrap_or(value.len());
        (value[..boundary].trim(), value[boundary..].trim())
    }
}

impl FromStr for TimeSpan {
    type Err = ConfigError;

    /// Parses strings like `10`, `10s`, `250ms` or `2 h`; a bare number is in seconds.
    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim();
        let (number, suffix) = TimeSpan::split_unit(value);
        let unit = if suffix.is_empty() {
            TimeUnit::Seconds
        } else {
            TimeUnit::from_suffix(suffix)
                .ok_or_else(|| ConfigError::invalid(format!("Invalid time unit in '{value}'")))?
        };
        let span = number
            .parse::<i64>()
            .map_err(|e| ConfigError::invalid(format!("Invalid time span '{value}': {e}")))?;
        Ok(TimeSpan::of(span, unit))
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.span, self.unit.suffix())
    }
}
