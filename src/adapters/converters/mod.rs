// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in type converters.
//!
//! - [`BaseTypeConverter`] handles every plain value type.
//! - [`IntegerTypeConverter`] checks ranges of integer options.
//! - [`TimeSpanTypeConverter`] parses values with time unit suffixes.
//! - [`ClassTypeConverter`] looks up classes and factories in a catalog.
//! - [`FileTypeConverter`] resolves and checks file paths.

pub mod base;
pub mod class;
pub mod file;
pub mod integer;
pub mod time_span;

pub use base::BaseTypeConverter;
pub use class::ClassTypeConverter;
pub use file::{FileConverterOptions, FileTypeConverter};
pub use integer::IntegerTypeConverter;
pub use time_span::TimeSpanTypeConverter;

use crate::domain::{ConfigError, OptionType};
use crate::ports::ConversionContext;
use std::fmt::Display;

/// A user error naming the option and the offending value.
pub(crate) fn invalid_value(
    ctx: &ConversionContext<'_>,
    value: &str,
    detail: impl Display,
) -> ConfigError {
    ConfigError::invalid(format!(
        "Invalid value '{value}' for option {}: {detail}",
        ctx.option_name
    ))
}

/// A schema error for a converter asked to produce a type it does not handle.
pub(crate) fn unsupported_target(
    ctx: &ConversionContext<'_>,
    converter: &str,
    target: &OptionType,
) -> ConfigError {
    ConfigError::unsupported(
        ctx.option_name,
        format!("{converter} cannot produce values of type {target:?}"),
    )
}
