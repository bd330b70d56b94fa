// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type converter trait definition.
//!
//! A [`TypeConverter`] turns the raw string of an option into an [`OptionValue`]
//! of the declared type. Converters are registered per [`ConverterKey`]: either a
//! declared type or a secondary annotation, the latter taking precedence.

use crate::domain::{
    OptionSource, OptionType, OptionValue, Result, SecondaryKind, SecondaryOption, TypeKey,
};
use std::fmt;

/// What a converter is registered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConverterKey {
    /// All options of a type
    Type(TypeKey),
    /// All options carrying a secondary annotation
    Secondary(SecondaryKind),
}

impl fmt::Display for ConverterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConverterKey::Type(key) => write!(f, "{key:?}"),
            ConverterKey::Secondary(kind) => write!(f, "{kind}"),
        }
    }
}

/// Information about the option being converted.
#[derive(Clone, Copy, Debug)]
pub struct ConversionContext<'a> {
    /// The qualified option name
    pub option_name: &'a str,
    /// The secondary annotation, if any
    pub secondary: Option<&'a SecondaryOption>,
    /// Where the value came from, if it came from somewhere
    pub source: Option<&'a OptionSource>,
}

impl<'a> ConversionContext<'a> {
    /// Creates a context without annotation or source.
    pub fn new(option_name: &'a str) -> Self {
        ConversionContext {
            option_name,
            secondary: None,
            source: None,
        }
    }

    /// Attaches the secondary annotation.
    pub fn with_secondary(mut self, secondary: Option<&'a SecondaryOption>) -> Self {
        self.secondary = secondary;
        self
    }

    /// Attaches the value source.
    pub fn with_source(mut self, source: Option<&'a OptionSource>) -> Self {
        self.source = source;
        self
    }
}

/// A trait for converting option values.
///
/// `target` is always a non-container type: the injection engine splits
/// container values and converts each element separately.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; converters are shared between
/// configurations.
///
/// # Examples
///
/// ```rust
/// use optcfg::domain::{ConfigError, OptionType, OptionValue, Result};
/// use optcfg::ports::{ConversionContext, TypeConverter};
///
/// #[derive(Debug)]
/// struct YesNoConverter;
///
/// impl TypeConverter for YesNoConverter {
///     fn convert(&self, ctx: &ConversionContext<'_>, value: &str, _target: &OptionType) -> Result<OptionValue> {
///         match value {
///             "yes" => Ok(OptionValue::Bool(true)),
///             "no" => Ok(OptionValue::Bool(false)),
///             _ => Err(ConfigError::invalid(format!(
///                 "Invalid value '{value}' for option {}",
///                 ctx.option_name
///             ))),
///         }
///     }
/// }
///
/// let ctx = ConversionContext::new("verbose");
/// assert_eq!(YesNoConverter.convert(&ctx, "yes", &OptionType::Bool).unwrap(), OptionValue::Bool(true));
/// ```
pub trait TypeConverter: Send + Sync + fmt::Debug {
    /// Converts a raw value.
    fn convert(
        &self,
        ctx: &ConversionContext<'_>,
        value: &str,
        target: &OptionType,
    ) -> Result<OptionValue>;

    /// Post-processes the default value of an option that was not set.
    ///
    /// Returns the default unchanged unless overridden.
    fn convert_default(
        &self,
        _ctx: &ConversionContext<'_>,
        default: OptionValue,
        _target: &OptionType,
    ) -> Result<OptionValue> {
        Ok(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Echo;

    impl TypeConverter for Echo {
        fn convert(
            &self,
            _ctx: &ConversionContext<'_>,
            value: &str,
            _target: &OptionType,
        ) -> Result<OptionValue> {
            Ok(OptionValue::Str(value.to_string()))
        }
    }

    #[test]
    fn test_default_hook_is_identity() {
        let ctx = ConversionContext::new("a.b");
        let value = Echo
            .convert_default(&ctx, OptionValue::Int(4), &OptionType::Int)
            .unwrap();
        assert_eq!(value, OptionValue::Int(4));
    }

    #[test]
    fn test_context_builders() {
        let source = OptionSource::Manual;
        let secondary = SecondaryOption::Integer(crate::domain::IntegerOption::default());
        let ctx = ConversionContext::new("a.b")
            .with_secondary(Some(&secondary))
            .with_source(Some(&source));
        assert_eq!(ctx.option_name, "a.b");
        assert_eq!(ctx.secondary.map(SecondaryOption::kind), Some(SecondaryKind::Integer));
        assert_eq!(ctx.source, Some(&OptionSource::Manual));
    }

    #[test]
    fn test_converter_key_display() {
        assert_eq!(ConverterKey::Type(TypeKey::Bool).to_string(), "Bool");
        assert_eq!(
            ConverterKey::Secondary(SecondaryKind::TimeSpan).to_string(),
            "TimeSpanOption"
        );
    }
}
