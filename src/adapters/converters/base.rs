// SPDX-License-Identifier: MIT OR Apache-2.0

//! Converter for plain value types.

use super::{invalid_value, unsupported_target};
use crate::domain::charset::CharsetError;
use crate::domain::{
    Charset, ConfigError, OptionType, OptionValue, Rational, Result, TimeSpan,
};
use crate::ports::{ConversionContext, TypeConverter};
use regex::Regex;
use tracing::Level;

/// Converts booleans, numbers, strings, enums, charsets, log levels, regular
/// expressions, rationals and plain time spans.
///
/// Paths and classes need more context and are handled by the file and class
/// converters.
///
/// # Examples
///
/// ```rust
/// use optcfg::adapters::converters::BaseTypeConverter;
/// use optcfg::domain::{OptionType, OptionValue};
/// use optcfg::ports::{ConversionContext, TypeConverter};
///
/// let ctx = ConversionContext::new("solver.verbose");
/// let value = BaseTypeConverter.convert(&ctx, "TRUE", &OptionType::Bool).unwrap();
/// assert_eq!(value, OptionValue::Bool(true));
/// assert!(BaseTypeConverter.convert(&ctx, "yes", &OptionType::Bool).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseTypeConverter;

impl TypeConverter for BaseTypeConverter {
    fn convert(
        &self,
        ctx: &ConversionContext<'_>,
        value: &str,
        target: &OptionType,
    ) -> Result<OptionValue> {
        match target {
            OptionType::Bool => {
                if value.eq_ignore_ascii_case("true") {
                    Ok(OptionValue::Bool(true))
                } else if value.eq_ignore_ascii_case("false") {
                    Ok(OptionValue::Bool(false))
                } else {
                    Err(invalid_value(ctx, value, "expected true or false"))
                }
            }
            OptionType::Int => value
                .parse::<i32>()
                .map(OptionValue::Int)
                .map_err(|e| invalid_value(ctx, value, e)),
            OptionType::Long => value
                .parse::<i64>()
                .map(OptionValue::Long)
                .map_err(|e| invalid_value(ctx, value, e)),
            OptionType::Double => value
                .parse::<f64>()
                .map(OptionValue::Double)
                .map_err(|e| invalid_value(ctx, value, e)),
            OptionType::Str => Ok(OptionValue::Str(value.to_string())),
            OptionType::Enum { name, variants } => variants
                .iter()
                .find(|variant| **variant == value)
                .map(|variant| OptionValue::Enum((*variant).to_string()))
                .ok_or_else(|| {
                    invalid_value(
                        ctx,
                        value,
                        format!("not a constant of {name}, expected one of {}", variants.join(", ")),
                    )
                }),
            OptionType::Charset => match Charset::for_name(value) {
                Ok(charset) => Ok(OptionValue::Charset(charset)),
                Err(CharsetError::IllegalName) => {
                    Err(invalid_value(ctx, value, "illegal charset name"))
                }
                Err(CharsetError::Unsupported) => {
                    Err(invalid_value(ctx, value, "unsupported charset"))
                }
            },
            OptionType::Level => value
                .parse::<Level>()
                .map(OptionValue::Level)
                .map_err(|e| invalid_value(ctx, value, e)),
            OptionType::Pattern => Regex::new(value)
                .map(OptionValue::Pattern)
                .map_err(|e| invalid_value(ctx, value, format!("invalid regular expression: {e}"))),
            OptionType::Rational => value
                .parse::<Rational>()
                .map(OptionValue::Rational)
                .map_err(|e| invalid_value(ctx, value, e)),
            OptionType::TimeSpan => value
                .parse::<TimeSpan>()
                .map(OptionValue::TimeSpan)
                .map_err(|e| invalid_value(ctx, value, e)),
            OptionType::Path | OptionType::PathTemplate => Err(ConfigError::unsupported(
                ctx.option_name,
                "path options need a FileOption annotation",
            )),
            OptionType::Class { .. } | OptionType::Factory { .. } | OptionType::Collection { .. } => {
                Err(unsupported_target(ctx, "BaseTypeConverter", target))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimeUnit;

    fn convert(value: &str, target: &OptionType) -> Result<OptionValue> {
        BaseTypeConverter.convert(&ConversionContext::new("test.option"), value, target)
    }

    #[test]
    fn test_bool_is_strict() {
        assert_eq!(convert("false", &OptionType::Bool).unwrap(), OptionValue::Bool(false));
        assert_eq!(convert("True", &OptionType::Bool).unwrap(), OptionValue::Bool(true));
        let error = convert("1", &OptionType::Bool).unwrap_err();
        assert!(error.to_string().contains("test.option"));
        assert!(error.to_string().contains("'1'"));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(convert("-12", &OptionType::Int).unwrap(), OptionValue::Int(-12));
        assert_eq!(
            convert("9000000000", &OptionType::Long).unwrap(),
            OptionValue::Long(9_000_000_000)
        );
        assert_eq!(convert("0.5", &OptionType::Double).unwrap(), OptionValue::Double(0.5));
        assert!(convert("9000000000", &OptionType::Int).is_err());
        assert!(convert("abc", &OptionType::Double).unwrap_err().is_user_error());
    }

    #[test]
    fn test_enum_exact_match() {
        let target = OptionType::Enum {
            name: "Mode",
            variants: &["FAST", "SLOW"],
        };
        assert_eq!(
            convert("SLOW", &target).unwrap(),
            OptionValue::Enum("SLOW".into())
        );
        let error = convert("slow", &target).unwrap_err();
        assert!(error.to_string().contains("FAST, SLOW"));
    }

    #[test]
    fn test_charset() {
        assert_eq!(
            convert("utf-8", &OptionType::Charset).unwrap(),
            OptionValue::Charset(Charset::Utf8)
        );
        assert!(convert("no such?", &OptionType::Charset)
            .unwrap_err()
            .to_string()
            .contains("illegal charset name"));
        assert!(convert("KOI8-R", &OptionType::Charset)
            .unwrap_err()
            .to_string()
            .contains("unsupported charset"));
    }

    #[test]
    fn test_level_pattern_rational_time_span() {
        assert_eq!(
            convert("warn", &OptionType::Level).unwrap(),
            OptionValue::Level(Level::WARN)
        );
        assert_eq!(
            convert("a+b", &OptionType::Pattern).unwrap().to_string(),
            "a+b"
        );
        assert!(convert("(", &OptionType::Pattern)
            .unwrap_err()
            .to_string()
            .contains("regular expression"));
        assert_eq!(
            convert("2/4", &OptionType::Rational).unwrap(),
            OptionValue::Rational(Rational::new(1, 2).unwrap())
        );
        assert_eq!(
            convert("3min", &OptionType::TimeSpan).unwrap(),
            OptionValue::TimeSpan(TimeSpan::of(3, TimeUnit::Minutes))
        );
    }

    #[test]
    fn test_string_verbatim() {
        assert_eq!(
            convert(" a, b ", &OptionType::Str).unwrap(),
            OptionValue::Str(" a, b ".into())
        );
    }

    #[test]
    fn test_paths_are_schema_errors() {
        let error = convert("x", &OptionType::Path).unwrap_err();
        assert!(matches!(error, ConfigError::UnsupportedOption { .. }));
        let error = convert("x", &OptionType::Class { bound: None }).unwrap_err();
        assert!(matches!(error, ConfigError::UnsupportedOption { .. }));
    }
}
