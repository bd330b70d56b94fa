// SPDX-License-Identifier: MIT OR Apache-2.0

//! Converter for integer options with a range restriction.

use super::{invalid_value, unsupported_target};
use crate::domain::{ConfigError, IntegerOption, OptionType, OptionValue, Result, SecondaryOption};
use crate::ports::{ConversionContext, TypeConverter};

/// Converts `i32` and `i64` options annotated with [`IntegerOption`].
///
/// # Examples
///
/// ```rust
/// use optcfg::adapters::converters::IntegerTypeConverter;
/// use optcfg::domain::{IntegerOption, OptionType, OptionValue, SecondaryOption};
/// use optcfg::ports::{ConversionContext, TypeConverter};
///
/// let range = SecondaryOption::from(IntegerOption::range(1, 8));
/// let ctx = ConversionContext::new("threads").with_secondary(Some(&range));
/// assert_eq!(IntegerTypeConverter.convert(&ctx, "4", &OptionType::Int).unwrap(), OptionValue::Int(4));
/// assert!(IntegerTypeConverter.convert(&ctx, "9", &OptionType::Int).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerTypeConverter;

impl TypeConverter for IntegerTypeConverter {
    fn convert(
        &self,
        ctx: &ConversionContext<'_>,
        value: &str,
        target: &OptionType,
    ) -> Result<OptionValue> {
        let range = match ctx.secondary {
            Some(SecondaryOption::Integer(range)) => *range,
            Some(other) => {
                return Err(ConfigError::unsupported(
                    ctx.option_name,
                    format!("IntegerTypeConverter cannot handle {}", other.kind()),
                ))
            }
            None => IntegerOption::default(),
        };

        let number = value
            .parse::<i64>()
            .map_err(|e| invalid_value(ctx, value, e))?;
        if number < range.min || number > range.max {
            return Err(invalid_value(
                ctx,
                value,
                format!("must be in range [{}, {}]", range.min, range.max),
            ));
        }

        match target {
            OptionType::Int => i32::try_from(number)
                .map(OptionValue::Int)
                .map_err(|_| invalid_value(ctx, value, "too large for a 32-bit integer option")),
            OptionType::Long => Ok(OptionValue::Long(number)),
            other => Err(unsupported_target(ctx, "IntegerTypeConverter", other)),
        }
    }
}
