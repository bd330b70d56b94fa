// SPDX-License-Identifier: MIT OR Apache-2.0

//! Converter for time spans given with a unit suffix.

use super::{invalid_value, unsupported_target};
use crate::domain::{
    ConfigError, OptionType, OptionValue, Result, SecondaryOption, TimeSpan, TimeUnit,
};
use crate::ports::{ConversionContext, TypeConverter};

/// Converts options annotated with a time-span annotation.
///
/// The value is a number followed by an optional unit (`ns`, `ms`, `s`, `min`,
/// `h`); without a unit the annotation's default user unit applies. Integer
/// options receive the value in the annotation's code unit, [`TimeSpan`]
/// options keep the unit the user wrote. Unknown units are rejected.
///
/// # Examples
///
/// ```rust
/// use optcfg::adapters::converters::TimeSpanTypeConverter;
/// use optcfg::domain::{OptionType, OptionValue, SecondaryOption, TimeSpanOption, TimeUnit};
/// use optcfg::ports::{ConversionContext, TypeConverter};
///
/// let annotation = SecondaryOption::from(TimeSpanOption::new(TimeUnit::Seconds, TimeUnit::Seconds));
/// let ctx = ConversionContext::new("limits.time").with_secondary(Some(&annotation));
/// let value = TimeSpanTypeConverter.convert(&ctx, "10min", &OptionType::Long).unwrap();
/// assert_eq!(value, OptionValue::Long(600));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSpanTypeConverter;

impl TypeConverter for TimeSpanTypeConverter {
    fn convert(
        &self,
        ctx: &ConversionContext<'_>,
        value: &str,
        target: &OptionType,
    ) -> Result<OptionValue> {
        let Some(SecondaryOption::TimeSpan(annotation)) = ctx.secondary else {
            return Err(ConfigError::unsupported(
                ctx.option_name,
                "TimeSpanTypeConverter needs a TimeSpanOption annotation",
            ));
        };

        let (number, suffix) = TimeSpan::split_unit(value);
        if !number.chars().any(|c| c.is_ascii_digit()) {
            return Err(invalid_value(ctx, value, "time span contains no number"));
        }
        let user_unit = if suffix.is_empty() {
            annotation.default_user_unit
        } else {
            TimeUnit::from_suffix(suffix).ok_or_else(|| {
                invalid_value(
                    ctx,
                    value,
                    format!("time span contains invalid unit '{suffix}'"),
                )
            })?
        };
        let raw = number
            .parse::<i64>()
            .map_err(|e| invalid_value(ctx, value, e))?;

        let in_code_unit = annotation.code_unit.convert(raw, user_unit);
        if in_code_unit < annotation.min || in_code_unit > annotation.max {
            return Err(invalid_value(
                ctx,
                value,
                format!(
                    "must be in range [{}, {}] {}",
                    annotation.min,
                    annotation.max,
                    annotation.code_unit.suffix()
                ),
            ));
        }

        match target {
            OptionType::Int => i32::try_from(in_code_unit)
                .map(OptionValue::Int)
                .map_err(|_| invalid_value(ctx, value, "too large for a 32-bit integer option")),
            OptionType::Long => Ok(OptionValue::Long(in_code_unit)),
            OptionType::TimeSpan => Ok(OptionValue::TimeSpan(TimeSpan::of(raw, user_unit))),
            other => Err(unsupported_target(ctx, "TimeSpanTypeConverter", other)),
        }
    }
}
