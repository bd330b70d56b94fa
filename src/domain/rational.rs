// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exact rational numbers written as `numerator/denominator`.

use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A normalized fraction: the denominator is positive and shares no factor with
/// the numerator.
///
/// # Examples
///
/// ```
/// use optcfg::domain::rational::Rational;
///
/// let r: Rational = "6/-4".parse().unwrap();
/// assert_eq!(r, Rational::new(-3, 2).unwrap());
/// assert_eq!(r.to_string(), "-3/2");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    num: i64,
    den: i64,
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.abs()
}

impl Rational {
    /// Creates a normalized rational; fails for a zero denominator.
    pub fn new(num: i64, den: i64) -> Result<Self> {
        if den == 0 {
            return Err(ConfigError::invalid(format!(
                "Rational number {num}/{den} has a zero denominator"
            )));
        }
        let divisor = gcd(num, den).max(1);
        let sign = if den < 0 { -1 } else { 1 };
        Ok(Rational {
            num: sign * (num / divisor),
            den: sign * (den / divisor),
        })
    }

    /// Creates a whole number.
    pub fn of_integer(value: i64) -> Self {
        Rational { num: value, den: 1 }
    }

    /// The numerator.
    pub fn numerator(&self) -> i64 {
        self.num
    }

    /// The (positive) denominator.
    pub fn denominator(&self) -> i64 {
        self.den
    }

    /// Approximates the value as a float.
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl FromStr for Rational {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.trim().parse::<i64>().map_err(|e| {
                ConfigError::invalid(format!("Invalid rational number '{s}': {e}"))
            })
        };
        match s.split_once('/') {
            Some((num, den)) => Rational::new(parse(num)?, parse(den)?),
            None => Ok(Rational::of_integer(parse(s)?)),
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}
