// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Numeric input accepted by fixed-point construction.

use core::fmt;
use core::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::error::FixedPointError;
use crate::exact::{pow, rational_from_f64};

/// Largest power of ten a parsed literal may be scaled by, in either
/// direction, after folding the exponent and the fractional digits together.
///
/// A 256-bit word at precision 18 needs at most 96 significant digits, so
/// this leaves ample room while keeping parsing bounded.
pub const MAX_LITERAL_SCALE: u32 = 10_000;

/// A number to encode: an exact integer, a binary float, or an exact ratio.
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    /// Exact integer.
    Int(BigInt),
    /// IEEE-754 double; must be finite to be encodable.
    Real(f64),
    /// Exact rational.
    Exact(BigRational),
}

impl Numeric {
    /// Exact rational value of the input.
    ///
    /// NaN and infinities have no rational value and are reported as
    /// [`FixedPointError::NotNumeric`].
    pub fn to_rational(&self) -> Result<BigRational, FixedPointError> {
        match self {
            Self::Int(i) => Ok(BigRational::from_integer(i.clone())),
            Self::Real(r) => rational_from_f64(*r).ok_or_else(|| FixedPointError::not_numeric(r)),
            Self::Exact(q) => Ok(q.clone()),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Exact(q) => write!(f, "{q}"),
        }
    }
}

macro_rules! numeric_from_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Numeric {
                fn from(value: $t) -> Self {
                    Self::Int(BigInt::from(value))
                }
            }
        )*
    };
}

numeric_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<f32> for Numeric {
    fn from(value: f32) -> Self {
        Self::Real(f64::from(value))
    }
}

impl From<BigInt> for Numeric {
    fn from(value: BigInt) -> Self {
        Self::Int(value)
    }
}

impl From<&BigInt> for Numeric {
    fn from(value: &BigInt) -> Self {
        Self::Int(value.clone())
    }
}

impl From<BigRational> for Numeric {
    fn from(value: BigRational) -> Self {
        Self::Exact(value)
    }
}

impl From<&BigRational> for Numeric {
    fn from(value: &BigRational) -> Self {
        Self::Exact(value.clone())
    }
}

/// Parses integer and decimal literals exactly: `-12`, `5.125`, `.5`,
/// `1e3`, `2.5E-4`. Surrounding whitespace is ignored. Anything else cannot
/// be encoded.
impl FromStr for Numeric {
    type Err = FixedPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = || FixedPointError::not_numeric(format!("{s:?}"));
        let text = s.trim();

        let (mantissa, exponent) = match text.find(['e', 'E']) {
            Some(at) => (&text[..at], Some(&text[at + 1..])),
            None => (text, None),
        };
        let (negative, digits) = match mantissa.as_bytes().first() {
            Some(b'-') => (true, &mantissa[1..]),
            Some(b'+') => (false, &mantissa[1..]),
            _ => (false, mantissa),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(fail());
        }

        let shift: i64 = match exponent {
            Some(e) => e.parse().map_err(|_| fail())?,
            None => 0,
        };
        let frac_len = i64::try_from(frac.len()).map_err(|_| fail())?;
        let scale = shift.checked_sub(frac_len).ok_or_else(fail)?;

        let mut numer: BigInt = format!("{whole}{frac}").parse().map_err(|_| fail())?;
        if negative {
            numer = -numer;
        }

        let magnitude = u32::try_from(scale.unsigned_abs())
            .ok()
            .filter(|m| *m <= MAX_LITERAL_SCALE)
            .ok_or_else(fail)?;
        if scale >= 0 {
            let value = numer * pow(10, magnitude);
            if exponent.is_none() && frac.is_empty() {
                return Ok(Self::Int(value));
            }
            Ok(Self::Exact(BigRational::from_integer(value)))
        } else {
            Ok(Self::Exact(BigRational::new(numer, pow(10, magnitude))))
        }
    }
}
