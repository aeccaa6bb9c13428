// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Exact rational helpers backing encode/decode.
//!
//! Everything here operates on `BigInt`/`BigRational` so results stay exact
//! for any wordlength (the decimal default is 256 bits wide).

use core::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Float, One, Signed};

/// Returns `base^exp` as a big integer.
pub(crate) fn pow(base: u32, exp: u32) -> BigInt {
    BigInt::from(base).pow(exp)
}

/// Converts a finite `f64` to the exact dyadic rational it denotes.
///
/// Returns `None` for NaN and infinities.
pub(crate) fn rational_from_f64(value: f64) -> Option<BigRational> {
    if !value.is_finite() {
        return None;
    }
    let (mantissa, exponent, sign) = Float::integer_decode(value);
    let mut numer = BigInt::from(mantissa);
    if sign < 0 {
        numer = -numer;
    }
    let ratio = if exponent >= 0 {
        BigRational::from_integer(numer << exponent.unsigned_abs())
    } else {
        BigRational::new(numer, BigInt::one() << exponent.unsigned_abs())
    };
    Some(ratio)
}

/// Rounds to the nearest integer; exact halves go to the even neighbour.
pub(crate) fn round_half_even(value: &BigRational) -> BigInt {
    let q = value.floor().to_integer();
    let r = value - BigRational::from_integer(q.clone());
    let twice = r * BigRational::from_integer(BigInt::from(2));

    match twice.cmp(&BigRational::one()) {
        Ordering::Greater => q + BigInt::one(),
        Ordering::Less => q,
        Ordering::Equal if q.is_odd() => q + BigInt::one(),
        Ordering::Equal => q,
    }
}

/// Renders `int / 10^digits` with exactly `digits` fractional digits.
pub(crate) fn format_scaled(int: &BigInt, digits: usize) -> String {
    let magnitude = int.abs().to_string();
    let sign = if int.is_negative() { "-" } else { "" };
    if digits == 0 {
        return format!("{sign}{magnitude}");
    }
    let padded = format!("{magnitude:0>width$}", width = digits + 1);
    let (whole, frac) = padded.split_at(padded.len() - digits);
    format!("{sign}{whole}.{frac}")
}

/// Renders a rational as a terminating decimal when its denominator only has
/// factors 2 and 5 (always true for fixed-point values); otherwise `n/d`.
pub(crate) fn exact_decimal(value: &BigRational) -> String {
    let mut denom = value.denom().clone();
    let two = BigInt::from(2);
    let five = BigInt::from(5);
    let (mut twos, mut fives) = (0_u32, 0_u32);
    while denom.is_multiple_of(&two) {
        denom /= &two;
        twos += 1;
    }
    while denom.is_multiple_of(&five) {
        denom /= &five;
        fives += 1;
    }
    if !denom.is_one() {
        return value.to_string();
    }

    let digits = twos.max(fives);
    let scaled = value * BigRational::from_integer(pow(10, digits));
    format_scaled(&scaled.to_integer(), digits as usize)
}

/// Truncates toward zero.
pub(crate) fn trunc(value: &BigRational) -> BigInt {
    value.trunc().to_integer()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]
    use super::*;

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn rational_from_f64_is_exact() {
        assert_eq!(rational_from_f64(2.125), Some(ratio(17, 8)));
        assert_eq!(rational_from_f64(-0.5), Some(ratio(-1, 2)));
        assert_eq!(rational_from_f64(0.0), Some(ratio(0, 1)));
        assert_eq!(rational_from_f64(1024.0), Some(ratio(1024, 1)));
        // 0.1 is not a dyadic fraction; the exact value has a 2^55 denominator.
        let tenth = rational_from_f64(0.1).expect("finite");
        assert_eq!(tenth.denom(), &(BigInt::one() << 55_u32));
    }

    #[test]
    fn non_finite_has_no_rational() {
        assert_eq!(rational_from_f64(f64::NAN), None);
        assert_eq!(rational_from_f64(f64::INFINITY), None);
        assert_eq!(rational_from_f64(f64::NEG_INFINITY), None);
    }

    #[test]
    fn rounding_ties_go_to_even() {
        assert_eq!(round_half_even(&ratio(1, 2)), BigInt::from(0));
        assert_eq!(round_half_even(&ratio(3, 2)), BigInt::from(2));
        assert_eq!(round_half_even(&ratio(5, 2)), BigInt::from(2));
        assert_eq!(round_half_even(&ratio(-5, 2)), BigInt::from(-2));
        assert_eq!(round_half_even(&ratio(-3, 2)), BigInt::from(-2));
        assert_eq!(round_half_even(&ratio(7, 3)), BigInt::from(2));
        assert_eq!(round_half_even(&ratio(-7, 3)), BigInt::from(-2));
        assert_eq!(round_half_even(&ratio(8, 3)), BigInt::from(3));
    }

    #[test]
    fn decimal_rendering() {
        assert_eq!(exact_decimal(&ratio(4294967295, 100)), "42949672.95");
        assert_eq!(exact_decimal(&ratio(-1, 8)), "-0.125");
        assert_eq!(exact_decimal(&ratio(65535, 8)), "8191.875");
        assert_eq!(exact_decimal(&ratio(7, 1)), "7");
        assert_eq!(exact_decimal(&ratio(1, 3)), "1/3");
        assert_eq!(format_scaled(&BigInt::from(5), 3), "0.005");
        assert_eq!(format_scaled(&BigInt::from(-512), 2), "-5.12");
    }

    #[test]
    fn truncation_is_toward_zero() {
        assert_eq!(trunc(&ratio(-7, 2)), BigInt::from(-3));
        assert_eq!(trunc(&ratio(7, 2)), BigInt::from(3));
    }
}
