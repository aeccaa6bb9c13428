// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Overflow policy and the stored-integer range it is applied against.

use core::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

/// What happens when an encoded integer does not fit the stored range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    /// Clamp to the nearest representable bound.
    #[default]
    Saturate,
    /// Reduce modulo `2^wordlength` and reinterpret per signedness.
    Wrap,
    /// Refuse the value; construction fails with a range error.
    Reject,
}

impl Overflow {
    /// Applies the policy to `candidate`.
    ///
    /// Returns `None` only for [`Overflow::Reject`] with an out-of-range
    /// candidate. In-range candidates are returned unchanged under every policy.
    pub fn apply(self, candidate: BigInt, range: &StoredRange) -> Option<BigInt> {
        if range.contains(&candidate) {
            return Some(candidate);
        }
        match self {
            Self::Saturate => {
                if candidate > range.max {
                    Some(range.max.clone())
                } else {
                    Some(range.min.clone())
                }
            }
            Self::Wrap => Some(range.wrap(&candidate)),
            Self::Reject => None,
        }
    }
}

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Saturate => "saturate",
            Self::Wrap => "wrap",
            Self::Reject => "reject",
        };
        f.write_str(name)
    }
}

impl core::str::FromStr for Overflow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "saturate" => Ok(Self::Saturate),
            "wrap" => Ok(Self::Wrap),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown overflow policy '{other}'")),
        }
    }
}

/// Inclusive stored-integer bounds for a `(wordlength, signed)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRange {
    min: BigInt,
    max: BigInt,
    wordlength: u32,
    signed: bool,
}

impl StoredRange {
    /// Bounds of a two's-complement word (`signed`) or plain binary word.
    ///
    /// `wordlength` is expected to be non-zero; callers validate it first.
    pub fn new(wordlength: u32, signed: bool) -> Self {
        let (min, max) = if signed {
            let half = BigInt::one() << wordlength.saturating_sub(1);
            (-half.clone(), half - BigInt::one())
        } else {
            (BigInt::zero(), (BigInt::one() << wordlength) - BigInt::one())
        };
        Self {
            min,
            max,
            wordlength,
            signed,
        }
    }

    /// Smallest stored integer.
    pub fn min(&self) -> &BigInt {
        &self.min
    }

    /// Largest stored integer.
    pub fn max(&self) -> &BigInt {
        &self.max
    }

    /// True when `value` lies within `[min, max]`.
    pub fn contains(&self, value: &BigInt) -> bool {
        *value >= self.min && *value <= self.max
    }

    /// `value mod 2^wordlength`, mapped back into `[min, max]`.
    pub fn wrap(&self, value: &BigInt) -> BigInt {
        let modulus = BigInt::one() << self.wordlength;
        let reduced = value.mod_floor(&modulus);
        if self.signed && reduced > self.max {
            reduced - modulus
        } else {
            reduced
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]
    use super::*;

    fn int(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn ranges_follow_wordlength_and_signedness() {
        let s = StoredRange::new(32, true);
        assert_eq!(s.max(), &int(2_147_483_647));
        assert_eq!(s.min(), &int(-2_147_483_648));

        let u = StoredRange::new(32, false);
        assert_eq!(u.max(), &int(4_294_967_295));
        assert_eq!(u.min(), &int(0));

        let one_bit = StoredRange::new(1, true);
        assert_eq!(one_bit.max(), &int(0));
        assert_eq!(one_bit.min(), &int(-1));
    }

    #[test]
    fn saturate_clamps_to_nearest_bound() {
        let r = StoredRange::new(8, true);
        assert_eq!(Overflow::Saturate.apply(int(300), &r), Some(int(127)));
        assert_eq!(Overflow::Saturate.apply(int(-300), &r), Some(int(-128)));
        assert_eq!(Overflow::Saturate.apply(int(5), &r), Some(int(5)));
    }

    #[test]
    fn reject_refuses_out_of_range_only() {
        let r = StoredRange::new(8, false);
        assert_eq!(Overflow::Reject.apply(int(256), &r), None);
        assert_eq!(Overflow::Reject.apply(int(-1), &r), None);
        assert_eq!(Overflow::Reject.apply(int(255), &r), Some(int(255)));
    }

    #[test]
    fn wrap_is_twos_complement_reduction() {
        let s = StoredRange::new(8, true);
        assert_eq!(Overflow::Wrap.apply(int(128), &s), Some(int(-128)));
        assert_eq!(Overflow::Wrap.apply(int(255), &s), Some(int(-1)));
        assert_eq!(Overflow::Wrap.apply(int(-129), &s), Some(int(127)));

        let u = StoredRange::new(8, false);
        assert_eq!(Overflow::Wrap.apply(int(256), &u), Some(int(0)));
        assert_eq!(Overflow::Wrap.apply(int(-1), &u), Some(int(255)));
        assert_eq!(Overflow::Wrap.apply(int(513), &u), Some(int(1)));
    }

    #[test]
    fn policy_names_round_trip_through_text() {
        for policy in [Overflow::Saturate, Overflow::Wrap, Overflow::Reject] {
            assert_eq!(policy.to_string().parse::<Overflow>(), Ok(policy));
        }
        assert!("clamp".parse::<Overflow>().is_err());
        assert_eq!("REJECT".parse::<Overflow>(), Ok(Overflow::Reject));
    }
}
