// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The four concrete fixed-point types.
//!
//! Each type pins a [`Format`] and otherwise behaves exactly like
//! [`FixedPoint`] (it derefs to one). The `new32` constructors pin the
//! wordlength to [`WORD32`] and still take precision from the scope when
//! omitted. `Default` yields zero in the scope's format.

use core::fmt;
use core::ops::Deref;

use num_bigint::BigInt;

use crate::error::FixedPointError;
use crate::numeric::Numeric;
use crate::value::{FixedPoint, Format, Params};

/// Wordlength used by the `new32` convenience constructors.
pub const WORD32: u32 = 32;

macro_rules! fixed_point_type {
    ($(#[$meta:meta])* $name:ident => $format:expr) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash)]
        pub struct $name(FixedPoint);

        impl $name {
            /// Format pinned by this type.
            pub const FORMAT: Format = $format;

            /// Encodes `value`; omitted arguments come from the scope context.
            pub fn new(
                value: impl Into<Numeric>,
                wordlength: Option<u32>,
                precision: Option<u32>,
            ) -> Result<Self, FixedPointError> {
                FixedPoint::new(Self::FORMAT, value, wordlength, precision).map(Self)
            }

            /// Encodes `value` with a 32-bit word.
            pub fn new32(
                value: impl Into<Numeric>,
                precision: Option<u32>,
            ) -> Result<Self, FixedPointError> {
                Self::new(value, Some(WORD32), precision)
            }

            /// Encodes `value` with explicit overrides.
            pub fn with_params(
                value: impl Into<Numeric>,
                params: Params,
            ) -> Result<Self, FixedPointError> {
                FixedPoint::with_params(Self::FORMAT, value, params).map(Self)
            }

            /// Builds a value from its stored integer.
            pub fn from_stored(
                int: impl Into<BigInt>,
                wordlength: Option<u32>,
                precision: Option<u32>,
            ) -> Result<Self, FixedPointError> {
                FixedPoint::from_stored(Self::FORMAT, int, wordlength, precision).map(Self)
            }

            /// Unwraps the untyped value.
            pub fn into_inner(self) -> FixedPoint {
                self.0
            }
        }

        /// Zero, with wordlength and precision from the scope context.
        impl Default for $name {
            fn default() -> Self {
                Self(FixedPoint::zero(Self::FORMAT))
            }
        }

        impl Deref for $name {
            type Target = FixedPoint;

            fn deref(&self) -> &FixedPoint {
                &self.0
            }
        }

        impl From<$name> for FixedPoint {
            fn from(value: $name) -> FixedPoint {
                value.0
            }
        }

        /// Fails (returning the value) when the format differs.
        impl TryFrom<FixedPoint> for $name {
            type Error = FixedPoint;

            fn try_from(value: FixedPoint) -> Result<Self, FixedPoint> {
                if value.format() == Self::FORMAT {
                    Ok(Self(value))
                } else {
                    Err(value)
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(&self.0, f)
            }
        }

        impl fmt::LowerHex for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::LowerHex::fmt(&self.0, f)
            }
        }

        impl fmt::Binary for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Binary::fmt(&self.0, f)
            }
        }
    };
}

fixed_point_type!(
    /// Signed fixed-point number, binary scaled.
    SignedBinary => Format::SIGNED_BINARY
);
fixed_point_type!(
    /// Unsigned fixed-point number, binary scaled.
    UnsignedBinary => Format::UNSIGNED_BINARY
);
fixed_point_type!(
    /// Signed fixed-point number, decimal scaled.
    SignedDecimal => Format::SIGNED_DECIMAL
);
fixed_point_type!(
    /// Unsigned fixed-point number, decimal scaled.
    UnsignedDecimal => Format::UNSIGNED_DECIMAL
);
