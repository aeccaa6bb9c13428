// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type shared by construction, context and config paths.

use num_rational::BigRational;
use thiserror::Error;

use crate::exact::exact_decimal;

/// Failures raised while encoding a value or configuring a context.
///
/// Two categories matter to callers: [`is_type_error`](Self::is_type_error)
/// (the input cannot be encoded at all) and
/// [`is_range_error`](Self::is_range_error) (the input is numeric but does not
/// fit the requested format under the `Reject` policy).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixedPointError {
    /// Input is not an integer or a finite real number.
    #[error("cannot encode {input}: value must be an integer or a finite real number")]
    NotNumeric {
        /// Rendering of the rejected input.
        input: String,
    },
    /// Encoded value falls outside `[min_int, max_int]`.
    #[error(
        "value {} out of range for {wordlength}-bit {} data type; must be in range {} to {}",
        exact_decimal(.value),
        if *.signed { "signed" } else { "unsigned" },
        exact_decimal(.lower),
        exact_decimal(.upper)
    )]
    OutOfRange {
        /// Real value that was requested (before rounding).
        value: BigRational,
        /// Smallest representable real value.
        lower: BigRational,
        /// Largest representable real value.
        upper: BigRational,
        /// Wordlength of the rejected format.
        wordlength: u32,
        /// Signedness of the rejected format.
        signed: bool,
    },
    /// Wordlength must be at least one bit.
    #[error("invalid wordlength {0}: must be at least 1")]
    InvalidWordlength(u32),
}

impl FixedPointError {
    /// True when the input could not be encoded at all.
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::NotNumeric { .. })
    }

    /// True when the input was numeric but outside the representable range.
    pub fn is_range_error(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    pub(crate) fn not_numeric(input: impl ToString) -> Self {
        Self::NotNumeric {
            input: input.to_string(),
        }
    }
}
