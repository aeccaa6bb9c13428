// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed-point values: encoding, range checks and exact views.
//!
//! A value stores a two's-complement integer `int` together with the format it
//! was encoded under. Its real value is `int / base^precision`.
//!
//! Encoding steps:
//! 1. Resolve wordlength, precision and overflow policy (explicit argument,
//!    otherwise the calling scope's [`Context`](crate::Context) for the family).
//! 2. Convert the input to an exact rational; NaN/∞ are rejected.
//! 3. Scale by `base^precision` and round half to even.
//! 4. Apply the overflow policy against the `(wordlength, signed)` range.

use core::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};
use tracing::debug;

use crate::context::{current_context, validate_wordlength, Family};
use crate::error::FixedPointError;
use crate::exact::{exact_decimal, format_scaled, pow, round_half_even, trunc};
use crate::numeric::Numeric;
use crate::overflow::{Overflow, StoredRange};

/// Scaling family plus signedness: the identity of a fixed-point type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Format {
    family: Family,
    signed: bool,
}

impl Format {
    /// Signed, base-2 scaled.
    pub const SIGNED_BINARY: Self = Self::new(Family::Binary, true);
    /// Unsigned, base-2 scaled.
    pub const UNSIGNED_BINARY: Self = Self::new(Family::Binary, false);
    /// Signed, base-10 scaled.
    pub const SIGNED_DECIMAL: Self = Self::new(Family::Decimal, true);
    /// Unsigned, base-10 scaled.
    pub const UNSIGNED_DECIMAL: Self = Self::new(Family::Decimal, false);

    /// Format for `family` with the given signedness.
    pub const fn new(family: Family, signed: bool) -> Self {
        Self { family, signed }
    }

    /// Scaling family.
    pub const fn family(self) -> Family {
        self.family
    }

    /// Whether stored integers are two's-complement signed.
    pub const fn signed(self) -> bool {
        self.signed
    }

    /// Scaling base (2 or 10).
    pub const fn base(self) -> u32 {
        self.family.base()
    }

    /// Type name used in debug output.
    pub const fn name(self) -> &'static str {
        match (self.family, self.signed) {
            (Family::Binary, true) => "SignedBinary",
            (Family::Binary, false) => "UnsignedBinary",
            (Family::Decimal, true) => "SignedDecimal",
            (Family::Decimal, false) => "UnsignedDecimal",
        }
    }
}

/// Optional per-call overrides; `None` fields come from the scope context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Params {
    /// Total bit width of the stored integer.
    pub wordlength: Option<u32>,
    /// Fractional digits in the family's base.
    pub precision: Option<u32>,
    /// Overflow policy.
    pub overflow: Option<Overflow>,
}

impl Params {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the wordlength.
    pub fn wordlength(mut self, wordlength: u32) -> Self {
        self.wordlength = Some(wordlength);
        self
    }

    /// Overrides the precision.
    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Overrides the overflow policy.
    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = Some(overflow);
        self
    }
}

/// An immutable fixed-point number.
///
/// There are no arithmetic operators; derive new values by constructing them.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FixedPoint {
    int: BigInt,
    wordlength: u32,
    precision: u32,
    format: Format,
}

impl FixedPoint {
    /// Encodes `value`; omitted `wordlength`/`precision` come from the scope
    /// context of `format`'s family, as does the overflow policy.
    pub fn new(
        format: Format,
        value: impl Into<Numeric>,
        wordlength: Option<u32>,
        precision: Option<u32>,
    ) -> Result<Self, FixedPointError> {
        Self::with_params(
            format,
            value,
            Params {
                wordlength,
                precision,
                overflow: None,
            },
        )
    }

    /// Encodes `value` with explicit overrides (including the overflow policy).
    pub fn with_params(
        format: Format,
        value: impl Into<Numeric>,
        params: Params,
    ) -> Result<Self, FixedPointError> {
        let ctx = current_context(format.family);
        let wordlength = validate_wordlength(params.wordlength.unwrap_or(ctx.wordlength()))?;
        let precision = params.precision.unwrap_or(ctx.precision());
        let overflow = params.overflow.unwrap_or(ctx.overflow());

        let real = value.into().to_rational()?;
        let scale = pow(format.base(), precision);
        let candidate = round_half_even(&(&real * BigRational::from_integer(scale.clone())));
        let range = StoredRange::new(wordlength, format.signed);

        let Some(int) = overflow.apply(candidate.clone(), &range) else {
            debug!(
                %candidate,
                wordlength,
                signed = format.signed,
                "rejected out-of-range value"
            );
            return Err(out_of_range(real, &range, &scale, wordlength, format.signed));
        };
        if int != candidate {
            debug!(
                %candidate,
                stored = %int,
                wordlength,
                signed = format.signed,
                %overflow,
                "encoded value overflowed"
            );
        }

        Ok(Self {
            int,
            wordlength,
            precision,
            format,
        })
    }

    /// Builds a value directly from its stored integer.
    ///
    /// Out-of-range integers are always rejected, whatever the scope's policy.
    pub fn from_stored(
        format: Format,
        int: impl Into<BigInt>,
        wordlength: Option<u32>,
        precision: Option<u32>,
    ) -> Result<Self, FixedPointError> {
        let ctx = current_context(format.family);
        let wordlength = validate_wordlength(wordlength.unwrap_or(ctx.wordlength()))?;
        let precision = precision.unwrap_or(ctx.precision());
        let int = int.into();
        let range = StoredRange::new(wordlength, format.signed);
        if !range.contains(&int) {
            let scale = pow(format.base(), precision);
            let real = BigRational::new(int, scale.clone());
            return Err(out_of_range(real, &range, &scale, wordlength, format.signed));
        }
        Ok(Self {
            int,
            wordlength,
            precision,
            format,
        })
    }

    /// Zero in `format`, with wordlength and precision from the scope context.
    ///
    /// Zero fits every wordlength, so this cannot fail.
    pub fn zero(format: Format) -> Self {
        let ctx = current_context(format.family);
        Self {
            int: BigInt::zero(),
            wordlength: ctx.wordlength(),
            precision: ctx.precision(),
            format,
        }
    }

    /// Stored two's-complement integer.
    pub fn int(&self) -> &BigInt {
        &self.int
    }

    /// Total bit width of the stored integer.
    pub fn wordlength(&self) -> u32 {
        self.wordlength
    }

    /// Fractional digits in the scaling base.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Scaling base (2 or 10).
    pub fn base(&self) -> u32 {
        self.format.base()
    }

    /// Scaling family.
    pub fn family(&self) -> Family {
        self.format.family
    }

    /// Whether the stored integer is signed.
    pub fn signed(&self) -> bool {
        self.format.signed
    }

    /// Format (family + signedness) this value was encoded under.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Largest stored integer for this format.
    pub fn max_int(&self) -> BigInt {
        self.range().max().clone()
    }

    /// Smallest stored integer for this format.
    pub fn min_int(&self) -> BigInt {
        self.range().min().clone()
    }

    /// Largest representable real value.
    pub fn upper_bound(&self) -> BigRational {
        BigRational::new(self.max_int(), self.scale())
    }

    /// Smallest representable real value.
    pub fn lower_bound(&self) -> BigRational {
        BigRational::new(self.min_int(), self.scale())
    }

    /// Value of one unit in the last place, `base^-precision`.
    pub fn lsb(&self) -> BigRational {
        BigRational::new(BigInt::from(1), self.scale())
    }

    /// Exact real value.
    pub fn to_ratio(&self) -> BigRational {
        BigRational::new(self.int.clone(), self.scale())
    }

    /// Exact real value as `(numerator, denominator)` in lowest terms.
    pub fn as_exact_ratio(&self) -> (BigInt, BigInt) {
        let ratio = self.to_ratio();
        (ratio.numer().clone(), ratio.denom().clone())
    }

    /// Nearest `f64` to the real value; approximate for wide formats.
    ///
    /// Magnitudes beyond `f64` range map to the matching infinity.
    pub fn to_f64(&self) -> f64 {
        self.to_ratio().to_f64().unwrap_or(if self.int.is_negative() {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        })
    }

    /// Alias for [`to_f64`](Self::to_f64).
    pub fn value(&self) -> f64 {
        self.to_f64()
    }

    /// Real value truncated toward zero.
    pub fn to_integer(&self) -> BigInt {
        trunc(&self.to_ratio())
    }

    /// True iff the stored integer is zero.
    pub fn is_zero(&self) -> bool {
        self.int.is_zero()
    }

    /// Stored integer as `ceil(wordlength / 4)` zero-padded hex digits,
    /// two's complement for negatives.
    pub fn hex(&self) -> String {
        let digits = self.wordlength.div_ceil(4) as usize;
        format!("{:0digits$x}", self.twos_complement())
    }

    /// Stored integer as `wordlength` zero-padded binary digits, two's
    /// complement for negatives.
    pub fn bin(&self) -> String {
        let digits = self.wordlength as usize;
        format!("{:0digits$b}", self.twos_complement())
    }

    fn twos_complement(&self) -> BigInt {
        if self.int.is_negative() {
            (BigInt::from(1) << self.wordlength) + &self.int
        } else {
            self.int.clone()
        }
    }

    fn scale(&self) -> BigInt {
        pow(self.base(), self.precision)
    }

    fn range(&self) -> StoredRange {
        StoredRange::new(self.wordlength, self.format.signed)
    }
}

fn out_of_range(
    value: BigRational,
    range: &StoredRange,
    scale: &BigInt,
    wordlength: u32,
    signed: bool,
) -> FixedPointError {
    FixedPointError::OutOfRange {
        value,
        lower: BigRational::new(range.min().clone(), scale.clone()),
        upper: BigRational::new(range.max().clone(), scale.clone()),
        wordlength,
        signed,
    }
}

/// Exact decimal rendering of the real value. Decimal formats always show
/// `precision` fractional digits.
impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self.format.family {
            Family::Decimal => format_scaled(&self.int, self.precision as usize),
            Family::Binary => exact_decimal(&self.to_ratio()),
        };
        f.pad(&text)
    }
}

impl fmt::Debug for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.format.name())
            .field("value", &format_args!("{self}"))
            .field("int", &self.int)
            .field("wordlength", &self.wordlength)
            .field("precision", &self.precision)
            .finish()
    }
}

/// `{:#x}` adds a `0x` prefix.
impl fmt::LowerHex for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        f.write_str(&self.hex())
    }
}

/// `{:#b}` adds a `0b` prefix.
impl fmt::Binary for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0b")?;
        }
        f.write_str(&self.bin())
    }
}
