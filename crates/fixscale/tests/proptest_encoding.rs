// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
use fixscale::{BigInt, BigRational, Family, FixedPoint, Format, Numeric, Overflow, Params};
use num_traits::Signed;
use proptest::prelude::*;

fn format_strategy() -> impl Strategy<Value = Format> {
    (prop_oneof![Just(Family::Binary), Just(Family::Decimal)], any::<bool>())
        .prop_map(|(family, signed)| Format::new(family, signed))
}

fn params(wordlength: u32, precision: u32, overflow: Overflow) -> Params {
    Params::new()
        .wordlength(wordlength)
        .precision(precision)
        .overflow(overflow)
}

proptest! {
    #[test]
    fn zero_always_fits(format in format_strategy(), wordlength in 1_u32..=300, precision in 0_u32..=40) {
        let zero = FixedPoint::with_params(format, 0, params(wordlength, precision, Overflow::Reject))
            .expect("zero is representable");
        prop_assert!(zero.min_int() <= *zero.int());
        prop_assert!(*zero.int() <= zero.max_int());
        prop_assert!(zero.is_zero());
    }

    #[test]
    fn decode_is_within_half_an_lsb(
        format in format_strategy(),
        wordlength in 48_u32..=64,
        precision in 0_u32..=6,
        value in -1.0e3_f64..1.0e3,
    ) {
        let value = if format.signed() { value } else { value.abs() };
        let x = FixedPoint::with_params(format, value, params(wordlength, precision, Overflow::Reject))
            .expect("in range");
        let exact = Numeric::from(value).to_rational().expect("finite");
        let error = (x.to_ratio() - exact).abs();
        let half_lsb = x.lsb() / BigRational::from_integer(BigInt::from(2));
        prop_assert!(error <= half_lsb, "error {} > {}", error, half_lsb);
    }

    #[test]
    fn out_of_range_saturates_or_rejects(
        format in format_strategy(),
        wordlength in 1_u32..=40,
        precision in 0_u32..=4,
        excess in 1_u64..1_000_000,
        below in any::<bool>(),
    ) {
        let probe = FixedPoint::with_params(format, 0, params(wordlength, precision, Overflow::Reject))
            .expect("zero fits");
        let step = probe.lsb() * BigRational::from_integer(BigInt::from(excess));
        let value = if below { probe.lower_bound() - step } else { probe.upper_bound() + step };

        let saturated = FixedPoint::with_params(format, &value, params(wordlength, precision, Overflow::Saturate))
            .expect("saturate never fails");
        let expected = if below { probe.min_int() } else { probe.max_int() };
        prop_assert_eq!(saturated.int(), &expected);

        let rejected = FixedPoint::with_params(format, &value, params(wordlength, precision, Overflow::Reject));
        prop_assert!(rejected.map_err(|e| e.is_range_error()).err().unwrap_or(false));

        let wrapped = FixedPoint::with_params(format, &value, params(wordlength, precision, Overflow::Wrap))
            .expect("wrap never fails");
        prop_assert!(wrapped.min_int() <= *wrapped.int() && *wrapped.int() <= wrapped.max_int());
    }

    #[test]
    fn hex_and_bin_width_follow_wordlength(format in format_strategy(), wordlength in 1_u32..=128, raw in any::<i64>()) {
        let x = FixedPoint::with_params(format, raw, params(wordlength, 0, Overflow::Wrap))
            .expect("wrap never fails");
        prop_assert_eq!(x.bin().len(), wordlength as usize);
        prop_assert_eq!(x.hex().len(), wordlength.div_ceil(4) as usize);
    }
}
