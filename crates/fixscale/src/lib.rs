// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! fixscale: fixed-point numbers with binary or decimal scaling.
//!
//! A value is a two's-complement stored integer plus a format: wordlength,
//! precision (fractional digits in the scaling base), base (2 or 10) and
//! signedness. Its real value is `int / base^precision`, and every exact view
//! (bounds, lsb, [`FixedPoint::as_exact_ratio`]) is computed with big integers,
//! so 256-bit decimal words stay exact.
//!
//! Omitted construction arguments come from the calling thread's
//! [`Context`] for the value's [`Family`]; see [`current_context`],
//! [`set_current_context`], [`local_context`] and [`spawn_inheriting`].
//!
//! ```
//! use fixscale::{SignedDecimal, UnsignedDecimal};
//!
//! let price = UnsignedDecimal::new(5.12345, None, Some(2))?;
//! assert_eq!(price.int(), &512.into());
//! assert_eq!(price.to_string(), "5.12");
//!
//! let small = SignedDecimal::new(-2, Some(16), Some(0))?;
//! assert_eq!(small.hex(), "fffe");
//! # Ok::<(), fixscale::FixedPointError>(())
//! ```
//!
//! Arithmetic between fixed-point values (`+`, `-`, `*`) is not provided.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

/// Context profiles and their storage port.
pub mod config;
mod context;
mod error;
mod exact;
mod numeric;
mod overflow;
mod value;
mod variants;

/// Scope-local contexts and their process-wide defaults.
pub use context::{
    current_context, local_context, set_current_context, spawn_inheriting,
    update_current_context, Context, ContextSnapshot, Family, DEFAULT_BINARY_CONTEXT,
    DEFAULT_DECIMAL_CONTEXT,
};
/// Construction and configuration failures.
pub use error::FixedPointError;
/// Numeric input to construction.
pub use numeric::{Numeric, MAX_LITERAL_SCALE};
/// Overflow handling.
pub use overflow::{Overflow, StoredRange};
/// The untyped value and its construction parameters.
pub use value::{FixedPoint, Format, Params};
/// The four concrete fixed-point types.
pub use variants::{SignedBinary, SignedDecimal, UnsignedBinary, UnsignedDecimal, WORD32};

pub use num_bigint::BigInt;
pub use num_rational::BigRational;
