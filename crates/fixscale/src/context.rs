// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scope-local encoding contexts.
//!
//! Each scaling family (binary, decimal) has an immutable process-wide default
//! and, per thread, an attached [`Context`] consulted whenever a construction
//! call omits `wordlength`, `precision` or the overflow policy.
//!
//! Scope rules:
//! - The first lookup in a thread attaches a copy of the family default.
//! - Replacing or mutating the attached context affects only that thread.
//! - Threads started with [`spawn_inheriting`] begin with the parent's contexts
//!   as they were at spawn time; later changes on either side stay local.
//! - The defaults are `'static` values that are only ever copied.

use core::cell::RefCell;
use core::fmt;
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::FixedPointError;
use crate::overflow::Overflow;

/// Scaling family: determines the base of `base^precision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Base-2 scaling.
    Binary,
    /// Base-10 scaling.
    Decimal,
}

impl Family {
    /// Both families, binary first.
    pub const ALL: [Family; 2] = [Family::Binary, Family::Decimal];

    /// Scaling base (2 or 10).
    pub const fn base(self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Decimal => 10,
        }
    }

    /// Immutable process-wide default context for this family.
    pub fn default_context(self) -> &'static Context {
        match self {
            Self::Binary => &DEFAULT_BINARY_CONTEXT,
            Self::Decimal => &DEFAULT_DECIMAL_CONTEXT,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Binary => "binary",
            Self::Decimal => "decimal",
        })
    }
}

impl core::str::FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" | "bin" | "2" => Ok(Self::Binary),
            "decimal" | "dec" | "10" => Ok(Self::Decimal),
            other => Err(format!("unknown scaling family '{other}'")),
        }
    }
}

/// Default binary context: 32-bit words, 16 fractional bits, saturating.
pub static DEFAULT_BINARY_CONTEXT: Context = Context {
    family: Family::Binary,
    wordlength: 32,
    precision: 16,
    overflow: Overflow::Saturate,
};

/// Default decimal context: 256-bit words, 18 fractional digits, saturating.
pub static DEFAULT_DECIMAL_CONTEXT: Context = Context {
    family: Family::Decimal,
    wordlength: 256,
    precision: 18,
    overflow: Overflow::Saturate,
};

/// Encoding defaults for one family.
///
/// `Context` is `Copy`; copying is the `copy()` operation and never aliases.
/// The family (and therefore the base) is fixed at creation. Wordlength is
/// always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Context {
    family: Family,
    wordlength: u32,
    precision: u32,
    overflow: Overflow,
}

impl Context {
    /// Fresh copy of the family default.
    pub fn new(family: Family) -> Self {
        *family.default_context()
    }

    /// Scaling family.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Scaling base (2 or 10).
    pub fn base(&self) -> u32 {
        self.family.base()
    }

    /// Default wordlength in bits.
    pub fn wordlength(&self) -> u32 {
        self.wordlength
    }

    /// Default number of fractional digits in the family's base.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Default overflow policy.
    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    /// Sets the wordlength; zero is rejected and leaves `self` unchanged.
    pub fn set_wordlength(&mut self, wordlength: u32) -> Result<(), FixedPointError> {
        self.wordlength = validate_wordlength(wordlength)?;
        Ok(())
    }

    /// Sets the precision.
    pub fn set_precision(&mut self, precision: u32) {
        self.precision = precision;
    }

    /// Sets the overflow policy.
    pub fn set_overflow(&mut self, overflow: Overflow) {
        self.overflow = overflow;
    }

    /// Copy with a different wordlength.
    pub fn with_wordlength(mut self, wordlength: u32) -> Result<Self, FixedPointError> {
        self.set_wordlength(wordlength)?;
        Ok(self)
    }

    /// Copy with a different precision.
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Copy with a different overflow policy.
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.family {
            Family::Binary => "BinaryContext",
            Family::Decimal => "DecimalContext",
        };
        write!(
            f,
            "{name}(wordlength={}, precision={}, overflow={})",
            self.wordlength, self.precision, self.overflow
        )
    }
}

pub(crate) fn validate_wordlength(wordlength: u32) -> Result<u32, FixedPointError> {
    if wordlength == 0 {
        return Err(FixedPointError::InvalidWordlength(wordlength));
    }
    Ok(wordlength)
}

#[derive(Debug, Clone, Copy, Default)]
struct ScopeContexts {
    binary: Option<Context>,
    decimal: Option<Context>,
}

impl ScopeContexts {
    const EMPTY: Self = Self {
        binary: None,
        decimal: None,
    };

    fn slot(&mut self, family: Family) -> &mut Option<Context> {
        match family {
            Family::Binary => &mut self.binary,
            Family::Decimal => &mut self.decimal,
        }
    }
}

thread_local! {
    static SCOPE: RefCell<ScopeContexts> = const { RefCell::new(ScopeContexts::EMPTY) };
}

/// Returns the calling thread's context for `family`.
///
/// Attaches a copy of the family default on first use. Never fails.
pub fn current_context(family: Family) -> Context {
    SCOPE.with_borrow_mut(|scope| {
        *scope.slot(family).get_or_insert_with(|| {
            trace!(%family, "attaching default context to scope");
            Context::new(family)
        })
    })
}

/// Replaces the calling thread's context for `ctx.family()`.
///
/// The scope keeps its own copy; later changes to the caller's value (or to
/// whatever it was copied from) are not observed.
pub fn set_current_context(ctx: Context) {
    trace!(context = %ctx, "replacing scope context");
    SCOPE.with_borrow_mut(|scope| *scope.slot(ctx.family) = Some(ctx));
}

/// Mutates the calling thread's context for `family` in place.
///
/// The closure runs on a copy that is written back afterwards, so it may
/// itself construct values or read contexts.
pub fn update_current_context<R>(family: Family, f: impl FnOnce(&mut Context) -> R) -> R {
    let mut ctx = current_context(family);
    let out = f(&mut ctx);
    set_current_context(ctx);
    out
}

/// Runs `f` with `ctx` attached, then restores the previous attachment.
///
/// Restoration also happens when `f` unwinds.
pub fn local_context<R>(ctx: Context, f: impl FnOnce() -> R) -> R {
    let family = ctx.family;
    let previous = SCOPE.with_borrow_mut(|scope| scope.slot(family).replace(ctx));
    let _restore = Restore { family, previous };
    f()
}

struct Restore {
    family: Family,
    previous: Option<Context>,
}

impl Drop for Restore {
    fn drop(&mut self) {
        let previous = self.previous.take();
        trace!(family = %self.family, "restoring scope context");
        // Ignore TLS teardown: the scope is going away anyway.
        let _ = SCOPE.try_with(|scope| *scope.borrow_mut().slot(self.family) = previous);
    }
}

/// Both families' contexts as attached to a thread at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextSnapshot {
    binary: Option<Context>,
    decimal: Option<Context>,
}

impl ContextSnapshot {
    /// Records the calling thread's contexts.
    pub fn capture() -> Self {
        let scope = SCOPE.with_borrow(|scope| *scope);
        Self {
            binary: scope.binary,
            decimal: scope.decimal,
        }
    }

    /// Context recorded for `family`, or the family default when the thread
    /// had not attached one yet.
    pub fn get(&self, family: Family) -> Context {
        let recorded = match family {
            Family::Binary => self.binary,
            Family::Decimal => self.decimal,
        };
        recorded.unwrap_or_else(|| Context::new(family))
    }

    /// Installs the recorded contexts into the calling thread.
    pub fn attach(self) {
        SCOPE.with_borrow_mut(|scope| {
            scope.binary = self.binary;
            scope.decimal = self.decimal;
        });
    }
}

/// Spawns a thread whose contexts start as copies of the caller's.
pub fn spawn_inheriting<F, T>(f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let snapshot = ContextSnapshot::capture();
    thread::spawn(move || {
        snapshot.attach();
        f()
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]
    use super::*;

    #[test]
    fn defaults_match_family_constants() {
        let b = Context::new(Family::Binary);
        assert_eq!((b.wordlength(), b.precision(), b.base()), (32, 16, 2));
        assert_eq!(b.overflow(), Overflow::Saturate);

        let d = Context::new(Family::Decimal);
        assert_eq!((d.wordlength(), d.precision(), d.base()), (256, 18, 10));
        assert_eq!(d.overflow(), Overflow::Saturate);
    }

    #[test]
    fn zero_wordlength_is_rejected() {
        let mut ctx = Context::new(Family::Binary);
        assert_eq!(
            ctx.set_wordlength(0),
            Err(FixedPointError::InvalidWordlength(0))
        );
        assert_eq!(ctx.wordlength(), 32);
        assert!(Context::new(Family::Decimal).with_wordlength(0).is_err());
    }

    #[test]
    fn copies_do_not_alias() {
        let original = Context::new(Family::Decimal);
        let mut copy = original;
        copy.set_precision(2);
        assert_eq!(original.precision(), 18);
        assert_eq!(copy.precision(), 2);
    }

    #[test]
    fn local_context_restores_previous() {
        set_current_context(Context::new(Family::Binary).with_precision(4));
        let inner = local_context(Context::new(Family::Binary).with_precision(9), || {
            current_context(Family::Binary).precision()
        });
        assert_eq!(inner, 9);
        assert_eq!(current_context(Family::Binary).precision(), 4);
    }

    #[test]
    fn display_names_the_family() {
        assert_eq!(
            Context::new(Family::Binary).to_string(),
            "BinaryContext(wordlength=32, precision=16, overflow=saturate)"
        );
        assert_eq!(
            Context::new(Family::Decimal).to_string(),
            "DecimalContext(wordlength=256, precision=18, overflow=saturate)"
        );
    }
}
