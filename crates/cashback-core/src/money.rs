//! # Money Module
//!
//! Provides the `Money` type for monetary values and `UnroundedMoney` for
//! cashback accumulation before the single final rounding step.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    1200 × 0.05 = 60.00000000000001  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents × Integer Basis Points                     │
//! │    120000 cents × 500 bps = 60_000_000 (units of 1/10000 cent)          │
//! │    Rounded ONCE at the end → 6000 cents = 60.00                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cashback_core::money::Money;
//! use cashback_core::types::Percent;
//!
//! let subtotal = Money::from_cents(120_000); // 1200.00
//! let cashback = subtotal.percentage(Percent::from_bps(500)); // 5%
//! assert_eq!(cashback.cents(), 6_000); // 60.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::types::Percent;

/// Scale of `UnroundedMoney`: cents × basis points (1 bps = 1/10000).
const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Subtotals are non-negative in practice, but a
///   malformed input must still be representable so the resolver can
///   treat it as "below every threshold" instead of failing.
/// - **Two fractional digits**: every amount the engine returns is exact
///   to the cent.
///
/// ## Wire Form
/// Serializes as the bare integer number of cents, also in the TypeScript
/// bindings: `1250` is 12.50. The config file takes major units (`12.5`)
/// and converts on load.
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.line_total ──┬──► Σ subtotal ──► Tier lookup                  │
/// │                        │                                                │
/// │                        └──► × effective % ──► UnroundedMoney            │
/// │                                                   │                     │
/// │                                   round once ◄────┘                     │
/// │                                       │                                 │
/// │                                       ▼                                 │
/// │                                 Cashback (Money)                        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use cashback_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50.
    ///
    /// ## Example
    /// ```rust
    /// use cashback_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(1500, 0).cents(), 150_000);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Parses a decimal amount such as `"1500"`, `"12.5"` or `" 0.335 "`.
    ///
    /// Settings and order totals arrive as text from the settings store and
    /// the order source. Anything that is not a plain decimal number is
    /// treated as zero rather than rejected. Digits past the cent are
    /// rounded half-up.
    ///
    /// ## Example
    /// ```rust
    /// use cashback_core::money::Money;
    ///
    /// assert_eq!(Money::parse_lenient("1200.50").cents(), 120_050);
    /// assert_eq!(Money::parse_lenient("0.335").cents(), 34);
    /// assert_eq!(Money::parse_lenient("abc").cents(), 0);
    /// assert_eq!(Money::parse_lenient("").cents(), 0);
    /// ```
    pub fn parse_lenient(text: &str) -> Self {
        Money(parse_hundredths(text).unwrap_or(0))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the value, or zero if it is negative.
    #[inline]
    pub const fn non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Returns `self × pct`, rounded to the cent.
    ///
    /// ## Example
    /// ```rust
    /// use cashback_core::money::Money;
    /// use cashback_core::types::Percent;
    ///
    /// // 10.00 at 3.33% = 0.333 → 0.33
    /// let amount = Money::from_cents(1000);
    /// assert_eq!(amount.percentage(Percent::from_bps(333)).cents(), 33);
    /// ```
    pub fn percentage(&self, pct: Percent) -> Money {
        UnroundedMoney::of(*self, pct).round()
    }
}

// =============================================================================
// Unrounded Accumulator
// =============================================================================

/// A cashback amount that has not been rounded yet.
///
/// Stored as `cents × basis points`, i.e. in units of 1/10000 of a cent, so
/// `line_total × percentage` is always exact. Per-item amounts are summed in
/// this form and rounded to cents exactly once with [`UnroundedMoney::round`].
///
/// ```text
///   3 items × 3.33 at 10%        per-item rounding      single rounding
///   ───────────────────────      ─────────────────      ───────────────
///   0.333 + 0.333 + 0.333        0.33 × 3 = 0.99        0.999 → 1.00
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct UnroundedMoney(i128);

impl UnroundedMoney {
    /// Zero accumulator.
    #[inline]
    pub const fn zero() -> Self {
        UnroundedMoney(0)
    }

    /// Exact product of an amount and a percentage.
    #[inline]
    pub fn of(amount: Money, pct: Percent) -> Self {
        UnroundedMoney(amount.cents() as i128 * pct.bps() as i128)
    }

    /// Rounds to the nearest cent, halves away from zero.
    pub fn round(&self) -> Money {
        let half = BPS_SCALE / 2;
        let cents = if self.0 >= 0 {
            (self.0 + half) / BPS_SCALE
        } else {
            (self.0 - half) / BPS_SCALE
        };

        let cents = i64::try_from(cents).unwrap_or(if cents < 0 { i64::MIN } else { i64::MAX });
        Money::from_cents(cents)
    }
}

impl Add for UnroundedMoney {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        UnroundedMoney(self.0.saturating_add(other.0))
    }
}

impl AddAssign for UnroundedMoney {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sum for UnroundedMoney {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(UnroundedMoney::zero(), |acc, x| acc + x)
    }
}

// =============================================================================
// Lenient Decimal Parsing
// =============================================================================

/// Parses decimal text into hundredths (cents for Money, bps for Percent).
///
/// Returns `None` for anything that is not `[+-]digits[.digits]`, or on
/// overflow. The third fractional digit rounds the magnitude half-up.
pub(crate) fn parse_hundredths(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }

    let mut value: i64 = 0;
    for b in int_part.bytes() {
        value = value.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
    }

    let mut frac = frac_part.bytes().map(|b| i64::from(b - b'0'));
    let tenths = frac.next().unwrap_or(0);
    let hundredths = frac.next().unwrap_or(0);
    let round_up = frac.next().map_or(false, |d| d >= 5);

    value = value
        .checked_mul(100)?
        .checked_add(tenths * 10 + hundredths + i64::from(round_up))?;

    Some(if negative { -value } else { value })
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates at the i64 bounds: a subtotal too large to hold stays
// at the top of the range instead of wrapping negative.

/// Displays as a plain two-decimal amount (`1200.50`, `-5.50`).
///
/// Currency symbols are a presentation concern of the caller.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, x| acc + *x)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
