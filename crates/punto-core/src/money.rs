//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (hundredths)                         │
//! │    "1000.00" from the service ──► Money(100000)                         │
//! │    Every sum and product is exact, rounding happens in ONE place:       │
//! │    Money::calculate_tax                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The back-office service sends prices and totals as decimal major units,
//! sometimes as strings (`"1000.00"`), sometimes as JSON numbers (`1000`).
//! `Money` accepts both and serializes back as a JSON number.
//!
//! ## Usage
//! ```rust
//! use punto_core::money::Money;
//!
//! let price = Money::from_major(1000);
//! let line = price.multiply_quantity(3);
//! assert_eq!(line, Money::from_major(3000));
//!
//! let parsed: Money = "1000.50".parse().unwrap();
//! assert_eq!(parsed.cents(), 100050);
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

/// Minor units in one major unit.
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in hundredths of the currency's major unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative values for corrections
/// - **Hundredths even for COP**: the service stores two decimals, display
///   decides how many of them to show (see [`CurrencyFormat`])
/// - **Bounded input**: parsing and deserializing reject anything beyond
///   [`Money::MAX`]; arithmetic saturates at the i64 range instead of panicking
///
/// ## Where Money is Used
/// ```text
/// Product.unit_price ──► LineTotals.subtotal ──► SaleTotals.subtotal
///                                 │
///                                 └──► calculate_tax ──► SaleTotals.tax_total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Largest magnitude accepted from text or the wire: 10^13 major units.
    pub const MAX: Money = Money(1_000_000_000_000_000);

    /// Creates a Money value from hundredths.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole major units.
    ///
    /// ```rust
    /// use punto_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(1000).cents(), 100000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Returns the value in hundredths.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole major units (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor part (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// `Some` when `cents` is within [`Money::MAX`] either side of zero.
    fn bounded(cents: i64) -> Option<Money> {
        (cents.unsigned_abs() <= Money::MAX.0.unsigned_abs()).then_some(Money(cents))
    }

    /// Calculates tax on this amount, rounded half away from zero to the
    /// nearest hundredth.
    ///
    /// ## Implementation
    /// Integer math in i128: `amount * bps / 10000`.
    ///
    /// ## Example
    /// ```rust
    /// use punto_core::money::Money;
    /// use punto_core::types::TaxRate;
    ///
    /// let base = Money::from_major(3000);
    /// let tax = base.calculate_tax(TaxRate::from_bps(1900)); // 19%
    /// assert_eq!(tax, Money::from_major(570));
    ///
    /// // 10.00 at 8.25% = 0.825 -> 0.83
    /// let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825));
    /// assert_eq!(tax.cents(), 83);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax = div_round_half_away(self.0 as i128 * rate.bps() as i128, 10_000);
        Money::from_cents(clamp_to_i64(tax))
    }

    /// Multiplies money by a quantity, saturating at the i64 range.
    ///
    /// ```rust
    /// use punto_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Rounds to a number of fraction digits (0, 1 or 2), half away from zero.
    ///
    /// Used for display only; arithmetic always keeps hundredths.
    pub fn round_to_digits(&self, digits: u8) -> Money {
        match digits {
            0 => Money(div_round_half_away(self.0 as i128, 100) as i64 * 100),
            1 => Money(div_round_half_away(self.0 as i128, 10) as i64 * 10),
            _ => *self,
        }
    }
}

fn clamp_to_i64(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

/// Integer division rounding half away from zero.
pub(crate) fn div_round_half_away(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

/// Parses a decimal string into an integer scaled by `10^scale`.
///
/// Digits beyond `scale` are rounded half away from zero. Accepts an optional
/// sign and surrounding whitespace; rejects empty input, exponents, and more
/// than one decimal point.
pub(crate) fn parse_scaled(input: &str, scale: u32) -> Option<i64> {
    let s = input.trim();
    let (negative, s) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let factor = 10i128.pow(scale);
    let mut value: i128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse::<i128>().ok()?.checked_mul(factor)?
    };

    let frac = frac_part.as_bytes();
    let mut place = factor / 10;
    for (i, digit) in frac.iter().enumerate() {
        let d = (digit - b'0') as i128;
        if (i as u32) < scale {
            value += d * place;
            place /= 10;
        } else {
            // First dropped digit decides rounding
            if d >= 5 {
                value += 1;
            }
            break;
        }
    }

    let value = if negative { -value } else { value };
    i64::try_from(value).ok()
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cents = parse_scaled(s, 2).ok_or_else(|| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' is not a decimal number", s.trim()),
        })?;
        Money::bounded(cents).ok_or_else(|| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' exceeds the largest amount ({})", s.trim(), Money::MAX),
        })
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal representation with two digits, e.g. `3570.00`.
///
/// Use [`CurrencyFormat`] for anything shown to a person.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Serde (decimal major units on the wire)
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MINOR_PER_MAJOR == 0 {
            serializer.serialize_i64(self.major())
        } else {
            // The service takes JSON numbers; hundredths fit f64 exactly
            // for any realistic amount.
            serializer.serialize_f64(self.0 as f64 / MINOR_PER_MAJOR as f64)
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cents =
            deserializer.deserialize_any(ScaledVisitor { scale: 2, what: "a decimal amount" })?;
        Money::bounded(cents).ok_or_else(|| {
            de::Error::custom(format!("amount out of range: {}", Money::from_cents(cents)))
        })
    }
}

/// Visitor shared by [`Money`] and [`TaxRate`]: decimal strings or numbers,
/// scaled to an integer.
pub(crate) struct ScaledVisitor {
    pub(crate) scale: u32,
    pub(crate) what: &'static str,
}

impl<'de> Visitor<'de> for ScaledVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} as a number or decimal string", self.what)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        v.checked_mul(10i64.pow(self.scale))
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(10i64.pow(self.scale)))
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        // Shortest round-trip representation, then exact decimal parsing
        self.visit_str(&v.to_string())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        parse_scaled(v, self.scale)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

// =============================================================================
// Currency Formatting
// =============================================================================

/// How money is shown to people.
///
/// The default mirrors Colombian peso formatting with no minimum fraction
/// digits: `$ 3.570`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormat {
    /// ISO 4217 code.
    pub code: String,
    /// Symbol printed before the amount.
    pub symbol: String,
    /// Thousands grouping separator.
    pub thousands_separator: char,
    /// Separator between whole and fraction digits.
    pub decimal_separator: char,
    /// Fraction digits shown (0-2).
    pub fraction_digits: u8,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            code: "COP".to_string(),
            symbol: "$".to_string(),
            thousands_separator: '.',
            decimal_separator: ',',
            fraction_digits: 0,
        }
    }
}

impl CurrencyFormat {
    /// Formats an amount for display.
    ///
    /// ```rust
    /// use punto_core::money::{CurrencyFormat, Money};
    ///
    /// let cop = CurrencyFormat::default();
    /// assert_eq!(cop.format(Money::from_major(3570)), "$ 3.570");
    /// ```
    pub fn format(&self, amount: Money) -> String {
        let digits = self.fraction_digits.min(2);
        let rounded = amount.round_to_digits(digits);
        let sign = if rounded.is_negative() { "-" } else { "" };

        let whole = group_thousands(rounded.major().unsigned_abs(), self.thousands_separator);
        let mut out = format!("{}{} {}", sign, self.symbol, whole);

        if digits > 0 {
            let minor = format!("{:02}", rounded.minor_part());
            out.push(self.decimal_separator);
            out.push_str(&minor[..digits as usize]);
        }
        out
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_and_parts() {
        let money = Money::from_major_minor(10, 99);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
        assert_eq!(negative.minor_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(357000).to_string(), "3570.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_major(10);
        let b = Money::from_major(5);
        assert_eq!(a + b, Money::from_major(15));
        assert_eq!(a - b, Money::from_major(5));
        assert_eq!(a * 3, Money::from_major(30));

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total, Money::from_major(20));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_cents(i64::MAX - 1);
        assert_eq!((huge + Money::from_cents(10)).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - Money::from_cents(1)).cents(), i64::MIN);
        assert_eq!(huge.multiply_quantity(9999).cents(), i64::MAX);
        assert_eq!((huge * -2).cents(), i64::MIN);

        let mut acc = huge;
        acc += huge;
        assert_eq!(acc.cents(), i64::MAX);

        let total: Money = [huge, huge, huge].into_iter().sum();
        assert_eq!(total.cents(), i64::MAX);
    }

    #[test]
    fn test_amounts_beyond_max_are_rejected() {
        assert_eq!("10000000000000".parse::<Money>().unwrap(), Money::MAX);
        assert_eq!("-10000000000000".parse::<Money>().unwrap().cents(), -Money::MAX.cents());
        assert!(matches!(
            "10000000000000.01".parse::<Money>(),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!("2000000000000000".parse::<Money>().is_err());

        assert!(serde_json::from_str::<Money>("\"2000000000000000\"").is_err());
        assert!(serde_json::from_str::<Money>("2000000000000000").is_err());
        assert!(serde_json::from_str::<Money>("-2e15").is_err());
        assert_eq!(serde_json::from_str::<Money>("10000000000000").unwrap(), Money::MAX);
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        // 10.00 at 8.25% = 0.825
        assert_eq!(Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825)).cents(), 83);
        // 0.10 at 5% = 0.005
        assert_eq!(Money::from_cents(10).calculate_tax(TaxRate::from_bps(500)).cents(), 1);
        // 0.10 at 4% = 0.004
        assert_eq!(Money::from_cents(10).calculate_tax(TaxRate::from_bps(400)).cents(), 0);
        // Negative amounts mirror positive ones
        assert_eq!(Money::from_cents(-1000).calculate_tax(TaxRate::from_bps(825)).cents(), -83);
    }

    #[test]
    fn test_tax_on_whole_amounts_is_exact() {
        let base = Money::from_major(1000);
        assert_eq!(base.calculate_tax(TaxRate::from_bps(1900)), Money::from_major(190));
        assert_eq!(base.calculate_tax(TaxRate::from_bps(500)), Money::from_major(50));
        assert_eq!(base.calculate_tax(TaxRate::zero()), Money::zero());
    }

    #[test]
    fn test_parse_decimal_strings() {
        assert_eq!("1000.00".parse::<Money>().unwrap().cents(), 100000);
        assert_eq!("1000".parse::<Money>().unwrap().cents(), 100000);
        assert_eq!(" 0.5 ".parse::<Money>().unwrap().cents(), 50);
        assert_eq!(".25".parse::<Money>().unwrap().cents(), 25);
        assert_eq!("12.345".parse::<Money>().unwrap().cents(), 1235);
        assert_eq!("12.344".parse::<Money>().unwrap().cents(), 1234);
        assert_eq!("-3.10".parse::<Money>().unwrap().cents(), -310);

        assert!("abc".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("1e5".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
    }

    #[test]
    fn test_deserialize_from_string_or_number() {
        let from_str: Money = serde_json::from_str("\"1000.00\"").unwrap();
        let from_int: Money = serde_json::from_str("1000").unwrap();
        let from_float: Money = serde_json::from_str("1000.5").unwrap();
        assert_eq!(from_str, Money::from_major(1000));
        assert_eq!(from_int, Money::from_major(1000));
        assert_eq!(from_float.cents(), 100050);

        assert!(serde_json::from_str::<Money>("\"ten\"").is_err());
        assert!(serde_json::from_str::<Money>("true").is_err());
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&Money::from_major(3570)).unwrap(), "3570");
        assert_eq!(serde_json::to_string(&Money::from_cents(100050)).unwrap(), "1000.5");
    }

    #[test]
    fn test_currency_format_cop() {
        let cop = CurrencyFormat::default();
        assert_eq!(cop.format(Money::from_major(3570)), "$ 3.570");
        assert_eq!(cop.format(Money::from_major(1_240)), "$ 1.240");
        assert_eq!(cop.format(Money::from_major(999)), "$ 999");
        assert_eq!(cop.format(Money::zero()), "$ 0");
        // Hidden fraction rounds for display only
        assert_eq!(cop.format(Money::from_cents(99950)), "$ 1.000");
        assert_eq!(cop.format(Money::from_major(-1500)), "-$ 1.500");
    }

    #[test]
    fn test_currency_format_with_fraction_digits() {
        let fmt = CurrencyFormat {
            fraction_digits: 2,
            ..CurrencyFormat::default()
        };
        assert_eq!(fmt.format(Money::from_cents(123456750)), "$ 1.234.567,50");

        let one_digit = CurrencyFormat {
            fraction_digits: 1,
            ..CurrencyFormat::default()
        };
        assert_eq!(one_digit.format(Money::from_cents(1255)), "$ 12,6");
    }
}
