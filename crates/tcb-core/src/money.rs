//! # Money Module
//!
//! Provides the `Money` type for Colombian peso amounts.
//!
//! ## Why Integer Centavos?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    15050 × 0.19 = 2859.4999999999995  ❌ WRONG!                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    1505000 centavos × 1900 bps / 10000 = 285950 centavos                │
//! │    = $ 2.859,50 exactly                                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Menu prices are whole pesos, so 19% IVA is always an exact centavo
//! amount and the order invariants hold bit-for-bit.
//!
//! ## Wire Format
//! Persisted records store amounts as plain JSON numbers of pesos
//! (`38700`, or `2859.5` when centavos are present), the shape the browser
//! shell already reads.
//!
//! ## Usage
//! ```rust
//! use tcb_core::money::Money;
//!
//! let price = Money::from_pesos(15_000);
//! let line = price * 2;
//! assert_eq!(line.to_string(), "$ 30.000");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::TaxRate;

const CENTAVOS_PER_PESO: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A peso amount held as integer centavos.
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► CartLine.price ──► line_total ──► Σ subtotal
///                                                        │
///                              IVA 19% ◄─────────────────┤
///                              delivery fee ◄────────────┤
///                                                        ▼
///                       Sale.total == Invoice.total == Notification.total
/// ```
///
/// Arithmetic saturates at the `i64` bounds. Amounts coming from input or
/// storage are capped at [`Money::MAX`], so order totals stay far below them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Largest amount accepted from a form or a stored record: ten billion pesos.
    pub const MAX: Money = Money(10_000_000_000 * CENTAVOS_PER_PESO);

    /// Creates a Money value from whole pesos.
    ///
    /// ```rust
    /// use tcb_core::money::Money;
    ///
    /// assert_eq!(Money::from_pesos(3000).centavos(), 300_000);
    /// ```
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos.saturating_mul(CENTAVOS_PER_PESO))
    }

    /// Creates a Money value from centavos (the smallest unit).
    #[inline]
    pub const fn from_centavos(centavos: i64) -> Self {
        Money(centavos)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn centavos(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso portion (truncated toward zero).
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0 / CENTAVOS_PER_PESO
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn centavos_part(&self) -> i64 {
        (self.0 % CENTAVOS_PER_PESO).abs()
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

    /// Checks that the magnitude does not exceed [`Money::MAX`].
    #[inline]
    pub const fn in_range(&self) -> bool {
        self.0.unsigned_abs() <= Money::MAX.0 as u64
    }

    /// Calculates tax at the given rate.
    ///
    /// ## Implementation
    /// Integer math in centavos: `(amount × bps + 5000) / 10000`.
    /// The +5000 rounds half-up; for whole-peso amounts at 19% there is
    /// never anything to round.
    ///
    /// ```rust
    /// use tcb_core::money::Money;
    /// use tcb_core::types::TaxRate;
    ///
    /// let tax = Money::from_pesos(30_000).calculate_tax(TaxRate::from_bps(1900));
    /// assert_eq!(tax, Money::from_pesos(5_700));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large subtotals from overflowing the intermediate product
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_centavos(tax.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Converts to a peso number for display arithmetic in the shell.
    pub fn as_pesos_f64(&self) -> f64 {
        self.0 as f64 / CENTAVOS_PER_PESO as f64
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Colombian peso text, `es-CO` style: `$ 38.700`, `$ 2.859,50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.pesos().unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}$ {}", sign, grouped)?;
        if self.centavos_part() != 0 {
            write!(f, ",{:02}", self.centavos_part())?;
        }
        Ok(())
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
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.centavos_part() == 0 {
            serializer.serialize_i64(self.pesos())
        } else {
            serializer.serialize_f64(self.as_pesos_f64())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PesosVisitor)
    }
}

struct PesosVisitor;

impl<'de> Visitor<'de> for PesosVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a peso amount as a number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(CENTAVOS_PER_PESO)
            .map(Money::from_centavos)
            .filter(Money::in_range)
            .ok_or_else(|| E::custom("peso amount out of range"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        let pesos = i64::try_from(v).map_err(|_| E::custom("peso amount out of range"))?;
        self.visit_i64(pesos)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom("peso amount must be finite"));
        }
        let centavos = (v * CENTAVOS_PER_PESO as f64).round();
        if centavos.abs() > Money::MAX.0 as f64 {
            return Err(E::custom("peso amount out of range"));
        }
        Ok(Money::from_centavos(centavos as i64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        let parsed: f64 = v
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("invalid peso amount: {v}")))?;
        self.visit_f64(parsed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pesos() {
        let money = Money::from_pesos(15_000);
        assert_eq!(money.centavos(), 1_500_000);
        assert_eq!(money.pesos(), 15_000);
        assert_eq!(money.centavos_part(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_pesos(38_700).to_string(), "$ 38.700");
        assert_eq!(Money::from_pesos(1_250_000).to_string(), "$ 1.250.000");
        assert_eq!(Money::from_pesos(900).to_string(), "$ 900");
        assert_eq!(Money::from_centavos(285_950).to_string(), "$ 2.859,50");
        assert_eq!(Money::from_pesos(-5_000).to_string(), "-$ 5.000");
        assert_eq!(Money::zero().to_string(), "$ 0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_pesos(1000);
        let b = Money::from_pesos(500);

        assert_eq!(a + b, Money::from_pesos(1500));
        assert_eq!(a - b, Money::from_pesos(500));
        assert_eq!(a * 3, Money::from_pesos(3000));

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total, Money::from_pesos(2000));
    }

    #[test]
    fn test_iva_is_exact_for_whole_pesos() {
        let rate = TaxRate::from_bps(1900);
        assert_eq!(
            Money::from_pesos(30_000).calculate_tax(rate),
            Money::from_pesos(5_700)
        );
        // 15050 × 0.19 = 2859.5, which floats get wrong
        assert_eq!(
            Money::from_pesos(15_050).calculate_tax(rate),
            Money::from_centavos(285_950)
        );
    }

    #[test]
    fn test_serializes_as_peso_number() {
        assert_eq!(serde_json::to_string(&Money::from_pesos(38_700)).unwrap(), "38700");
        assert_eq!(
            serde_json::to_string(&Money::from_centavos(285_950)).unwrap(),
            "2859.5"
        );
    }

    #[test]
    fn test_deserializes_integer_float_and_string() {
        let whole: Money = serde_json::from_str("5700").unwrap();
        assert_eq!(whole, Money::from_pesos(5_700));

        let fractional: Money = serde_json::from_str("2859.5").unwrap();
        assert_eq!(fractional, Money::from_centavos(285_950));

        let text: Money = serde_json::from_str("\"50000\"").unwrap();
        assert_eq!(text, Money::from_pesos(50_000));

        assert!(serde_json::from_str::<Money>("\"abc\"").is_err());
    }

    #[test]
    fn test_out_of_range_amounts_are_rejected() {
        assert!(serde_json::from_str::<Money>("100000000000000000").is_err());
        assert!(serde_json::from_str::<Money>("18446744073709551615").is_err());
        assert!(serde_json::from_str::<Money>("-100000000000000000").is_err());
        assert!(serde_json::from_str::<Money>("1e300").is_err());
        assert!(serde_json::from_str::<Money>("\"99999999999999\"").is_err());

        let max: Money = serde_json::from_str("10000000000").unwrap();
        assert_eq!(max, Money::MAX);
        assert!(max.in_range());
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_centavos(i64::MAX);
        assert_eq!(huge + Money::from_pesos(1), huge);
        assert_eq!(huge * 999, huge);
        assert_eq!(Money::from_pesos(i64::MAX), huge);
        assert_eq!(Money::from_centavos(i64::MIN) - Money::from_pesos(1), Money::from_centavos(i64::MIN));
        assert!(!huge.in_range());
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_pesos(1).is_positive());
        assert!(Money::from_pesos(-1).is_negative());
    }
}
