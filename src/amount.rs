//! Monetary amounts with lenient parsing and grouped-digit display.
//!
//! Uses `rust_decimal` internally so sums like `0.1 + 0.2` stay exact.
//! Parsing never fails: anything that does not start with a number is zero.
//! Arithmetic never fails either: results beyond the representable range
//! clamp to `Decimal::MAX` or `Decimal::MIN`.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// A signed decimal amount as shown in the balance, fee and amount fields.
///
/// # Examples
///
/// ```
/// use balance_tracker::Amount;
///
/// let amount = Amount::parse_lenient("1,000,000");
/// assert_eq!(amount.to_string(), "1,000,000");
/// assert_eq!(Amount::parse_lenient("abc"), Amount::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Parses operator or clipboard text.
    ///
    /// Grouping commas and surrounding whitespace are ignored, and only the
    /// leading numeric part is read (`"12.5 VND"` is `12.5`). Text with no
    /// leading number, or a number too large to represent, yields zero.
    pub fn parse_lenient(text: &str) -> Self {
        let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
        match numeric_prefix(&cleaned) {
            Some(prefix) => Decimal::from_str(&prefix).map(Amount).unwrap_or(Self::ZERO),
            None => Self::ZERO,
        }
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Text for an input field: empty for zero, grouped digits otherwise.
    pub fn display_field(&self) -> String {
        if self.is_zero() {
            String::new()
        } else {
            self.to_string()
        }
    }
}

/// Extracts `[sign]digits[.digits]` from the start of `text`, rebuilt in a
/// form `Decimal::from_str` always accepts (`".5"` becomes `"0.5"`).
fn numeric_prefix(text: &str) -> Option<String> {
    let mut chars = text.chars().peekable();
    let mut sign = "";
    match chars.peek() {
        Some('-') => {
            sign = "-";
            chars.next();
        }
        Some('+') => {
            chars.next();
        }
        _ => {}
    }

    let mut integer = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        integer.push(c);
        chars.next();
    }

    let mut fraction = String::new();
    if chars.peek() == Some(&'.') {
        chars.next();
        while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
            fraction.push(c);
            chars.next();
        }
    }

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }
    if integer.is_empty() {
        integer.push('0');
    }

    Some(if fraction.is_empty() {
        format!("{}{}", sign, integer)
    } else {
        format!("{}{}.{}", sign, integer, fraction)
    })
}

/// Inserts `,` between every group of three digits, counting from the right.
fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let plain = self.0.normalize().to_string();
        let (sign, unsigned) = match plain.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", plain.as_str()),
        };
        match unsigned.split_once('.') {
            Some((integer, fraction)) => {
                write!(f, "{}{}.{}", sign, group_digits(integer), fraction)
            }
            None => write!(f, "{}{}", sign, group_digits(unsigned)),
        }
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Amount {
                fn from(value: $t) -> Self {
                    Amount(Decimal::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, u32, u64);

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.normalize().to_string())
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or numeric text")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Amount, E> {
        Ok(Amount::parse_lenient(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Amount, E> {
        Ok(Decimal::from_f64(v).map(Amount).unwrap_or(Amount::ZERO))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Amount, E> {
        Ok(Amount::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Amount, E> {
        Ok(Amount::ZERO)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grouped_text() {
        assert_eq!(Amount::parse_lenient("1,000,000"), Amount::from(1_000_000));
        assert_eq!(Amount::parse_lenient("  50,000  "), Amount::from(50_000));
        assert_eq!(Amount::parse_lenient("-2,500"), Amount::from(-2_500));
    }

    #[test]
    fn test_parse_unparsable_is_zero() {
        assert_eq!(Amount::parse_lenient(""), Amount::ZERO);
        assert_eq!(Amount::parse_lenient("abc"), Amount::ZERO);
        assert_eq!(Amount::parse_lenient("-"), Amount::ZERO);
        assert_eq!(Amount::parse_lenient("."), Amount::ZERO);
    }

    #[test]
    fn test_parse_reads_leading_number_only() {
        assert_eq!(Amount::parse_lenient("12.5 VND").to_string(), "12.5");
        assert_eq!(Amount::parse_lenient(".5").to_string(), "0.5");
        assert_eq!(Amount::parse_lenient("7.").to_string(), "7");
        assert_eq!(Amount::parse_lenient("+42x").to_string(), "42");
    }

    #[test]
    fn test_display_groups_integer_part_only() {
        assert_eq!(Amount::parse_lenient("1234567.891").to_string(), "1,234,567.891");
        assert_eq!(Amount::parse_lenient("999").to_string(), "999");
        assert_eq!(Amount::parse_lenient("1000").to_string(), "1,000");
        assert_eq!(Amount::parse_lenient("-1000000").to_string(), "-1,000,000");
        assert_eq!(Amount::parse_lenient("2.500").to_string(), "2.5");
        assert_eq!(Amount::ZERO.to_string(), "0");
    }

    #[test]
    fn test_display_field_hides_zero() {
        assert_eq!(Amount::ZERO.display_field(), "");
        assert_eq!(Amount::from(-3).display_field(), "-3");
        assert_eq!(Amount::from(12_000).display_field(), "12,000");
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let a = Amount::parse_lenient("0.1");
        let b = Amount::parse_lenient("0.2");
        assert_eq!((a + b).to_string(), "0.3");
        assert_eq!((b - a - b).to_string(), "-0.1");
    }

    #[test]
    fn test_arithmetic_clamps_at_decimal_limits() {
        let max = Amount::from(Decimal::MAX);
        let min = Amount::from(Decimal::MIN);

        assert_eq!(max + max, max);
        assert_eq!(min - Amount::from(1), min);
        assert_eq!(min - max, min);
        assert_eq!(
            (max + Amount::from(1)).to_string(),
            "79,228,162,514,264,337,593,543,950,335"
        );
    }

    #[test]
    fn test_deserialize_accepts_numbers_and_text() {
        let from_number: Amount = serde_json::from_str("1500").unwrap();
        let from_float: Amount = serde_json::from_str("2.25").unwrap();
        let from_text: Amount = serde_json::from_str("\"1,500\"").unwrap();
        let from_null: Amount = serde_json::from_str("null").unwrap();

        assert_eq!(from_number, Amount::from(1500));
        assert_eq!(from_float.to_string(), "2.25");
        assert_eq!(from_text, Amount::from(1500));
        assert_eq!(from_null, Amount::ZERO);
    }

    #[test]
    fn test_serialize_as_plain_decimal_text() {
        let json = serde_json::to_string(&Amount::parse_lenient("1,234.50")).unwrap();
        assert_eq!(json, "\"1234.5\"");
    }
}
