//! Price representation using decimal arithmetic.
//!
//! Listing prices travel as display text (`"$45 CAD"`). [`parse_amount`]
//! recovers the numeric amount from such text by keeping only digits and
//! dots, and [`format_amount`] renders totals with two decimals.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// A price in Canadian dollars, the marketplace currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price {
    pub amount: Decimal,
}

impl Price {
    #[must_use]
    pub const fn cad(amount: Decimal) -> Self {
        Self { amount }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${} CAD", self.amount.normalize())
    }
}

/// Extract the numeric amount from price text such as `"$45 CAD"`.
///
/// Every character other than ASCII digits and `.` is dropped, then the
/// longest leading decimal number is read (`"12.5.3"` reads as `12.5`).
/// Returns `None` when no number remains.
#[must_use]
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut parts = cleaned.split('.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized = if fraction.is_empty() {
        whole.to_owned()
    } else {
        format!("{whole}.{fraction}")
    };

    Decimal::from_str(&normalized).ok()
}

/// Render an amount with exactly two decimals (`25` becomes `"25.00"`).
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_from_display_text() {
        assert_eq!(parse_amount("$45 CAD"), Some(Decimal::from(45)));
        assert_eq!(parse_amount("$19.99"), Some(Decimal::new(1999, 2)));
        assert_eq!(parse_amount("1,200"), Some(Decimal::from(1200)));
    }

    #[test]
    fn test_parse_amount_stops_at_second_dot() {
        assert_eq!(parse_amount("12.5.3"), Some(Decimal::new(125, 1)));
        assert_eq!(parse_amount(".5"), Some(Decimal::new(5, 1)));
    }

    #[test]
    fn test_parse_amount_without_number() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("free"), None);
        assert_eq!(parse_amount("."), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::from(25)), "25.00");
        assert_eq!(format_amount(Decimal::new(1999, 2)), "19.99");
        assert_eq!(format_amount(Decimal::new(1005, 3)), "1.01");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::cad(Decimal::from(45)).to_string(), "$45 CAD");
        assert_eq!(Price::cad(Decimal::new(4550, 2)).to_string(), "$45.5 CAD");
    }
}
