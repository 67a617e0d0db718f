//! Amount type for handling monetary values.
//!
//! On the wire an amount is a bare JSON number. On the command line it may be typed with a
//! dollar sign and thousands separators, so parsing strips both.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a monetary amount.
///
/// Wraps `Decimal`. Serializes to and from a JSON number, matching the backend's wire
/// format. `Display` renders the conventional `-$1,234.56` form for CLI output.
///
/// # Examples
///
/// ```
/// # use pocketbook::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-$1,250.00").unwrap();
/// assert_eq!(amount.to_string(), "-$1,250.00");
/// assert_eq!(serde_json::to_string(&amount).unwrap(), "-1250.0");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative()
    }
}

/// An error that can occur when parsing a string into an `Amount`.
#[derive(Debug, thiserror::Error)]
#[error("invalid amount: {0}")]
pub struct AmountError(rust_decimal::Error);

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // Accept "-$50.00", "$50.00" and plain "-50.00" forms.
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            if let Some(after_dollar) = after_minus.strip_prefix('$') {
                format!("-{after_dollar}")
            } else {
                trimmed.to_string()
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        // Thousands separators
        let without_commas = without_dollar.replace(',', "");

        let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            ("-", self.0.abs())
        } else {
            ("", self.0)
        };
        write!(
            f,
            "{sign}${}",
            format_num::format_num!(",.2", num.to_f64().unwrap_or_default())
        )
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_dollar_sign() {
        let amount = Amount::from_str("$50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_negative_with_dollar_sign() {
        let amount = Amount::from_str("-$50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-50.00").unwrap());
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("-50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-50.00").unwrap());
    }

    #[test]
    fn test_parse_with_commas() {
        let amount = Amount::from_str("-$60,000.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-60000.00").unwrap());
    }

    #[test]
    fn test_parse_empty_string_is_zero() {
        let amount = Amount::from_str("").unwrap();
        assert!(amount.is_zero());
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(Amount::from_str("fifty bucks").is_err());
    }

    #[test]
    fn test_display() {
        let amount = Amount::from_str("1234.5").unwrap();
        assert_eq!(amount.to_string(), "$1,234.50");
        let amount = Amount::from_str("-1234.5").unwrap();
        assert_eq!(amount.to_string(), "-$1,234.50");
    }

    #[test]
    fn test_serialize_as_number() {
        let amount = Amount::from_str("4.5").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "4.5");
    }

    #[test]
    fn test_deserialize_from_number() {
        let amount: Amount = serde_json::from_str("-87.43").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-87.43").unwrap());
    }

    #[test]
    fn test_deserialize_integer() {
        let amount: Amount = serde_json::from_str("100").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("100").unwrap());
    }

    #[test]
    fn test_zero_is_not_positive_or_negative() {
        let zero = Amount::from_str("0").unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
    }
}
