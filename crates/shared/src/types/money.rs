//! Amounts and currencies.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal`, rounded with banker's rounding.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of decimal places carried by both eusko and euro.
pub const CURRENCY_PRECISION: u32 = 2;

/// Currencies handled by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// The local currency.
    Eusko,
    /// Euro.
    Euro,
}

impl Currency {
    /// Returns the string representation of the currency.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eusko => "eusko",
            Self::Euro => "euro",
        }
    }

    /// Number of decimal places for amounts in this currency.
    #[must_use]
    pub const fn precision(&self) -> u32 {
        CURRENCY_PRECISION
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "eusko" => Ok(Self::Eusko),
            "euro" | "eur" => Ok(Self::Euro),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

/// Errors raised while validating an operator-supplied amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The value is not a decimal number.
    #[error("'{0}' is not a valid amount")]
    Unparsable(String),
    /// The value is below zero.
    #[error("amount {0} is negative")]
    Negative(Decimal),
    /// The value has more decimal places than the currency allows.
    #[error("amount {0} has more than {CURRENCY_PRECISION} decimal places")]
    TooPrecise(Decimal),
}

/// A validated, non-negative amount with at most two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Validates a decimal value.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative(value));
        }
        if value.normalize().scale() > CURRENCY_PRECISION {
            return Err(AmountError::TooPrecise(value));
        }
        Ok(Self(value))
    }

    /// Parses and validates an operator-supplied amount.
    ///
    /// Accepts a comma as decimal separator.
    pub fn parse(raw: &str) -> Result<Self, AmountError> {
        let trimmed = raw.trim().replace(',', ".");
        let value =
            Decimal::from_str(&trimmed).map_err(|_| AmountError::Unparsable(raw.to_string()))?;
        Self::new(value)
    }

    /// Returns the inner decimal.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", round(self.0, CURRENCY_PRECISION))
    }
}

/// An amount as typed by an operator, before validation.
///
/// Request bodies accept either a JSON string or a JSON number, so a value
/// such as `"12,5"` or `"abc"` reaches the handler and fails with a
/// validation error instead of a body rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// Raw text, comma accepted as decimal separator.
    Text(String),
    /// A JSON number.
    Number(Decimal),
}

impl AmountInput {
    /// Parses and validates the input.
    pub fn parse(&self) -> Result<Amount, AmountError> {
        match self {
            Self::Text(raw) => Amount::parse(raw),
            Self::Number(value) => Amount::new(*value),
        }
    }
}

impl Default for AmountInput {
    fn default() -> Self {
        Self::Number(Decimal::ZERO)
    }
}

impl From<Decimal> for AmountInput {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AmountInput {
    fn from(raw: &str) -> Self {
        Self::Text(raw.to_string())
    }
}

/// Rounds using banker's rounding (round half to even).
#[must_use]
pub fn round(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("100", dec!(100))]
    #[case("100.50", dec!(100.50))]
    #[case(" 12,5 ", dec!(12.5))]
    #[case("0", dec!(0))]
    #[case("0.01", dec!(0.01))]
    fn test_amount_parse_valid(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(Amount::parse(raw).unwrap().value(), expected);
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("1.2.3")]
    fn test_amount_parse_unparsable(#[case] raw: &str) {
        assert!(matches!(Amount::parse(raw), Err(AmountError::Unparsable(_))));
    }

    #[test]
    fn test_amount_rejects_negative() {
        assert_eq!(
            Amount::parse("-5"),
            Err(AmountError::Negative(dec!(-5)))
        );
    }

    #[test]
    fn test_amount_rejects_sub_cent() {
        assert!(matches!(
            Amount::parse("1.001"),
            Err(AmountError::TooPrecise(_))
        ));
        // Trailing zeros do not count as precision.
        assert!(Amount::parse("1.1000").is_ok());
    }

    #[test]
    fn test_amount_display_has_two_decimals() {
        assert_eq!(Amount::parse("7.5").unwrap().to_string(), "7.50");
    }

    #[test]
    fn test_round_is_bankers() {
        assert_eq!(round(dec!(2.345), 2), dec!(2.34));
        assert_eq!(round(dec!(2.355), 2), dec!(2.36));
    }

    #[rstest]
    #[case(serde_json::json!("12,5"), dec!(12.5))]
    #[case(serde_json::json!("40"), dec!(40))]
    #[case(serde_json::json!(7.25), dec!(7.25))]
    #[case(serde_json::json!(3), dec!(3))]
    fn test_amount_input_accepts_text_and_numbers(
        #[case] raw: serde_json::Value,
        #[case] expected: Decimal,
    ) {
        let input: AmountInput = serde_json::from_value(raw).unwrap();
        assert_eq!(input.parse().unwrap().value(), expected);
    }

    #[test]
    fn test_amount_input_defers_rejection_to_parse() {
        let input: AmountInput = serde_json::from_value(serde_json::json!("abc")).unwrap();
        assert_eq!(input, AmountInput::Text("abc".to_string()));
        assert!(matches!(input.parse(), Err(AmountError::Unparsable(_))));
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("EUSKO").unwrap(), Currency::Eusko);
        assert_eq!(Currency::from_str("eur").unwrap(), Currency::Euro);
        assert!(Currency::from_str("usd").is_err());
    }
}
