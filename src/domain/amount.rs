//! Payment amount type
//!
//! Domain primitive for money registered against an installment.
//! All amounts are validated at construction time, ensuring invalid values
//! cannot enter the payment history.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum allowed single payment (1 billion BRL)
const MAX_AMOUNT: &str = "1000000000";

/// Maximum decimal places. Centavos plus headroom, so balances carried over
/// from the float-based data can still be settled exactly.
const MAX_SCALE: u32 = 4;

/// Settlement tolerance carried over from the original float-based engine.
///
/// Amounts are decimal now, so exact comparison would work for values the
/// application itself produced, but imported data may carry sub-centavo
/// residue. An installment whose remaining balance is within this tolerance
/// counts as fully paid.
pub const SETTLEMENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// True when `paid` settles a debt of `value` within [`SETTLEMENT_TOLERANCE`].
pub fn is_settled(value: Decimal, paid: Decimal) -> bool {
    value - paid <= SETTLEMENT_TOLERANCE
}

/// PaymentAmount represents a validated sum of money being registered.
///
/// # Invariants
/// - Value is always positive (> 0)
/// - Maximum 4 decimal places
/// - Maximum value is 1 billion
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use jurisfinance::domain::PaymentAmount;
///
/// let amount = PaymentAmount::new(Decimal::new(100, 0)).unwrap();
/// assert_eq!(amount.value(), Decimal::new(100, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct PaymentAmount(Decimal);

/// Errors that can occur when creating a PaymentAmount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be positive (got {0})")]
    NotPositive(Decimal),

    #[error("Amount has too many decimal places (max {MAX_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Amount exceeds maximum allowed value ({MAX_AMOUNT})")]
    Overflow,

    #[error("Invalid amount format: {0}")]
    ParseError(String),
}

impl PaymentAmount {
    /// Create a new PaymentAmount with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    /// - `AmountError::TooManyDecimals` if more than 4 decimal places
    /// - `AmountError::Overflow` if value > 1 billion
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }

        if value.scale() > MAX_SCALE {
            return Err(AmountError::TooManyDecimals(value.scale()));
        }

        let max = Decimal::from_str(MAX_AMOUNT).expect("Invalid MAX_AMOUNT constant");
        if value > max {
            return Err(AmountError::Overflow);
        }

        Ok(Self(value))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for PaymentAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for PaymentAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s).map_err(|e| AmountError::ParseError(e.to_string()))?;
        PaymentAmount::new(decimal)
    }
}

impl TryFrom<Decimal> for PaymentAmount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        PaymentAmount::new(value)
    }
}

impl From<PaymentAmount> for Decimal {
    fn from(amount: PaymentAmount) -> Self {
        amount.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_positive() {
        let amount = PaymentAmount::new(dec!(100));
        assert!(amount.is_ok());
        assert_eq!(amount.unwrap().value(), dec!(100));
    }

    #[test]
    fn test_amount_zero_rejected() {
        let amount = PaymentAmount::new(Decimal::ZERO);
        assert!(matches!(amount, Err(AmountError::NotPositive(_))));
    }

    #[test]
    fn test_amount_negative_rejected() {
        let amount = PaymentAmount::new(dec!(-100));
        assert!(matches!(amount, Err(AmountError::NotPositive(_))));
    }

    #[test]
    fn test_amount_too_many_decimals() {
        let amount = PaymentAmount::new(dec!(0.12345));
        assert!(matches!(amount, Err(AmountError::TooManyDecimals(5))));
    }

    #[test]
    fn test_amount_max_decimals_ok() {
        let amount = PaymentAmount::new(dec!(0.1234));
        assert!(amount.is_ok());
    }

    #[test]
    fn test_amount_overflow() {
        let amount = PaymentAmount::new(dec!(1000000001));
        assert!(matches!(amount, Err(AmountError::Overflow)));
    }

    #[test]
    fn test_amount_from_str() {
        let amount: Result<PaymentAmount, _> = "123.45".parse();
        assert!(amount.is_ok());
        assert_eq!(amount.unwrap().value(), dec!(123.45));
    }

    #[test]
    fn test_amount_from_str_garbage() {
        let amount: Result<PaymentAmount, _> = "abc".parse();
        assert!(matches!(amount, Err(AmountError::ParseError(_))));
    }

    #[test]
    fn test_settlement_tolerance_value() {
        assert_eq!(SETTLEMENT_TOLERANCE, dec!(0.001));
    }

    #[test]
    fn test_is_settled_exact() {
        assert!(is_settled(dec!(100), dec!(100)));
    }

    #[test]
    fn test_is_settled_within_tolerance() {
        assert!(is_settled(dec!(100), dec!(99.9995)));
    }

    #[test]
    fn test_is_settled_outside_tolerance() {
        assert!(!is_settled(dec!(100), dec!(99.99)));
    }
}
