//! Net balancing of two opposite totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which of the two totals is larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceDirection {
    /// The first total exceeds the second.
    FirstExceeds,
    /// The second total exceeds the first.
    SecondExceeds,
}

/// The single transfer that nets two totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancingTransfer {
    pub direction: BalanceDirection,
    /// Always strictly positive.
    pub amount: Decimal,
}

/// Returns the transfer settling `first` against `second`, or `None` when
/// they are equal.
#[must_use]
pub fn net_balance(first: Decimal, second: Decimal) -> Option<BalancingTransfer> {
    match first.cmp(&second) {
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => Some(BalancingTransfer {
            direction: BalanceDirection::FirstExceeds,
            amount: first - second,
        }),
        std::cmp::Ordering::Less => Some(BalancingTransfer {
            direction: BalanceDirection::SecondExceeds,
            amount: second - first,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_equal_totals_need_no_transfer() {
        assert_eq!(net_balance(dec!(100.00), dec!(100)), None);
        assert_eq!(net_balance(Decimal::ZERO, Decimal::ZERO), None);
    }

    #[test]
    fn test_larger_first_total() {
        let transfer = net_balance(dec!(150), dec!(40.50)).unwrap();
        assert_eq!(transfer.direction, BalanceDirection::FirstExceeds);
        assert_eq!(transfer.amount, dec!(109.50));
    }

    #[test]
    fn test_larger_second_total() {
        let transfer = net_balance(dec!(0), dec!(12.34)).unwrap();
        assert_eq!(transfer.direction, BalanceDirection::SecondExceeds);
        assert_eq!(transfer.amount, dec!(12.34));
    }
}
