//! Property tests for net balancing.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::reconciliation::balancing::{BalanceDirection, net_balance};

fn cents() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|c| Decimal::new(c, 2))
}

proptest! {
    #[test]
    fn prop_transfer_settles_the_difference(d in cents(), w in cents()) {
        match net_balance(d, w) {
            None => prop_assert_eq!(d, w),
            Some(transfer) => {
                prop_assert!(transfer.amount > Decimal::ZERO);
                match transfer.direction {
                    BalanceDirection::FirstExceeds => prop_assert_eq!(d - w, transfer.amount),
                    BalanceDirection::SecondExceeds => prop_assert_eq!(w - d, transfer.amount),
                }
            }
        }
    }

    #[test]
    fn prop_swapping_inputs_flips_direction(d in cents(), w in cents()) {
        let forward = net_balance(d, w);
        let backward = net_balance(w, d);
        prop_assert_eq!(forward.map(|t| t.amount), backward.map(|t| t.amount));
        if let (Some(f), Some(b)) = (forward, backward) {
            prop_assert_ne!(f.direction, b.direction);
        }
    }

    #[test]
    fn prop_at_most_one_transfer_with_exact_amount(d in cents(), w in cents()) {
        let transfer = net_balance(d, w);
        let settled = match transfer {
            None => d,
            Some(t) if t.direction == BalanceDirection::FirstExceeds => d - t.amount,
            Some(t) => d + t.amount,
        };
        prop_assert_eq!(settled, w);
    }
}
