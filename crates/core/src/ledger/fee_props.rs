//! Property-based tests for fee derivation.

use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use eusko_shared::types::{Currency, PaymentTypeId};

use crate::ledger::fee::{ChargeMode, FeeParty, FeeRule};

/// Amounts in cents from zero to ten million.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Rates from 0% to 100% with four decimals.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|basis| Decimal::new(basis, 4))
}

fn rule(rate: Decimal) -> FeeRule {
    FeeRule {
        payment_type: PaymentTypeId::new("original"),
        generated_payment_type: PaymentTypeId::new("generated"),
        charge: ChargeMode::Percentage(rate),
        payer: FeeParty::Destination,
        receiver: FeeParty::System,
        currency: Currency::Eusko,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Generated amount is round(original * rate, 2).
    #[test]
    fn prop_generated_amount_is_rounded_product(amount in arb_amount(), rate in arb_rate()) {
        let expected = (amount * rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        prop_assert_eq!(rule(rate).generated_amount(amount), expected);
    }

    /// A 100% fee reproduces the original amount exactly.
    #[test]
    fn prop_full_fee_is_identity(amount in arb_amount()) {
        prop_assert_eq!(rule(Decimal::ONE).generated_amount(amount), amount);
    }

    /// Deriving twice gives the same result.
    #[test]
    fn prop_generated_amount_is_deterministic(amount in arb_amount(), rate in arb_rate()) {
        let rule = rule(rate);
        prop_assert_eq!(rule.generated_amount(amount), rule.generated_amount(amount));
    }
}
