//! Transfer fees: postings the ledger generates on its own.
//!
//! A fee rule on a payment type makes the ledger create a second transfer
//! atomically with the original one. The orchestrator must know which
//! payment types carry such a rule so it never issues the same leg twice.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use eusko_shared::types::{Currency, PaymentTypeId, money::round};

/// How the generated amount is derived from the original amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "amount")]
pub enum ChargeMode {
    /// Fraction of the original amount; `1.00` means 100%.
    Percentage(Decimal),
    /// Fixed amount regardless of the original amount.
    Fixed(Decimal),
}

/// Who pays or receives a generated transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeParty {
    /// Debited side of the original transfer.
    Source,
    /// Credited side of the original transfer.
    Destination,
    /// The system accounts.
    System,
}

/// A transfer fee configured on a payment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRule {
    /// Payment type the fee is configured on.
    pub payment_type: PaymentTypeId,
    /// Payment type of the generated transfer.
    pub generated_payment_type: PaymentTypeId,
    /// Amount derivation.
    pub charge: ChargeMode,
    /// Party debited by the generated transfer.
    pub payer: FeeParty,
    /// Party credited by the generated transfer.
    pub receiver: FeeParty,
    /// Currency of the generated transfer.
    pub currency: Currency,
}

impl FeeRule {
    /// Amount of the transfer generated for an original amount.
    #[must_use]
    pub fn generated_amount(&self, original: Decimal) -> Decimal {
        match self.charge {
            ChargeMode::Percentage(rate) => round(original * rate, self.currency.precision()),
            ChargeMode::Fixed(amount) => amount,
        }
    }
}

/// Who issues the counter-leg of an exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterLeg {
    /// The ledger creates it from a fee rule; issuing it again would double it.
    LedgerGenerated(FeeRule),
    /// The orchestrator performs it as an explicit second payment.
    Orchestrated,
}

/// Preview of a transfer the ledger will generate, reported to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTransfer {
    /// Payment type of the generated transfer.
    pub payment_type: PaymentTypeId,
    /// Generated amount.
    pub amount: Decimal,
    /// Currency of the generated transfer.
    pub currency: Currency,
}

impl GeneratedTransfer {
    /// Previews the transfer a rule generates for an original amount.
    #[must_use]
    pub fn preview(rule: &FeeRule, original: Decimal) -> Self {
        Self {
            payment_type: rule.generated_payment_type.clone(),
            amount: rule.generated_amount(original),
            currency: rule.currency,
        }
    }
}
