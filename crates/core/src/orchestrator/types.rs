//! Orchestrator request types.
//!
//! Amounts arrive as the operator typed them and payment modes as their
//! wire codes; both are validated before any ledger call.

use serde::{Deserialize, Serialize};

use eusko_shared::types::{AmountInput, UserId};

/// Euro to paper eusko exchange at a desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperExchange {
    /// Desk login, without the `_BDC` suffix.
    pub desk_login: String,
    /// Member login.
    pub member_login: String,
    /// Euro amount received.
    pub amount: AmountInput,
    /// `Euro-LIQ` or `Euro-CHQ`.
    pub payment_mode: String,
}

/// Euro to digital eusko exchange at a desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalExchange {
    /// Desk login, without the `_BDC` suffix.
    pub desk_login: String,
    /// Member whose account is credited.
    pub member_login: String,
    /// Euro amount received.
    pub amount: AmountInput,
    /// `Euro-LIQ` or `Euro-CHQ`.
    pub payment_mode: String,
}

/// Paper notes handed over for a digital credit, or the reverse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesMovement {
    /// Desk login, without the `_BDC` suffix.
    pub desk_login: String,
    /// Member login.
    pub member_login: String,
    /// Eusko amount.
    pub amount: AmountInput,
}

/// Digital exchange paid by bank transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransferExchange {
    /// Member whose account is credited.
    pub member_login: String,
    /// Euro amount of the transfer.
    pub amount: AmountInput,
    /// Reference of the incoming bank transfer.
    pub bank_reference: String,
}

/// Paper eusko handed back by a business for euro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperReconversion {
    /// Desk login, without the `_BDC` suffix.
    pub desk_login: String,
    /// Login of the business.
    pub member_login: String,
    /// Eusko amount handed back.
    pub amount: AmountInput,
    /// Invoice the business issued for the reconversion.
    pub invoice_number: String,
}

/// Membership subscription paid at a desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPayment {
    /// Desk login, without the `_BDC` suffix.
    pub desk_login: String,
    /// Member login.
    pub member_login: String,
    /// Subscription amount, in the currency of the payment mode.
    pub amount: AmountInput,
    /// `Euro-LIQ`, `Euro-CHQ` or `Eusko-LIQ`.
    pub payment_mode: String,
}

/// Membership subscription paid from the member's digital account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalSubscription {
    /// Member login.
    pub member_login: String,
    /// Eusko amount.
    pub amount: AmountInput,
}

/// Notes leaving a desk stock, or the central vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesTransport {
    /// Desk the notes leave from, or go to.
    pub desk_login: String,
    /// Eusko amount carried.
    pub amount: AmountInput,
    /// Person carrying the notes.
    pub carrier: UserId,
    /// Free text entered by the operator.
    pub description: String,
}
