//! Reconciliation request types.
//!
//! Batch requests carry the ids of the postings selected by the operator.
//! Each posting is loaded from the ledger; its type, amount and current
//! statuses come from there, never from the request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use eusko_shared::types::{AmountInput, Currency, PostingId, UserId};

/// Candidate lists shown to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum PendingScreen {
    /// Vault outputs on their way to a desk stock.
    StockIn { desk_login: String },
    /// Desk outputs on their way to the vault.
    VaultIn,
    /// Euro cash remitted by desks.
    EuroIncomes,
    /// Eusko cash remitted by desks.
    EuskoIncomes,
    /// Reconciled bank movements still awaiting their transfers.
    BankTransfers { bank_login: String },
    /// Bank movements to reconcile.
    BankReconciliation { bank_login: String },
    /// Reconciled bank movements.
    BankHistory { bank_login: String },
    /// Paper deposits and withdrawals awaiting the dedicated-account transfer.
    DepositsWithdrawals,
    /// Paper and digital reconversions awaiting reimbursement.
    Reconversions,
}

/// Postings moved to reconciled without any compensating posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Ids of the selected postings, in the order they are transitioned.
    pub postings: Vec<PostingId>,
}

/// Vault outputs received into a desk stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockIn {
    /// Receiving desk.
    pub desk_login: String,
    /// Selected vault outputs.
    pub postings: Vec<PostingId>,
}

/// Euro collected by a desk and deposited in a bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDeposit {
    /// Depositing desk.
    pub desk_login: String,
    /// Ledger login of the deposit bank.
    pub bank_login: String,
    /// `Euro-LIQ` or `Euro-CHQ`.
    pub payment_mode: String,
    /// Deposit slip number, may be empty.
    #[serde(default)]
    pub deposit_slip: String,
    /// Amount the bank actually received.
    pub deposited_amount: AmountInput,
    /// Desk incomes included in the deposit.
    pub postings: Vec<PostingId>,
}

/// Cash handed over by a desk to Euskal Moneta.
///
/// The amount handed over is the total of the selected postings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashDeposit {
    /// Desk handing over the cash.
    pub desk_login: String,
    /// Euro cash or eusko notes.
    pub currency: Currency,
    /// Required for eusko cash.
    #[serde(default)]
    pub carrier: Option<UserId>,
    /// Desk incomes covered by the cash.
    pub postings: Vec<PostingId>,
}

/// Returned paper eusko leaving a desk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnEuskoOut {
    /// Desk the notes leave.
    pub desk_login: String,
    /// Person carrying the notes to the vault.
    pub carrier: UserId,
    /// Selected returns, one output posting each.
    pub postings: Vec<PostingId>,
}

/// Transfers ordered from a deposit bank, with operator totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTransfers {
    /// Ledger login of the deposit bank.
    pub bank_login: String,
    /// Subscriptions total, transferred to the euro debit account.
    #[serde(default)]
    pub subscriptions: AmountInput,
    /// Sales total, transferred to the euro debit account.
    #[serde(default)]
    pub sales: AmountInput,
    /// Paper exchanges total, transferred to the paper dedicated account.
    #[serde(default)]
    pub paper_exchanges: AmountInput,
    /// Digital exchanges total, transferred to the digital dedicated account.
    #[serde(default)]
    pub digital_exchanges: AmountInput,
    /// Bank deposits covered by the transfers.
    pub postings: Vec<PostingId>,
}

/// Totals of a bank deposit, per kind of desk income.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositBreakdown {
    /// `cotisation_en_euro` postings.
    pub subscriptions: Decimal,
    /// `vente_en_euro` postings.
    pub sales: Decimal,
    /// Euro legs of paper exchanges.
    pub paper_exchanges: Decimal,
    /// Euro legs of digital exchanges made at a desk.
    pub digital_exchanges: Decimal,
}

impl DepositBreakdown {
    /// Amount the bank should have received.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subscriptions + self.sales + self.paper_exchanges + self.digital_exchanges
    }
}
