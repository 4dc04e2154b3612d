//! Ledger client contract.

use async_trait::async_trait;
use tracing::debug;

use eusko_shared::types::{PostingId, StatusId, TransactionId};

use crate::ledger::error::LedgerError;
use crate::ledger::types::{
    AccountOwner, AccountSummary, HistoryPage, HistoryQuery, LedgerUser, PaymentRequest, Posting,
    TransactionRecord,
};

/// Largest page the ledger serves for history searches.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Commands and queries against the external double-entry ledger.
///
/// Every call is one remote round trip. Implementations never retry.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Performs a payment and returns the id of the created transfer.
    async fn perform(&self, request: &PaymentRequest) -> Result<PostingId, LedgerError>;

    /// Moves a transfer to a new status of one of its status flows.
    async fn change_status(
        &self,
        posting: &PostingId,
        new_status: &StatusId,
    ) -> Result<(), LedgerError>;

    /// Fetches one page of an account history search. Pages are zero-based.
    async fn search_history_page(
        &self,
        query: &HistoryQuery,
        page: u32,
        page_size: u32,
    ) -> Result<HistoryPage, LedgerError>;

    /// Loads one transfer as it currently stands in the ledger.
    ///
    /// The amount is unsigned and `related_owner` is the paying user, if
    /// any. Returns `None` for an unknown id.
    async fn load_posting(&self, posting: &PostingId) -> Result<Option<Posting>, LedgerError>;

    /// Loads the transaction a transfer belongs to.
    async fn get_transaction(
        &self,
        transaction: &TransactionId,
    ) -> Result<TransactionRecord, LedgerError>;

    /// Lists the accounts of an owner with their balances.
    async fn account_summaries(
        &self,
        owner: &AccountOwner,
    ) -> Result<Vec<AccountSummary>, LedgerError>;

    /// Finds a user by exact login.
    async fn find_user(&self, login: &str) -> Result<Option<LedgerUser>, LedgerError>;
}

/// Runs a history search to exhaustion.
///
/// Pages are fetched in order and flattened, so the result keeps the
/// ledger's ordering.
pub async fn search_history(
    ledger: &dyn LedgerClient,
    query: &HistoryQuery,
) -> Result<Vec<Posting>, LedgerError> {
    let mut postings = Vec::new();
    let mut page = 0;

    loop {
        let result = ledger
            .search_history_page(query, page, MAX_PAGE_SIZE)
            .await?;
        debug!(
            account = %query.account,
            page,
            page_count = result.page_count,
            items = result.items.len(),
            "History page fetched"
        );
        postings.extend(result.items);

        if result.page_count == 0 || page + 1 >= result.page_count {
            break;
        }
        page += 1;
    }

    Ok(postings)
}
