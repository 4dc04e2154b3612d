//! Cyclos web-rpc client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use eusko_core::ledger::{
    AccountOwner, AccountSummary, HistoryPage, HistoryQuery, LedgerClient, LedgerError,
    LedgerUser, PaymentRequest, Posting, TransactionRecord,
};
use eusko_shared::CyclosConfig;
use eusko_shared::types::{PostingId, StatusId, TransactionId};

use crate::cyclos::wire::{
    AccountWire, ChangeStatus, Envelope, ErrorBody, HistoryEntry, IdRef, Page, PerformPayment,
    SearchHistory, SearchUser, TransactionData, TransferWire, UserWire, summary_params,
};
use crate::error::GatewayError;

const PERFORM: &str = "payment/perform";
const CHANGE_STATUS: &str = "transferStatus/changeStatus";
const SEARCH_HISTORY: &str = "account/searchAccountHistory";
const LOAD_TRANSFER: &str = "transfer/load";
const GET_TRANSACTION: &str = "transaction/getData";
const ACCOUNTS_SUMMARY: &str = "account/getAccountsSummary";
const SEARCH_USER: &str = "user/search";

/// Ledger client over the Cyclos web-rpc services.
#[derive(Clone)]
pub struct CyclosClient {
    client: Client,
    base_url: String,
    login: String,
    password: String,
}

impl CyclosClient {
    /// Builds a client authenticating as the configured technical user.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Setup` if the HTTP client cannot be built.
    pub fn new(config: &CyclosConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            login: config.login.clone(),
            password: config.password.clone(),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    async fn post<B, T>(&self, method: &str, body: &B) -> Result<T, LedgerError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(method, "Cyclos call");
        let response = self
            .client
            .post(self.url(method))
            .basic_auth(&self.login, Some(&self.password))
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::from(e).into_ledger(method))?;
        Self::result(method, response).await
    }

    async fn get<T: DeserializeOwned>(&self, method: &str, path: &str) -> Result<T, LedgerError> {
        let response = self.send_get(method, path).await?;
        Self::result(method, response).await
    }

    /// Like `get`, with an unknown entity answered as `None`.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
    ) -> Result<Option<T>, LedgerError> {
        let response = self.send_get(method, path).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(method, path, "Cyclos entity not found");
            return Ok(None);
        }
        Self::result(method, response).await.map(Some)
    }

    async fn send_get(&self, method: &str, path: &str) -> Result<Response, LedgerError> {
        debug!(method, path, "Cyclos call");
        self.client
            .get(format!("{}/{path}", self.url(method)))
            .basic_auth(&self.login, Some(&self.password))
            .send()
            .await
            .map_err(|e| GatewayError::from(e).into_ledger(method))
    }

    async fn result<T: DeserializeOwned>(
        method: &str,
        response: Response,
    ) -> Result<T, LedgerError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|error| error.error_code)
                .unwrap_or(body);
            warn!(method, %status, %detail, "Cyclos rejected the call");
            return Err(GatewayError::Rejected { status, detail }.into_ledger(method));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::from(e).into_ledger(method))?;
        serde_json::from_str::<Envelope<T>>(&body)
            .map(|envelope| envelope.result)
            .map_err(|e| GatewayError::Decode(e.to_string()).into_ledger(method))
    }
}

#[async_trait]
impl LedgerClient for CyclosClient {
    async fn perform(&self, request: &PaymentRequest) -> Result<PostingId, LedgerError> {
        let created: IdRef = self.post(PERFORM, &PerformPayment::from(request)).await?;
        Ok(PostingId::new(created.id))
    }

    async fn change_status(
        &self,
        posting: &PostingId,
        new_status: &StatusId,
    ) -> Result<(), LedgerError> {
        let body = ChangeStatus {
            transfer: posting.to_string(),
            new_status: new_status.to_string(),
        };
        let _: serde_json::Value = self.post(CHANGE_STATUS, &body).await?;
        Ok(())
    }

    async fn search_history_page(
        &self,
        query: &HistoryQuery,
        page: u32,
        page_size: u32,
    ) -> Result<HistoryPage, LedgerError> {
        let body = SearchHistory::new(query, page, page_size);
        let page: Page<HistoryEntry> = self.post(SEARCH_HISTORY, &body).await?;
        Ok(HistoryPage::from(page))
    }

    async fn load_posting(&self, posting: &PostingId) -> Result<Option<Posting>, LedgerError> {
        let transfer: Option<TransferWire> =
            self.get_optional(LOAD_TRANSFER, posting.as_str()).await?;
        Ok(transfer.map(Into::into))
    }

    async fn get_transaction(
        &self,
        transaction: &TransactionId,
    ) -> Result<TransactionRecord, LedgerError> {
        let data: TransactionData = self.get(GET_TRANSACTION, transaction.as_str()).await?;
        Ok(data.into())
    }

    async fn account_summaries(
        &self,
        owner: &AccountOwner,
    ) -> Result<Vec<AccountSummary>, LedgerError> {
        let accounts: Vec<AccountWire> = self
            .post(ACCOUNTS_SUMMARY, &summary_params(owner))
            .await?;
        Ok(accounts.into_iter().map(Into::into).collect())
    }

    async fn find_user(&self, login: &str) -> Result<Option<LedgerUser>, LedgerError> {
        let page: Page<UserWire> = self.post(SEARCH_USER, &SearchUser::login(login)).await?;
        Ok(page
            .page_items
            .into_iter()
            .find(|user| user.short_display == login)
            .map(Into::into))
    }
}
