//! Operations run by Euskal Moneta itself, outside any desk.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::Response,
    routing::post,
};

use serde::Deserialize;

use eusko_core::orchestrator::{BankTransferExchange, DigitalSubscription, NotesTransport};
use eusko_core::reconciliation::Selection;
use eusko_shared::types::AmountInput;

use crate::AppState;
use crate::error::respond;

/// Creates the central operation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/exchanges/bank-transfer", post(exchange_by_bank_transfer))
        .route("/vault/out", post(vault_out))
        .route("/vault/in", post(vault_in))
        .route("/members/{login}/subscriptions", post(member_subscription))
}

/// Subscription paid from the member's own account.
#[derive(Debug, Deserialize)]
pub struct SubscriptionBody {
    /// Eusko amount, as typed.
    pub amount: AmountInput,
}

/// POST `/exchanges/bank-transfer` - Digital exchange paid by bank transfer.
async fn exchange_by_bank_transfer(
    State(state): State<AppState>,
    Json(request): Json<BankTransferExchange>,
) -> Response {
    respond(state.orchestrator.exchange_by_bank_transfer(request).await)
}

/// POST `/vault/out` - Notes leaving the vault for a desk.
async fn vault_out(
    State(state): State<AppState>,
    Json(request): Json<NotesTransport>,
) -> Response {
    respond(state.orchestrator.vault_out(request).await)
}

/// POST `/members/{login}/subscriptions` - Subscription paid in digital eusko.
async fn member_subscription(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Json(body): Json<SubscriptionBody>,
) -> Response {
    let request = DigitalSubscription {
        member_login: login,
        amount: body.amount,
    };
    respond(state.orchestrator.pay_subscription_digital(request).await)
}

/// POST `/vault/in` - Desk outputs received in the vault.
async fn vault_in(State(state): State<AppState>, Json(selection): Json<Selection>) -> Response {
    respond(state.reconciliation.vault_in(selection).await)
}
