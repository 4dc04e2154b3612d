//! Reconciliation routes: pending lists and batch validations.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
};
use serde::Deserialize;

use eusko_core::reconciliation::{BankTransfers, PendingScreen, Selection};

use crate::AppState;
use crate::error::{bad_request, respond};

/// Creates the reconciliation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reconciliation/pending/{screen}", get(pending))
        .route("/reconciliation/history", post(validate_history))
        .route("/reconciliation/bank-transfers", post(validate_bank_transfers))
        .route(
            "/reconciliation/deposits-withdrawals",
            post(validate_deposits_withdrawals),
        )
        .route("/reconciliation/reconversions", post(validate_reconversions))
}

/// Parameters of the screens scoped to a desk or a bank.
#[derive(Debug, Default, Deserialize)]
pub struct PendingQuery {
    /// Desk login, for `stock-in`.
    pub desk: Option<String>,
    /// Bank login, for the bank screens.
    pub bank: Option<String>,
}

/// Resolves a screen name and its scope.
fn screen(name: &str, query: PendingQuery) -> Result<PendingScreen, String> {
    let desk = || query.desk.clone().ok_or("missing desk parameter");
    let bank = || query.bank.clone().ok_or("missing bank parameter");
    let screen = match name {
        "stock-in" => PendingScreen::StockIn { desk_login: desk()? },
        "vault-in" => PendingScreen::VaultIn,
        "euro-incomes" => PendingScreen::EuroIncomes,
        "eusko-incomes" => PendingScreen::EuskoIncomes,
        "bank-transfers" => PendingScreen::BankTransfers { bank_login: bank()? },
        "bank-reconciliation" => PendingScreen::BankReconciliation { bank_login: bank()? },
        "bank-history" => PendingScreen::BankHistory { bank_login: bank()? },
        "deposits-withdrawals" => PendingScreen::DepositsWithdrawals,
        "reconversions" => PendingScreen::Reconversions,
        other => return Err(format!("unknown screen {other}")),
    };
    Ok(screen)
}

/// GET `/reconciliation/pending/{screen}` - Postings awaiting an operator.
async fn pending(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<PendingQuery>,
) -> Response {
    match screen(&name, query) {
        Ok(screen) => respond(state.reconciliation.pending(&screen).await),
        Err(message) => bad_request(message),
    }
}

/// POST `/reconciliation/history` - Bank movements reconciled.
async fn validate_history(
    State(state): State<AppState>,
    Json(selection): Json<Selection>,
) -> Response {
    respond(state.reconciliation.validate_history(selection).await)
}

/// POST `/reconciliation/bank-transfers` - Transfers ordered from a bank.
async fn validate_bank_transfers(
    State(state): State<AppState>,
    Json(request): Json<BankTransfers>,
) -> Response {
    respond(state.reconciliation.validate_bank_transfers(request).await)
}

/// POST `/reconciliation/deposits-withdrawals` - Dedicated accounts balanced.
async fn validate_deposits_withdrawals(
    State(state): State<AppState>,
    Json(selection): Json<Selection>,
) -> Response {
    respond(
        state
            .reconciliation
            .validate_deposits_withdrawals(selection)
            .await,
    )
}

/// POST `/reconciliation/reconversions` - Reconverting businesses reimbursed.
async fn validate_reconversions(
    State(state): State<AppState>,
    Json(selection): Json<Selection>,
) -> Response {
    respond(state.reconciliation.validate_reconversions(selection).await)
}
