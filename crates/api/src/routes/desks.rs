//! Operations performed at a bureau de change.
//!
//! The desk login in the path is the desk's short login (`B001`), not the
//! ledger login of its user.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::Response,
    routing::{get, post},
};
use serde::Deserialize;

use eusko_core::orchestrator::{
    DigitalExchange, NotesMovement, NotesTransport, PaperExchange, PaperReconversion,
    SubscriptionPayment,
};
use eusko_core::reconciliation::{BankDeposit, CashDeposit, ReturnEuskoOut, StockIn};
use eusko_shared::types::{AmountInput, Currency, PostingId, UserId};

use crate::AppState;
use crate::error::respond;

/// Creates the desk routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/desks/{login}/accounts", get(accounts))
        .route("/desks/{login}/exchanges/paper", post(exchange_paper))
        .route("/desks/{login}/exchanges/digital", post(exchange_digital))
        .route("/desks/{login}/deposits", post(deposit))
        .route("/desks/{login}/withdrawals", post(withdrawal))
        .route("/desks/{login}/reconversions", post(reconversion))
        .route("/desks/{login}/subscriptions", post(subscription))
        .route("/desks/{login}/stock-out", post(stock_out))
        .route("/desks/{login}/stock-in", post(stock_in))
        .route("/desks/{login}/bank-deposits", post(bank_deposit))
        .route("/desks/{login}/cash-deposits", post(cash_deposit))
        .route("/desks/{login}/returns-out", post(returns_out))
}

/// A member paying the desk in a given mode.
#[derive(Debug, Deserialize)]
pub struct MemberPaymentBody {
    /// Member login.
    pub member_login: String,
    /// Amount paid, as typed.
    pub amount: AmountInput,
    /// Payment mode code, e.g. `Euro-LIQ`.
    pub payment_mode: String,
}

/// Paper notes exchanged against digital eusko.
#[derive(Debug, Deserialize)]
pub struct NotesBody {
    /// Member login.
    pub member_login: String,
    /// Amount of notes.
    pub amount: AmountInput,
}

/// Paper eusko reconverted by a business.
#[derive(Debug, Deserialize)]
pub struct ReconversionBody {
    /// Business login.
    pub member_login: String,
    /// Amount of notes.
    pub amount: AmountInput,
    /// Invoice the reconversion refers to.
    pub invoice_number: String,
}

/// Notes leaving the desk stock.
#[derive(Debug, Deserialize)]
pub struct TransportBody {
    /// Amount of notes.
    pub amount: AmountInput,
    /// Ledger id of the carrier.
    pub carrier: UserId,
    /// Free description.
    #[serde(default)]
    pub description: String,
}

/// Postings selected on a pending screen.
#[derive(Debug, Deserialize)]
pub struct SelectionBody {
    /// Ids of the selected postings.
    pub postings: Vec<PostingId>,
}

/// Desk income deposited at a bank.
#[derive(Debug, Deserialize)]
pub struct BankDepositBody {
    /// Ledger login of the bank.
    pub bank_login: String,
    /// `Euro-LIQ` or `Euro-CHQ`.
    pub payment_mode: String,
    /// Deposit slip number.
    #[serde(default)]
    pub deposit_slip: String,
    /// Amount the bank received.
    pub deposited_amount: AmountInput,
    /// Ids of the selected incomes.
    pub postings: Vec<PostingId>,
}

/// Desk cash handed to Euskal Moneta.
#[derive(Debug, Deserialize)]
pub struct CashDepositBody {
    /// Currency of the cash.
    pub currency: Currency,
    /// Carrier, for eusko.
    #[serde(default)]
    pub carrier: Option<UserId>,
    /// Ids of the selected incomes.
    pub postings: Vec<PostingId>,
}

/// Returned eusko leaving the desk.
#[derive(Debug, Deserialize)]
pub struct ReturnsOutBody {
    /// Ledger id of the carrier.
    pub carrier: UserId,
    /// Ids of the selected returns.
    pub postings: Vec<PostingId>,
}

/// GET `/desks/{login}/accounts` - Balances of the desk accounts.
async fn accounts(State(state): State<AppState>, Path(login): Path<String>) -> Response {
    respond(state.orchestrator.desk_accounts(&login).await)
}

/// POST `/desks/{login}/exchanges/paper` - Euro for paper eusko.
async fn exchange_paper(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Json(body): Json<MemberPaymentBody>,
) -> Response {
    let request = PaperExchange {
        desk_login: login,
        member_login: body.member_login,
        amount: body.amount,
        payment_mode: body.payment_mode,
    };
    respond(state.orchestrator.exchange_paper(request).await)
}

/// POST `/desks/{login}/exchanges/digital` - Euro for digital eusko.
async fn exchange_digital(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Json(body): Json<MemberPaymentBody>,
) -> Response {
    let request = DigitalExchange {
        desk_login: login,
        member_login: body.member_login,
        amount: body.amount,
        payment_mode: body.payment_mode,
    };
    respond(state.orchestrator.exchange_digital_at_desk(request).await)
}

/// POST `/desks/{login}/deposits` - Notes credited on the member account.
async fn deposit(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Json(body): Json<NotesBody>,
) -> Response {
    let request = NotesMovement {
        desk_login: login,
        member_login: body.member_login,
        amount: body.amount,
    };
    respond(state.orchestrator.deposit_digital(request).await)
}

/// POST `/desks/{login}/withdrawals` - Member account paid out in notes.
async fn withdrawal(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Json(body): Json<NotesBody>,
) -> Response {
    let request = NotesMovement {
        desk_login: login,
        member_login: body.member_login,
        amount: body.amount,
    };
    respond(state.orchestrator.withdraw_digital(request).await)
}

/// POST `/desks/{login}/reconversions` - Paper eusko back to euro.
async fn reconversion(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Json(body): Json<ReconversionBody>,
) -> Response {
    let request = PaperReconversion {
        desk_login: login,
        member_login: body.member_login,
        amount: body.amount,
        invoice_number: body.invoice_number,
    };
    respond(state.orchestrator.reconvert_paper(request).await)
}

/// POST `/desks/{login}/subscriptions` - Membership fee.
async fn subscription(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Json(body): Json<MemberPaymentBody>,
) -> Response {
    let request = SubscriptionPayment {
        desk_login: login,
        member_login: body.member_login,
        amount: body.amount,
        payment_mode: body.payment_mode,
    };
    respond(state.orchestrator.pay_subscription(request).await)
}

/// POST `/desks/{login}/stock-out` - Notes leaving the desk stock.
async fn stock_out(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Json(body): Json<TransportBody>,
) -> Response {
    let request = NotesTransport {
        desk_login: login,
        amount: body.amount,
        carrier: body.carrier,
        description: body.description,
    };
    respond(state.orchestrator.stock_out(request).await)
}

/// POST `/desks/{login}/stock-in` - Vault outputs received.
async fn stock_in(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Json(body): Json<SelectionBody>,
) -> Response {
    let request = StockIn {
        desk_login: login,
        postings: body.postings,
    };
    respond(state.reconciliation.stock_in(request).await)
}

/// POST `/desks/{login}/bank-deposits` - Euro incomes deposited at a bank.
async fn bank_deposit(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Json(body): Json<BankDepositBody>,
) -> Response {
    let request = BankDeposit {
        desk_login: login,
        bank_login: body.bank_login,
        payment_mode: body.payment_mode,
        deposit_slip: body.deposit_slip,
        deposited_amount: body.deposited_amount,
        postings: body.postings,
    };
    respond(state.reconciliation.bank_deposit(request).await)
}

/// POST `/desks/{login}/cash-deposits` - Cash remitted to Euskal Moneta.
async fn cash_deposit(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Json(body): Json<CashDepositBody>,
) -> Response {
    let request = CashDeposit {
        desk_login: login,
        currency: body.currency,
        carrier: body.carrier,
        postings: body.postings,
    };
    respond(state.reconciliation.cash_deposit(request).await)
}

/// POST `/desks/{login}/returns-out` - Returned eusko leaving the desk.
async fn returns_out(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Json(body): Json<ReturnsOutBody>,
) -> Response {
    let request = ReturnEuskoOut {
        desk_login: login,
        carrier: body.carrier,
        postings: body.postings,
    };
    respond(state.reconciliation.return_eusko_out(request).await)
}
