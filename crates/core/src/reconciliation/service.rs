//! Reconciliation engine.
//!
//! Batch operations follow one shape: the selected postings are loaded from
//! the ledger and checked against their status flow, compensating postings
//! are built from what the ledger returned, then everything is submitted in
//! order (postings first, status changes last, in selection order).

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use eusko_shared::types::{
    AccountId, Amount, Currency, CustomFieldId, PaymentTypeId, PostingId, StatusId, UserId,
};

use crate::catalog::{Catalog, PaymentMode};
use crate::ledger::{
    AccountOwner, CustomValue, Direction, EntityRef, HistoryQuery, LedgerClient, LedgerUser,
    Nature, PaymentRequest, Posting, search_history,
};
use crate::operation::submission::Submission;
use crate::operation::{OperationError, OperationReport};
use crate::orchestrator::DESK_LOGIN_SUFFIX;
use crate::reconciliation::balancing::{BalanceDirection, net_balance};
use crate::reconciliation::types::{
    BankDeposit, BankTransfers, CashDeposit, DepositBreakdown, PendingScreen, ReturnEuskoOut,
    Selection, StockIn,
};
use crate::workflow::{FlowKind, StatusTransition, WorkflowError, WorkflowService};

const DEDICATED_TRANSFER_DESCRIPTION: &str =
    "Régularisation entre comptes dédiés suite à des dépôts et retraits d'eusko.";
const RECONVERSION_DESCRIPTION: &str =
    "Reconversions - Remboursement des prestataires + commission pour Euskal Moneta.";

/// A compensating posting with its report label.
type Leg = (&'static str, PaymentRequest);

/// Searches pending postings and closes them out.
#[derive(Clone)]
pub struct ReconciliationEngine {
    ledger: Arc<dyn LedgerClient>,
    catalog: Arc<Catalog>,
}

impl ReconciliationEngine {
    /// Creates an engine over the ledger.
    #[must_use]
    pub fn new(ledger: Arc<dyn LedgerClient>, catalog: Arc<Catalog>) -> Self {
        Self { ledger, catalog }
    }

    /// Lists the postings awaiting action on a screen.
    pub async fn pending(&self, screen: &PendingScreen) -> Result<Vec<Posting>, OperationError> {
        let c = &*self.catalog;
        let postings = match screen {
            PendingScreen::StockIn { desk_login } => {
                let desk = self.desk(desk_login).await?;
                let query = HistoryQuery::account(c.system_accounts.transit.clone())
                    .direction(Direction::Credit)
                    .from_nature(Nature::System)
                    .status(c.statuses.to_reconcile.clone());
                self.search(&query)
                    .await?
                    .into_iter()
                    .filter(|p| p.payment_type == c.payment_types.vault_out)
                    .filter(|p| {
                        p.linked_entity(&c.fields.desk)
                            .is_some_and(|entity| entity.id == desk.id)
                    })
                    .collect()
            }
            PendingScreen::VaultIn => {
                let query = HistoryQuery::account(c.system_accounts.transit.clone())
                    .direction(Direction::Credit)
                    .from_nature(Nature::User)
                    .status(c.statuses.to_reconcile.clone());
                self.search(&query).await?
            }
            PendingScreen::EuroIncomes => {
                let query = HistoryQuery::account(c.system_accounts.euro_debit.clone())
                    .direction(Direction::Credit)
                    .status(c.statuses.to_reconcile.clone());
                of_type(self.search(&query).await?, &c.payment_types.till_euro_remittance)
            }
            PendingScreen::EuskoIncomes => {
                let query = HistoryQuery::account(c.system_accounts.notes_in_circulation.clone())
                    .direction(Direction::Credit)
                    .status(c.statuses.to_reconcile.clone());
                of_type(self.search(&query).await?, &c.payment_types.till_eusko_out)
            }
            PendingScreen::BankTransfers { bank_login } => {
                let account = self.bank_account(bank_login).await?;
                let query = HistoryQuery::account(account)
                    .from_nature(Nature::User)
                    .status(c.statuses.transfers_due.clone());
                self.search(&query)
                    .await?
                    .into_iter()
                    .filter(|p| p.has_status(&c.statuses.reconciled))
                    .collect()
            }
            PendingScreen::BankReconciliation { bank_login } => {
                let account = self.bank_account(bank_login).await?;
                let query = HistoryQuery::account(account)
                    .from_nature(Nature::User)
                    .status(c.statuses.to_reconcile.clone());
                self.search(&query).await?
            }
            PendingScreen::BankHistory { bank_login } => {
                let account = self.bank_account(bank_login).await?;
                let query = HistoryQuery::account(account).status(c.statuses.reconciled.clone());
                self.search(&query).await?
            }
            PendingScreen::DepositsWithdrawals => {
                let account = &c.system_accounts.notes_in_circulation;
                let deposits = HistoryQuery::account(account.clone())
                    .direction(Direction::Debit)
                    .to_nature(Nature::User)
                    .status(c.statuses.transfers_due.clone());
                let withdrawals = HistoryQuery::account(account.clone())
                    .direction(Direction::Credit)
                    .from_nature(Nature::User)
                    .status(c.statuses.transfers_due.clone());
                let mut postings =
                    of_type(self.search(&deposits).await?, &c.payment_types.notes_deposit);
                postings.extend(of_type(
                    self.search(&withdrawals).await?,
                    &c.payment_types.notes_withdrawal,
                ));
                postings
            }
            PendingScreen::Reconversions => {
                let paper = HistoryQuery::account(c.system_accounts.notes_in_circulation.clone())
                    .direction(Direction::Debit)
                    .status(c.statuses.transfers_due.clone());
                let digital = HistoryQuery::account(c.system_accounts.digital_debit.clone())
                    .direction(Direction::Credit)
                    .status(c.statuses.transfers_due.clone());
                let mut postings =
                    of_type(self.search(&paper).await?, &c.payment_types.paper_reconversion);
                postings.extend(of_type(
                    self.search(&digital).await?,
                    &c.payment_types.digital_reconversion,
                ));
                postings
            }
        };
        debug!(?screen, count = postings.len(), "Pending postings listed");
        Ok(postings)
    }

    /// Marks bank movements as reconciled.
    pub async fn validate_history(
        &self,
        selection: Selection,
    ) -> Result<OperationReport, OperationError> {
        let postings = self.selected(&selection.postings).await?;
        let transitions = self.plan(
            FlowKind::Reconciliation,
            &self.catalog.statuses.reconciled,
            &postings,
        )?;
        self.submit("validate_history", Vec::new(), transitions).await
    }

    /// Receives vault outputs into a desk stock.
    pub async fn stock_in(&self, request: StockIn) -> Result<OperationReport, OperationError> {
        let c = &*self.catalog;
        let postings = self.selected(&request.postings).await?;
        let transitions = self.plan(FlowKind::Reconciliation, &c.statuses.reconciled, &postings)?;
        if let Some(other) = postings
            .iter()
            .find(|posting| posting.payment_type != c.payment_types.vault_out)
        {
            return Err(unexpected_type(other));
        }
        let desk = self.desk(&request.desk_login).await?;

        let legs = postings
            .iter()
            .map(|posting| {
                let carrier = required_entity(posting, &c.fields.carrier, "carrier")?;
                let description = if posting.description.contains("Sortie coffre") {
                    posting.description.replace("Sortie coffre", "Entrée stock")
                } else {
                    format!("Entrée stock - {} - {}", request.desk_login, desk.display)
                };
                let leg = PaymentRequest::new(
                    &c.payment_types.stock_in,
                    magnitude(posting)?,
                    c.currency_id(Currency::Eusko),
                    AccountOwner::System,
                    desk.owner(),
                )
                .with_value(CustomValue::linked(&c.fields.carrier, &carrier.id))
                .with_description(description);
                Ok(("stock_in", leg))
            })
            .collect::<Result<Vec<Leg>, OperationError>>()?;

        self.submit("stock_in", legs, transitions).await
    }

    /// Receives desk outputs into the vault.
    pub async fn vault_in(&self, selection: Selection) -> Result<OperationReport, OperationError> {
        let c = &*self.catalog;
        let postings = self.selected(&selection.postings).await?;
        let transitions = self.plan(FlowKind::Reconciliation, &c.statuses.reconciled, &postings)?;

        let legs = postings
            .iter()
            .map(|posting| {
                let desk = posting.related_owner.as_ref().ok_or_else(|| {
                    OperationError::Validation(format!("posting {} has no origin desk", posting.id))
                })?;
                let carrier = required_entity(posting, &c.fields.carrier, "carrier")?;
                let desk_login = desk.short_display.replace(DESK_LOGIN_SUFFIX, "");
                let desk_name = desk.display.replace(" (BDC)", "");

                let mut leg = PaymentRequest::new(
                    &c.payment_types.vault_in,
                    magnitude(posting)?,
                    c.currency_id(Currency::Eusko),
                    AccountOwner::System,
                    AccountOwner::System,
                )
                .with_value(CustomValue::linked(&c.fields.desk, &desk.id))
                .with_value(CustomValue::linked(&c.fields.carrier, &carrier.id));

                let description = if posting.payment_type == c.payment_types.returned_eusko_out {
                    let member = required_entity(posting, &c.fields.member, "member")?;
                    leg = leg.with_value(CustomValue::linked(&c.fields.optional_member, &member.id));
                    if posting.description.contains("Sortie retours eusko") {
                        posting
                            .description
                            .replace("Sortie retours eusko", "Entrée coffre")
                    } else {
                        format!(
                            "Entrée coffre - {desk_login} - {desk_name}\n{}",
                            posting.description
                        )
                    }
                } else if posting.description.contains("Sortie stock") {
                    posting.description.replace("Sortie stock", "Entrée coffre")
                } else {
                    format!("Entrée coffre - {desk_login} - {desk_name}")
                };
                Ok(("vault_in", leg.with_description(description)))
            })
            .collect::<Result<Vec<Leg>, OperationError>>()?;

        self.submit("vault_in", legs, transitions).await
    }

    /// Records a desk's euro deposit at a bank.
    ///
    /// The posted amount is the total of the selected postings as loaded
    /// from the ledger. When the
    /// bank received a different amount, one pair of regularisation
    /// postings books the difference.
    pub async fn bank_deposit(
        &self,
        request: BankDeposit,
    ) -> Result<OperationReport, OperationError> {
        let c = &*self.catalog;
        let deposited = request.deposited_amount.parse()?;
        let mode = match PaymentMode::parse(&request.payment_mode) {
            Some(mode) if mode.currency() == Currency::Euro => mode,
            _ => {
                return Err(OperationError::Validation(format!(
                    "payment mode {} cannot be deposited in a bank",
                    request.payment_mode
                )));
            }
        };
        let postings = self.selected(&request.postings).await?;
        let transitions = self.plan(FlowKind::Remittance, &c.statuses.remitted, &postings)?;
        let breakdown = self.deposit_breakdown(&postings)?;
        let calculated = Amount::new(breakdown.total())?;

        let desk = self.desk(&request.desk_login).await?;
        let bank = self.bank(&request.bank_login).await?;

        let mut legs: Vec<Leg> = vec![(
            "bank_deposit",
            PaymentRequest::new(
                &c.payment_types.bank_deposit,
                calculated,
                c.currency_id(Currency::Euro),
                desk.owner(),
                bank.owner(),
            )
            .with_value(CustomValue::enumerated(
                &c.fields.payment_mode,
                c.payment_mode_value(mode),
            ))
            .with_value(CustomValue::text(
                &c.fields.deposit_slip,
                request.deposit_slip.trim(),
            ))
            .with_value(CustomValue::decimal(
                &c.fields.subscriptions_total,
                breakdown.subscriptions,
            ))
            .with_value(CustomValue::decimal(&c.fields.sales_total, breakdown.sales))
            .with_value(CustomValue::decimal(
                &c.fields.paper_exchange_total,
                breakdown.paper_exchanges,
            ))
            .with_value(CustomValue::decimal(
                &c.fields.digital_exchange_total,
                breakdown.digital_exchanges,
            ))
            .with_description(format!(
                "Dépôt en banque - {} - {}\n{} - {}",
                request.desk_login,
                desk.display,
                bank.display,
                mode.label()
            )),
        )];

        if let Some(balancing) = net_balance(deposited.value(), calculated.value()) {
            let difference = Amount::new(balancing.amount)?;
            let euro = c.currency_id(Currency::Euro);
            match balancing.direction {
                BalanceDirection::SecondExceeds => {
                    legs.push((
                        "bank_to_desk_till",
                        PaymentRequest::new(
                            &c.payment_types.bank_to_desk_till,
                            difference,
                            euro,
                            bank.owner(),
                            desk.owner(),
                        )
                        .with_description("Espèces non déposées"),
                    ));
                    legs.push((
                        "short_deposit_adjustment",
                        PaymentRequest::new(
                            &c.payment_types.short_deposit_adjustment,
                            difference,
                            euro,
                            AccountOwner::System,
                            bank.owner(),
                        )
                        .with_value(CustomValue::linked(&c.fields.desk, &desk.id))
                        .with_description("Régularisation espèces non déposées"),
                    ));
                }
                BalanceDirection::FirstExceeds => {
                    legs.push((
                        "desk_till_to_bank",
                        PaymentRequest::new(
                            &c.payment_types.desk_till_to_bank,
                            difference,
                            euro,
                            desk.owner(),
                            bank.owner(),
                        )
                        .with_description("Espèces déposées en trop"),
                    ));
                    legs.push((
                        "excess_deposit_adjustment",
                        PaymentRequest::new(
                            &c.payment_types.excess_deposit_adjustment,
                            difference,
                            euro,
                            bank.owner(),
                            AccountOwner::System,
                        )
                        .with_value(CustomValue::linked(&c.fields.desk, &desk.id))
                        .with_description("Régularisation espèces déposées en trop"),
                    ));
                }
            }
        }

        self.submit("bank_deposit", legs, transitions).await
    }

    /// Records cash handed over by a desk, sized to the selected postings.
    pub async fn cash_deposit(
        &self,
        request: CashDeposit,
    ) -> Result<OperationReport, OperationError> {
        let c = &*self.catalog;
        if request.currency == Currency::Eusko && request.carrier.is_none() {
            return Err(OperationError::Validation(
                "a carrier is required for eusko cash".to_string(),
            ));
        }
        let postings = self.selected(&request.postings).await?;
        let transitions = self.plan(FlowKind::Remittance, &c.statuses.remitted, &postings)?;
        let amount = Amount::new(postings.iter().map(Posting::magnitude).sum())?;
        let desk = self.desk(&request.desk_login).await?;

        let leg = match request.currency {
            Currency::Euro => PaymentRequest::new(
                &c.payment_types.till_euro_remittance,
                amount,
                c.currency_id(Currency::Euro),
                desk.owner(),
                AccountOwner::System,
            )
            .with_description(format!(
                "Remise d'espèces - {} - {}",
                request.desk_login, desk.display
            )),
            Currency::Eusko => {
                let carrier = request.carrier.as_ref().ok_or_else(|| {
                    OperationError::Validation("a carrier is required for eusko cash".to_string())
                })?;
                PaymentRequest::new(
                    &c.payment_types.till_eusko_out,
                    amount,
                    c.currency_id(Currency::Eusko),
                    desk.owner(),
                    AccountOwner::System,
                )
                .with_value(CustomValue::linked(&c.fields.carrier, carrier))
                .with_description(format!(
                    "Sortie caisse eusko - {} - {}",
                    request.desk_login, desk.display
                ))
            }
        };

        self.submit("cash_deposit", vec![("cash_deposit", leg)], transitions)
            .await
    }

    /// Sends the paper eusko returned to a desk out to the vault.
    pub async fn return_eusko_out(
        &self,
        request: ReturnEuskoOut,
    ) -> Result<OperationReport, OperationError> {
        let c = &*self.catalog;
        let postings = self.selected(&request.postings).await?;
        let transitions = self.plan(FlowKind::Remittance, &c.statuses.remitted, &postings)?;
        let desk = self.desk(&request.desk_login).await?;

        let legs = postings
            .iter()
            .map(|posting| {
                let member = required_entity(posting, &c.fields.member, "member")?;
                let leg = PaymentRequest::new(
                    &c.payment_types.returned_eusko_out,
                    magnitude(posting)?,
                    c.currency_id(Currency::Eusko),
                    desk.owner(),
                    AccountOwner::System,
                )
                .with_value(CustomValue::linked(&c.fields.member, &member.id))
                .with_value(CustomValue::linked(&c.fields.carrier, &request.carrier))
                .with_description(format!(
                    "Sortie retours eusko - {} - {}\n{}",
                    request.desk_login, desk.display, posting.description
                ));
                Ok(("returned_eusko_out", leg))
            })
            .collect::<Result<Vec<Leg>, OperationError>>()?;

        self.submit("return_eusko_out", legs, transitions).await
    }

    /// Records the transfers ordered from a deposit bank.
    pub async fn validate_bank_transfers(
        &self,
        request: BankTransfers,
    ) -> Result<OperationReport, OperationError> {
        let c = &*self.catalog;
        let paper = AccountOwner::User(c.dedicated.paper.clone());
        let digital = AccountOwner::User(c.dedicated.digital.clone());
        let totals = [
            (
                "subscriptions",
                request.subscriptions.parse()?,
                &c.payment_types.bank_to_euro_debit,
                AccountOwner::System,
                "Cotisations",
            ),
            (
                "sales",
                request.sales.parse()?,
                &c.payment_types.bank_to_euro_debit,
                AccountOwner::System,
                "Ventes",
            ),
            (
                "paper_exchanges",
                request.paper_exchanges.parse()?,
                &c.payment_types.bank_to_dedicated,
                paper,
                "Changes Eusko billet",
            ),
            (
                "digital_exchanges",
                request.digital_exchanges.parse()?,
                &c.payment_types.bank_to_dedicated,
                digital,
                "Changes Eusko numérique",
            ),
        ];
        let postings = self.selected(&request.postings).await?;
        let transitions = self.plan(FlowKind::Transfers, &c.statuses.transfers_done, &postings)?;
        let bank = self.bank(&request.bank_login).await?;

        let mut legs: Vec<Leg> = Vec::new();
        for (label, amount, payment_type, to, suffix) in totals {
            if amount.is_zero() {
                continue;
            }
            legs.push((
                label,
                PaymentRequest::new(
                    payment_type,
                    amount,
                    c.currency_id(Currency::Euro),
                    bank.owner(),
                    to,
                )
                .with_description(format!("{} - {suffix}", bank.display)),
            ));
        }

        self.submit("validate_bank_transfers", legs, transitions)
            .await
    }

    /// Nets paper deposits against paper withdrawals between the two
    /// dedicated accounts.
    pub async fn validate_deposits_withdrawals(
        &self,
        selection: Selection,
    ) -> Result<OperationReport, OperationError> {
        let c = &*self.catalog;
        let postings = self.selected(&selection.postings).await?;
        let transitions = self.plan(FlowKind::Transfers, &c.statuses.transfers_done, &postings)?;

        let mut deposits = Decimal::ZERO;
        let mut withdrawals = Decimal::ZERO;
        for posting in &postings {
            if posting.payment_type == c.payment_types.notes_deposit {
                deposits += posting.magnitude();
            } else if posting.payment_type == c.payment_types.notes_withdrawal {
                withdrawals += posting.magnitude();
            } else {
                return Err(unexpected_type(posting));
            }
        }

        let mut legs: Vec<Leg> = Vec::new();
        if let Some(balancing) = net_balance(deposits, withdrawals) {
            let paper = AccountOwner::User(c.dedicated.paper.clone());
            let digital = AccountOwner::User(c.dedicated.digital.clone());
            let (from, to) = match balancing.direction {
                BalanceDirection::FirstExceeds => (paper, digital),
                BalanceDirection::SecondExceeds => (digital, paper),
            };
            legs.push((
                "between_dedicated",
                PaymentRequest::new(
                    &c.payment_types.between_dedicated,
                    Amount::new(balancing.amount)?,
                    c.currency_id(Currency::Euro),
                    from,
                    to,
                )
                .with_description(DEDICATED_TRANSFER_DESCRIPTION),
            ));
        }

        self.submit("validate_deposits_withdrawals", legs, transitions)
            .await
    }

    /// Reimburses reconversions from the dedicated accounts.
    ///
    /// Both dedicated accounts must cover their total before anything is
    /// submitted.
    pub async fn validate_reconversions(
        &self,
        selection: Selection,
    ) -> Result<OperationReport, OperationError> {
        let c = &*self.catalog;
        let postings = self.selected(&selection.postings).await?;
        let transitions = self.plan(FlowKind::Transfers, &c.statuses.transfers_done, &postings)?;

        let mut paper_total = Decimal::ZERO;
        let mut digital_total = Decimal::ZERO;
        for posting in &postings {
            if posting.payment_type == c.payment_types.paper_reconversion {
                paper_total += posting.magnitude();
            } else if posting.payment_type == c.payment_types.digital_reconversion {
                digital_total += posting.magnitude();
            } else {
                return Err(unexpected_type(posting));
            }
        }

        let dedicated = [
            (&c.dedicated.paper, paper_total, "billet"),
            (&c.dedicated.digital, digital_total, "numerique"),
        ];
        for (account, total, kind) in &dedicated {
            if self.dedicated_balance(account).await? < *total {
                return Err(OperationError::InsufficientFunds(format!(
                    "error-system-not-enough-money-{kind}"
                )));
            }
        }

        let mut legs: Vec<Leg> = Vec::new();
        for (account, total, kind) in dedicated {
            if total.is_zero() {
                continue;
            }
            let label = if kind == "billet" {
                "paper_reimbursement"
            } else {
                "digital_reimbursement"
            };
            legs.push((
                label,
                PaymentRequest::new(
                    &c.payment_types.dedicated_to_euro_debit,
                    Amount::new(total)?,
                    c.currency_id(Currency::Euro),
                    AccountOwner::User(account.clone()),
                    AccountOwner::System,
                )
                .with_description(RECONVERSION_DESCRIPTION),
            ));
        }

        self.submit("validate_reconversions", legs, transitions)
            .await
    }

    /// Sums the selected desk incomes per kind.
    fn deposit_breakdown(&self, postings: &[Posting]) -> Result<DepositBreakdown, OperationError> {
        let types = &self.catalog.payment_types;
        let mut breakdown = DepositBreakdown::default();
        for posting in postings {
            let slot = if posting.payment_type == types.euro_subscription {
                &mut breakdown.subscriptions
            } else if posting.payment_type == types.euro_sale {
                &mut breakdown.sales
            } else if posting.payment_type == types.paper_exchange_euro {
                &mut breakdown.paper_exchanges
            } else if posting.payment_type == types.desk_digital_exchange_euro {
                &mut breakdown.digital_exchanges
            } else {
                return Err(unexpected_type(posting));
            };
            *slot += posting.magnitude();
        }
        Ok(breakdown)
    }

    /// Loads the selected postings, in selection order.
    async fn selected(&self, ids: &[PostingId]) -> Result<Vec<Posting>, OperationError> {
        if ids.is_empty() {
            return Err(OperationError::Validation(
                "no posting selected".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        let mut postings = Vec::with_capacity(ids.len());
        for id in ids {
            if !seen.insert(id) {
                return Err(WorkflowError::DuplicatePosting(id.clone()).into());
            }
            let posting = self
                .ledger
                .load_posting(id)
                .await?
                .ok_or_else(|| OperationError::NotFound(format!("posting {id}")))?;
            postings.push(posting);
        }
        debug!(count = postings.len(), "Selected postings loaded");
        Ok(postings)
    }

    fn plan(
        &self,
        flow: FlowKind,
        target: &StatusId,
        postings: &[Posting],
    ) -> Result<Vec<StatusTransition>, OperationError> {
        Ok(WorkflowService::plan_batch(
            &self.catalog.flow(flow),
            postings,
            target,
        )?)
    }

    async fn submit(
        &self,
        operation: &'static str,
        legs: Vec<Leg>,
        transitions: Vec<StatusTransition>,
    ) -> Result<OperationReport, OperationError> {
        let mut submission =
            Submission::start(self.ledger.as_ref(), operation).with_transitions(transitions);
        for (label, leg) in legs {
            submission.post(label, leg).await?;
        }
        submission.apply_transitions().await?;
        Ok(submission.finish())
    }

    async fn search(&self, query: &HistoryQuery) -> Result<Vec<Posting>, OperationError> {
        Ok(search_history(self.ledger.as_ref(), query).await?)
    }

    async fn desk(&self, login: &str) -> Result<LedgerUser, OperationError> {
        self.ledger
            .find_user(&format!("{login}{DESK_LOGIN_SUFFIX}"))
            .await?
            .ok_or_else(|| OperationError::NotFound(format!("bureau de change {login}")))
    }

    async fn bank(&self, login: &str) -> Result<LedgerUser, OperationError> {
        self.ledger
            .find_user(login)
            .await?
            .ok_or_else(|| OperationError::NotFound(format!("deposit bank {login}")))
    }

    async fn bank_account(&self, login: &str) -> Result<AccountId, OperationError> {
        let bank = self.bank(login).await?;
        self.ledger
            .account_summaries(&bank.owner())
            .await?
            .into_iter()
            .next()
            .map(|summary| summary.id)
            .ok_or_else(|| OperationError::NotFound(format!("account of deposit bank {login}")))
    }

    async fn dedicated_balance(&self, account: &UserId) -> Result<Decimal, OperationError> {
        self.ledger
            .account_summaries(&AccountOwner::User(account.clone()))
            .await?
            .into_iter()
            .next()
            .map(|summary| summary.balance)
            .ok_or_else(|| OperationError::NotFound(format!("account of {account}")))
    }
}

fn of_type(postings: Vec<Posting>, payment_type: &PaymentTypeId) -> Vec<Posting> {
    postings
        .into_iter()
        .filter(|posting| &posting.payment_type == payment_type)
        .collect()
}

fn magnitude(posting: &Posting) -> Result<Amount, OperationError> {
    Ok(Amount::new(posting.magnitude())?)
}

fn required_entity<'a>(
    posting: &'a Posting,
    field: &CustomFieldId,
    role: &str,
) -> Result<&'a EntityRef, OperationError> {
    posting.linked_entity(field).ok_or_else(|| {
        OperationError::Validation(format!("posting {} has no {role}", posting.id))
    })
}

fn unexpected_type(posting: &Posting) -> OperationError {
    OperationError::Validation(format!(
        "posting {} of type {} does not belong to this selection",
        posting.id, posting.payment_type
    ))
}
