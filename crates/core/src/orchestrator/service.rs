//! Transaction orchestrator: one business intent, an ordered list of postings.
//!
//! Every operation parses and validates its input, resolves the desk and
//! the member, and runs its balance checks before the first posting. Legs
//! are then submitted one at a time; a failure after the first committed leg
//! is reported as a partial failure naming the committed postings.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use eusko_shared::types::{AccountId, Amount, Currency, UserId};

use crate::catalog::{Catalog, PaymentMode};
use crate::directory::{Member, MemberDirectory, MemberKind};
use crate::ledger::{
    AccountOwner, AccountSummary, CounterLeg, CustomValue, GeneratedTransfer, LedgerClient,
    LedgerUser, PaymentRequest,
};
use crate::operation::submission::Submission;
use crate::operation::{OperationError, OperationReport};
use crate::orchestrator::notify::SubscriptionNotifier;
use crate::orchestrator::types::{
    BankTransferExchange, DigitalExchange, DigitalSubscription, NotesMovement, NotesTransport,
    PaperExchange, PaperReconversion, SubscriptionPayment,
};

/// Suffix of the ledger login of a desk user.
pub const DESK_LOGIN_SUFFIX: &str = "_BDC";

/// Ledger login of Euskal Moneta, which collects digital subscriptions.
pub const EUSKAL_MONETA_LOGIN: &str = "Z00001";

/// A member resolved in both the ledger and the directory.
struct MemberParty {
    user: LedgerUser,
    member: Member,
}

impl MemberParty {
    fn name(&self) -> String {
        self.member.display_name()
    }
}

/// Runs multi-leg monetary operations against the ledger.
#[derive(Clone)]
pub struct TransactionOrchestrator {
    ledger: Arc<dyn LedgerClient>,
    directory: Arc<dyn MemberDirectory>,
    catalog: Arc<Catalog>,
    notifier: Arc<dyn SubscriptionNotifier>,
}

impl TransactionOrchestrator {
    /// Creates an orchestrator over its collaborators.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        directory: Arc<dyn MemberDirectory>,
        catalog: Arc<Catalog>,
        notifier: Arc<dyn SubscriptionNotifier>,
    ) -> Self {
        Self {
            ledger,
            directory,
            catalog,
            notifier,
        }
    }

    /// Euro received at a desk for paper eusko.
    ///
    /// The eusko counter-leg is created by the ledger itself when the
    /// catalog declares a fee rule on the euro leg; the report then carries
    /// its preview. Without a rule the orchestrator submits it explicitly.
    pub async fn exchange_paper(
        &self,
        request: PaperExchange,
    ) -> Result<OperationReport, OperationError> {
        let amount = request.amount.parse()?;
        let mode = exchange_mode(&request.payment_mode)?;
        let desk = self.desk(&request.desk_login).await?;
        let member = self.member(&request.member_login).await?;

        let c = &*self.catalog;
        let description = format!(
            "Change billets - {} - {} - {}",
            request.member_login,
            member.name(),
            mode.label()
        );
        let euro_leg = PaymentRequest::new(
            &c.payment_types.paper_exchange_euro,
            amount,
            c.currency_id(Currency::Euro),
            AccountOwner::System,
            desk.owner(),
        )
        .with_value(CustomValue::linked(&c.fields.member, &member.user.id))
        .with_value(CustomValue::enumerated(
            &c.fields.payment_mode,
            c.payment_mode_value(mode),
        ))
        .with_description(description.clone());

        let mut submission = Submission::start(self.ledger.as_ref(), "exchange_paper");
        submission.post("euro_leg", euro_leg).await?;

        match c.counter_leg(&c.payment_types.paper_exchange_euro) {
            CounterLeg::LedgerGenerated(rule) => {
                submission.expect_generated(GeneratedTransfer::preview(&rule, amount.value()));
            }
            CounterLeg::Orchestrated => {
                let eusko_leg = PaymentRequest::new(
                    &c.payment_types.paper_exchange_eusko,
                    amount,
                    c.currency_id(Currency::Eusko),
                    desk.owner(),
                    AccountOwner::System,
                )
                .with_value(CustomValue::linked(&c.fields.member, &member.user.id))
                .with_description(description);
                submission.post("eusko_leg", eusko_leg).await?;
            }
        }

        Ok(submission.finish())
    }

    /// Euro received at a desk, credited as digital eusko on the member account.
    pub async fn exchange_digital_at_desk(
        &self,
        request: DigitalExchange,
    ) -> Result<OperationReport, OperationError> {
        let amount = request.amount.parse()?;
        let mode = exchange_mode(&request.payment_mode)?;
        let desk = self.desk(&request.desk_login).await?;
        let member = self.member(&request.member_login).await?;

        let c = &*self.catalog;
        let euro_leg = PaymentRequest::new(
            &c.payment_types.desk_digital_exchange_euro,
            amount,
            c.currency_id(Currency::Euro),
            AccountOwner::System,
            desk.owner(),
        )
        .with_value(CustomValue::linked(&c.fields.member, &member.user.id))
        .with_value(CustomValue::enumerated(
            &c.fields.payment_mode,
            c.payment_mode_value(mode),
        ))
        .with_description(format!(
            "Change numérique - {} - {} - {}",
            request.member_login,
            member.name(),
            mode.label()
        ));
        let credit_leg = PaymentRequest::new(
            &c.payment_types.account_credit,
            amount,
            c.currency_id(Currency::Eusko),
            AccountOwner::System,
            member.user.owner(),
        )
        .with_value(CustomValue::linked(&c.fields.desk, &desk.id))
        .with_description(format!("Change numérique - {}", desk.display));

        let mut submission = Submission::start(self.ledger.as_ref(), "exchange_digital_at_desk");
        submission.post("euro_leg", euro_leg).await?;
        submission.post("account_credit", credit_leg).await?;
        Ok(submission.finish())
    }

    /// Paper notes handed in at a desk, credited on the member account.
    pub async fn deposit_digital(
        &self,
        request: NotesMovement,
    ) -> Result<OperationReport, OperationError> {
        let amount = request.amount.parse()?;
        let desk = self.desk(&request.desk_login).await?;
        let member = self.member(&request.member_login).await?;

        let c = &*self.catalog;
        let notes_leg = PaymentRequest::new(
            &c.payment_types.notes_deposit,
            amount,
            c.currency_id(Currency::Eusko),
            AccountOwner::System,
            desk.owner(),
        )
        .with_value(CustomValue::linked(&c.fields.member, &member.user.id))
        .with_description(format!("Dépôt - {} - {}", request.member_login, member.name()));
        let credit_leg = PaymentRequest::new(
            &c.payment_types.account_credit,
            amount,
            c.currency_id(Currency::Eusko),
            AccountOwner::System,
            member.user.owner(),
        )
        .with_value(CustomValue::linked(&c.fields.desk, &desk.id))
        .with_description("Dépôt");

        let mut submission = Submission::start(self.ledger.as_ref(), "deposit_digital");
        submission.post("notes_deposit", notes_leg).await?;
        submission.post("account_credit", credit_leg).await?;
        Ok(submission.finish())
    }

    /// Digital eusko debited from the member account, paid out in notes.
    ///
    /// Both the member balance and the desk note stock are checked first.
    pub async fn withdraw_digital(
        &self,
        request: NotesMovement,
    ) -> Result<OperationReport, OperationError> {
        let amount = request.amount.parse()?;
        let desk = self.desk(&request.desk_login).await?;
        let member = self.member(&request.member_login).await?;

        let c = &*self.catalog;
        let member_balance = self
            .balance(&member.user.owner(), &c.account_types.member_account)
            .await?;
        if member_balance < amount.value() {
            return Err(OperationError::InsufficientFunds(
                "error-member-not-enough-money".to_string(),
            ));
        }
        let stock = self
            .balance(&desk.owner(), &c.account_types.desk_note_stock)
            .await?;
        if stock < amount.value() {
            return Err(OperationError::InsufficientFunds(
                "error-bureau-not-enough-money".to_string(),
            ));
        }

        let debit_leg = PaymentRequest::new(
            &c.payment_types.account_debit,
            amount,
            c.currency_id(Currency::Eusko),
            member.user.owner(),
            AccountOwner::System,
        )
        .with_value(CustomValue::linked(&c.fields.desk, &desk.id))
        .with_description("Retrait");
        let notes_leg = PaymentRequest::new(
            &c.payment_types.notes_withdrawal,
            amount,
            c.currency_id(Currency::Eusko),
            desk.owner(),
            AccountOwner::System,
        )
        .with_value(CustomValue::linked(&c.fields.member, &member.user.id))
        .with_description(format!("Retrait - {} - {}", request.member_login, member.name()));

        let mut submission = Submission::start(self.ledger.as_ref(), "withdraw_digital");
        submission.post("account_debit", debit_leg).await?;
        submission.post("notes_withdrawal", notes_leg).await?;
        Ok(submission.finish())
    }

    /// Digital exchange paid by bank transfer to the dedicated account.
    pub async fn exchange_by_bank_transfer(
        &self,
        request: BankTransferExchange,
    ) -> Result<OperationReport, OperationError> {
        let amount = request.amount.parse()?;
        let reference = request.bank_reference.trim();
        if reference.is_empty() {
            return Err(OperationError::Validation(
                "bank transfer reference is required".to_string(),
            ));
        }
        let member = self.member(&request.member_login).await?;

        let c = &*self.catalog;
        let holds_account = member
            .user
            .group
            .as_ref()
            .is_some_and(|group| c.groups.holds_account(group));
        if !holds_account {
            return Err(OperationError::Validation(format!(
                "{} n'a pas de compte Eusko numérique",
                request.member_login
            )));
        }

        let euro_leg = PaymentRequest::new(
            &c.payment_types.online_exchange_euro,
            amount,
            c.currency_id(Currency::Euro),
            AccountOwner::System,
            AccountOwner::User(c.dedicated.digital.clone()),
        )
        .with_value(CustomValue::text(&c.fields.bank_reference, reference))
        .with_description("Change par virement");
        let eusko_leg = PaymentRequest::new(
            &c.payment_types.online_exchange_eusko,
            amount,
            c.currency_id(Currency::Eusko),
            AccountOwner::System,
            member.user.owner(),
        )
        .with_value(CustomValue::text(&c.fields.bank_reference, reference))
        .with_description("Change par virement");

        let mut submission = Submission::start(self.ledger.as_ref(), "exchange_by_bank_transfer");
        submission.post("euro_leg", euro_leg).await?;
        submission.post("eusko_leg", eusko_leg).await?;
        Ok(submission.finish())
    }

    /// Paper eusko handed back by a business at a desk.
    pub async fn reconvert_paper(
        &self,
        request: PaperReconversion,
    ) -> Result<OperationReport, OperationError> {
        let amount = request.amount.parse()?;
        let desk = self.desk(&request.desk_login).await?;
        let member = self.member(&request.member_login).await?;
        if member.member.kind == MemberKind::Individual {
            return Err(OperationError::Forbidden(
                "reconversion is not available for non-business members".to_string(),
            ));
        }

        let c = &*self.catalog;
        let leg = PaymentRequest::new(
            &c.payment_types.paper_reconversion,
            amount,
            c.currency_id(Currency::Eusko),
            AccountOwner::System,
            desk.owner(),
        )
        .with_value(CustomValue::linked(&c.fields.member, &member.user.id))
        .with_value(CustomValue::text(
            &c.fields.invoice_number,
            request.invoice_number.trim(),
        ))
        .with_description(format!(
            "Reconversion - {} - {}",
            request.member_login,
            member.name()
        ));

        let mut submission = Submission::start(self.ledger.as_ref(), "reconvert_paper");
        submission.post("paper_reconversion", leg).await?;
        Ok(submission.finish())
    }

    /// Membership subscription paid at a desk.
    ///
    /// Management is notified in the background once the posting is
    /// committed; a notification failure is logged and nothing else.
    pub async fn pay_subscription(
        &self,
        request: SubscriptionPayment,
    ) -> Result<OperationReport, OperationError> {
        let amount = request.amount.parse()?;
        let mode = PaymentMode::parse(&request.payment_mode).ok_or_else(|| {
            OperationError::Validation(format!("unknown payment mode {}", request.payment_mode))
        })?;
        let desk = self.desk(&request.desk_login).await?;
        let member = self.member(&request.member_login).await?;

        let c = &*self.catalog;
        let name = member.name();
        let leg = match mode.currency() {
            Currency::Eusko => PaymentRequest::new(
                &c.payment_types.eusko_subscription,
                amount,
                c.currency_id(Currency::Eusko),
                AccountOwner::System,
                desk.owner(),
            )
            .with_value(CustomValue::linked(&c.fields.member, &member.user.id))
            .with_description(format!("Cotisation - {} - {name}", request.member_login)),
            Currency::Euro => PaymentRequest::new(
                &c.payment_types.euro_subscription,
                amount,
                c.currency_id(Currency::Euro),
                AccountOwner::System,
                desk.owner(),
            )
            .with_value(CustomValue::linked(&c.fields.member, &member.user.id))
            .with_value(CustomValue::enumerated(
                &c.fields.payment_mode,
                c.payment_mode_value(mode),
            ))
            .with_description(format!(
                "Cotisation - {} - {name} - {}",
                request.member_login,
                mode.label()
            )),
        };

        let mut submission = Submission::start(self.ledger.as_ref(), "pay_subscription");
        submission.post("subscription", leg).await?;
        let report = submission.finish();

        let notifier = Arc::clone(&self.notifier);
        let login = request.member_login;
        let shown_amount = format!("{amount} {}", mode.currency());
        tokio::spawn(async move {
            if let Err(e) = notifier
                .subscription_paid(&login, &name, &shown_amount, mode.label())
                .await
            {
                warn!(member = %login, error = %e, "Subscription notification failed");
            }
        });

        Ok(report)
    }

    /// Membership subscription paid in digital eusko.
    ///
    /// The member pays Euskal Moneta directly from their account; no desk
    /// is involved and nobody is notified.
    pub async fn pay_subscription_digital(
        &self,
        request: DigitalSubscription,
    ) -> Result<OperationReport, OperationError> {
        let amount = request.amount.parse()?;
        let member = self.member(&request.member_login).await?;
        let collector = self
            .ledger
            .find_user(EUSKAL_MONETA_LOGIN)
            .await?
            .ok_or_else(|| {
                OperationError::NotFound(format!("member {EUSKAL_MONETA_LOGIN} in the ledger"))
            })?;

        let c = &*self.catalog;
        let balance = self
            .balance(&member.user.owner(), &c.account_types.member_account)
            .await?;
        if balance < amount.value() {
            return Err(OperationError::InsufficientFunds(
                "error-member-not-enough-money".to_string(),
            ));
        }

        let leg = PaymentRequest::new(
            &c.payment_types.member_transfer,
            amount,
            c.currency_id(Currency::Eusko),
            member.user.owner(),
            collector.owner(),
        )
        .with_description(format!(
            "Cotisation - {} - {}",
            request.member_login,
            member.name()
        ));

        let mut submission = Submission::start(self.ledger.as_ref(), "pay_subscription_digital");
        submission.post("subscription", leg).await?;
        Ok(submission.finish())
    }

    /// Notes leaving a desk stock with a carrier.
    pub async fn stock_out(
        &self,
        request: NotesTransport,
    ) -> Result<OperationReport, OperationError> {
        let amount = request.amount.parse()?;
        let desk = self.desk(&request.desk_login).await?;

        let c = &*self.catalog;
        let leg = PaymentRequest::new(
            &c.payment_types.stock_out,
            amount,
            c.currency_id(Currency::Eusko),
            desk.owner(),
            AccountOwner::System,
        )
        .with_value(CustomValue::linked(&c.fields.carrier, &request.carrier))
        .with_description(request.description);

        let mut submission = Submission::start(self.ledger.as_ref(), "stock_out");
        submission.post("stock_out", leg).await?;
        Ok(submission.finish())
    }

    /// Notes leaving the central vault for a desk.
    pub async fn vault_out(
        &self,
        request: NotesTransport,
    ) -> Result<OperationReport, OperationError> {
        let amount = request.amount.parse()?;
        let desk = self.desk(&request.desk_login).await?;

        let c = &*self.catalog;
        let leg = PaymentRequest::new(
            &c.payment_types.vault_out,
            amount,
            c.currency_id(Currency::Eusko),
            AccountOwner::System,
            AccountOwner::System,
        )
        .with_value(CustomValue::linked(&c.fields.desk, &desk.id))
        .with_value(CustomValue::linked(&c.fields.carrier, &request.carrier))
        .with_description(request.description);

        let mut submission = Submission::start(self.ledger.as_ref(), "vault_out");
        submission.post("vault_out", leg).await?;
        Ok(submission.finish())
    }

    /// Balances of every account of a desk.
    pub async fn desk_accounts(&self, desk_login: &str) -> Result<Vec<AccountSummary>, OperationError> {
        let desk = self.desk(desk_login).await?;
        Ok(self.ledger.account_summaries(&desk.owner()).await?)
    }

    async fn desk(&self, login: &str) -> Result<LedgerUser, OperationError> {
        let desk_login = format!("{login}{DESK_LOGIN_SUFFIX}");
        let desk = self
            .ledger
            .find_user(&desk_login)
            .await?
            .ok_or_else(|| OperationError::NotFound(format!("bureau de change {login}")))?;
        debug!(desk = %desk_login, id = %desk.id, "Desk resolved");
        Ok(desk)
    }

    async fn member(&self, login: &str) -> Result<MemberParty, OperationError> {
        let user = self
            .ledger
            .find_user(login)
            .await?
            .ok_or_else(|| OperationError::NotFound(format!("member {login} in the ledger")))?;
        let member = self
            .directory
            .member_by_login(login)
            .await?
            .ok_or_else(|| OperationError::NotFound(format!("member {login} in the directory")))?;
        debug!(member = %login, id = %user.id, "Member resolved");
        Ok(MemberParty { user, member })
    }

    async fn balance(
        &self,
        owner: &AccountOwner,
        account_type: &AccountId,
    ) -> Result<Decimal, OperationError> {
        self.ledger
            .account_summaries(owner)
            .await?
            .into_iter()
            .find(|summary| &summary.account_type == account_type)
            .map(|summary| summary.balance)
            .ok_or_else(|| {
                let holder = owner.user_id().map_or("SYSTEM", UserId::as_str);
                OperationError::NotFound(format!("account {account_type} of {holder}"))
            })
    }
}

/// Exchanges are paid in euro: cash or cheque.
fn exchange_mode(raw: &str) -> Result<PaymentMode, OperationError> {
    match PaymentMode::parse(raw) {
        Some(mode) if mode.currency() == Currency::Euro => Ok(mode),
        Some(mode) => Err(OperationError::Validation(format!(
            "payment mode {mode} is not accepted for an exchange"
        ))),
        None => Err(OperationError::Validation(format!(
            "unknown payment mode {raw}"
        ))),
    }
}
