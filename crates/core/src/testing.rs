//! In-memory collaborators for tests.
//!
//! `InMemoryLedger` records every call and answers history searches and
//! transfer loads from postings registered up front. Successful status
//! changes are applied, so a replayed batch sees the moved statuses.
//! Failures can be injected on the n-th payment or status change. The catalog fixture uses each internal name
//! as the identifier, which keeps assertions readable.

#![allow(missing_docs, clippy::missing_panics_doc)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use eusko_shared::EmailError;
use eusko_shared::types::{
    AccountId, Currency, CurrencyId, CustomFieldId, EnumeratedValueId, GroupId, PaymentTypeId,
    PostingId, StatusFlowId, StatusId, TransactionId, UserId,
};

use crate::catalog::{
    AccountTypes, Catalog, Currencies, CustomFields, DedicatedAccounts, Groups, PaymentModeValues,
    PaymentTypes, StatusFlowIds, Statuses, SystemAccounts,
};
use crate::directory::{Association, DirectoryError, Member, MemberDirectory, MemberKind};
use crate::ledger::{
    AccountOwner, AccountSummary, ChargeMode, Direction, EntityRef, FeeParty, FeeRule,
    HistoryPage, HistoryQuery, LedgerClient, LedgerError, LedgerUser, Nature, PaymentRequest,
    Posting, TransactionRecord,
};
use crate::orchestrator::SubscriptionNotifier;
use crate::workflow::FlowKind;

/// Catalog whose identifiers are the provisioning internal names.
#[must_use]
pub fn catalog() -> Catalog {
    let pt = PaymentTypeId::new;
    let field = CustomFieldId::new;
    Catalog {
        currencies: Currencies {
            eusko: CurrencyId::new("eusko"),
            euro: CurrencyId::new("euro"),
        },
        system_accounts: SystemAccounts {
            euro_debit: AccountId::new("compte_de_debit_euro"),
            digital_debit: AccountId::new("compte_de_debit_eusko_numerique"),
            transit: AccountId::new("compte_de_transit"),
            notes_in_circulation: AccountId::new("compte_des_billets_en_circulation"),
        },
        account_types: AccountTypes {
            desk_note_stock: AccountId::new("stock_de_billets_bdc"),
            desk_euro_till: AccountId::new("caisse_euro_bdc"),
            member_account: AccountId::new("compte_d_adherent"),
        },
        dedicated: DedicatedAccounts {
            paper: UserId::new("compte_dedie_eusko_billet"),
            digital: UserId::new("compte_dedie_eusko_numerique"),
        },
        groups: Groups {
            business_members: GroupId::new("adherents_prestataires"),
            individual_members: GroupId::new("adherents_utilisateurs"),
        },
        payment_types: PaymentTypes {
            paper_exchange_euro: pt("change_billets_versement_des_euro"),
            paper_exchange_eusko: pt("change_billets_versement_des_eusko"),
            desk_digital_exchange_euro: pt("change_numerique_en_bdc_versement_des_euro"),
            online_exchange_euro: pt("change_numerique_en_ligne_versement_des_euro"),
            online_exchange_eusko: pt("change_numerique_en_ligne_versement_des_eusko"),
            account_credit: pt("credit_du_compte"),
            account_debit: pt("retrait_du_compte"),
            notes_deposit: pt("depot_de_billets"),
            notes_withdrawal: pt("retrait_de_billets"),
            paper_reconversion: pt("reconversion_billets_versement_des_eusko"),
            digital_reconversion: pt("reconversion_numerique"),
            euro_subscription: pt("cotisation_en_euro"),
            eusko_subscription: pt("cotisation_en_eusko"),
            euro_sale: pt("vente_en_euro"),
            bank_deposit: pt("depot_en_banque"),
            short_deposit_adjustment: pt("regularisation_depot_insuffisant"),
            excess_deposit_adjustment: pt("regularisation_depot_excessif"),
            bank_to_desk_till: pt("paiement_de_banque_de_depot_vers_caisse_euro_bdc"),
            desk_till_to_bank: pt("paiement_de_caisse_euro_bdc_vers_banque_de_depot"),
            bank_to_euro_debit: pt("virement_de_banque_de_depot_vers_compte_debit_euro"),
            bank_to_dedicated: pt("virement_de_banque_de_depot_vers_compte_dedie"),
            dedicated_to_euro_debit: pt("virement_de_compte_dedie_vers_compte_debit_euro"),
            between_dedicated: pt("virement_entre_comptes_dedies"),
            stock_in: pt("entree_stock_bdc"),
            stock_out: pt("sortie_stock_bdc"),
            vault_in: pt("entree_coffre"),
            vault_out: pt("sortie_coffre"),
            till_euro_remittance: pt("remise_d_euro_en_caisse"),
            till_eusko_out: pt("sortie_caisse_eusko_bdc"),
            returned_eusko_out: pt("sortie_retours_eusko_bdc"),
            member_transfer: pt("virement_inter_adherent"),
        },
        fields: CustomFields {
            member: field("adherent"),
            optional_member: field("adherent_facultatif"),
            desk: field("bdc"),
            payment_mode: field("mode_de_paiement"),
            paper_exchange_total: field("montant_changes_billet"),
            digital_exchange_total: field("montant_changes_numerique"),
            subscriptions_total: field("montant_cotisations"),
            sales_total: field("montant_ventes"),
            deposit_slip: field("numero_de_bordereau"),
            invoice_number: field("numero_de_facture"),
            bank_reference: field("numero_de_transaction_banque"),
            carrier: field("porteur"),
        },
        payment_modes: PaymentModeValues {
            cash: EnumeratedValueId::new("especes"),
            cheque: EnumeratedValueId::new("cheque"),
        },
        statuses: Statuses {
            to_reconcile: StatusId::new("a_rapprocher"),
            reconciled: StatusId::new("rapproche"),
            to_remit: StatusId::new("a_remettre_a_euskal_moneta"),
            remitted: StatusId::new("remis_a_euskal_moneta"),
            transfers_due: StatusId::new("virements_a_faire"),
            transfers_done: StatusId::new("virements_faits"),
        },
        status_flows: StatusFlowIds {
            reconciliation: StatusFlowId::new("rapprochement"),
            remittance: StatusFlowId::new("remise_a_euskal_moneta"),
            transfers: StatusFlowId::new("virements"),
        },
        fee_rules: vec![FeeRule {
            payment_type: pt("change_billets_versement_des_euro"),
            generated_payment_type: pt("change_billets_versement_des_eusko"),
            charge: ChargeMode::Percentage(Decimal::ONE),
            payer: FeeParty::Destination,
            receiver: FeeParty::System,
            currency: Currency::Eusko,
        }],
    }
}

/// Fixed timestamp used by posting fixtures: 2024-03-15 10:00 UTC.
#[must_use]
pub fn fixture_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A bare posting; tests fill in statuses and custom values.
#[must_use]
pub fn posting(id: &str, payment_type: &PaymentTypeId, amount: Decimal) -> Posting {
    Posting {
        id: PostingId::new(id),
        transaction_id: Some(TransactionId::new(format!("t{id}"))),
        date: fixture_date(),
        amount,
        payment_type: payment_type.clone(),
        description: String::new(),
        custom_values: vec![],
        statuses: vec![],
        related_owner: None,
    }
}

#[must_use]
pub fn entity(id: &str, short_display: &str, display: &str) -> EntityRef {
    EntityRef {
        id: UserId::new(id),
        short_display: short_display.to_string(),
        display: display.to_string(),
    }
}

#[must_use]
pub fn member(login: &str, kind: MemberKind) -> Member {
    Member {
        id: format!("m-{login}"),
        login: login.to_string(),
        kind,
        firstname: "Jon".to_string(),
        lastname: "Etxeberri".to_string(),
        company: None,
        email: Some(format!("{}@example.org", login.to_lowercase())),
        first_choice_association: None,
        second_choice_association: None,
    }
}

#[must_use]
pub fn association(id: &str, member_number: &str, name: &str, sponsors: u32) -> Association {
    Association {
        id: id.to_string(),
        member_number: member_number.to_string(),
        name: name.to_string(),
        sponsorship_count: sponsors,
    }
}

/// A call received by [`InMemoryLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Perform(PaymentRequest),
    ChangeStatus { posting: PostingId, status: StatusId },
    SearchHistory(HistoryQuery),
    LoadPosting(PostingId),
    GetTransaction(TransactionId),
    AccountSummaries(AccountOwner),
    FindUser(String),
}

struct StoredPosting {
    account: AccountId,
    from_nature: Option<Nature>,
    to_nature: Option<Nature>,
    posting: Posting,
}

impl StoredPosting {
    fn matches(&self, query: &HistoryQuery, posting: &Posting) -> bool {
        let direction_ok = match query.direction {
            Some(Direction::Credit) => posting.amount > Decimal::ZERO,
            Some(Direction::Debit) => posting.amount < Decimal::ZERO,
            None => true,
        };
        let period_ok = query.period.is_none_or(|period| {
            let day = posting.date.date_naive();
            day >= period.begin && day <= period.end
        });
        let nature_ok = |wanted: Option<Nature>, stored: Option<Nature>| match (wanted, stored) {
            (Some(wanted), Some(stored)) => wanted == stored,
            _ => true,
        };

        self.account == query.account
            && direction_ok
            && period_ok
            && query.statuses.iter().all(|status| posting.has_status(status))
            && nature_ok(query.from_nature, self.from_nature)
            && nature_ok(query.to_nature, self.to_nature)
    }
}

#[derive(Default)]
struct LedgerState {
    calls: Vec<LedgerCall>,
    performs: usize,
    status_changes: usize,
    /// Statuses after applied changes, overriding the registered ones.
    statuses: HashMap<PostingId, Vec<StatusId>>,
}

/// Ledger double.
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
    history: Vec<StoredPosting>,
    transfers: Vec<Posting>,
    transactions: HashMap<TransactionId, TransactionRecord>,
    summaries: Vec<(AccountOwner, AccountSummary)>,
    users: HashMap<String, LedgerUser>,
    page_size: Option<u32>,
    failing_perform: Option<usize>,
    failing_change_status: Option<usize>,
    unreachable: bool,
}

impl InMemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user; `group` is the member group, if any.
    #[must_use]
    pub fn with_user(mut self, login: &str, id: &str, group: Option<&str>) -> Self {
        self.users.insert(
            login.to_string(),
            LedgerUser {
                id: UserId::new(id),
                login: login.to_string(),
                display: format!("{login} display"),
                group: group.map(GroupId::new),
            },
        );
        self
    }

    /// Registers a desk user `{login}_BDC` with id `{login}`.
    #[must_use]
    pub fn with_desk(self, login: &str) -> Self {
        self.with_user(&format!("{login}_BDC"), login, None)
    }

    #[must_use]
    pub fn with_history(self, account: &AccountId, posting: Posting) -> Self {
        self.with_history_natures(account, None, None, posting)
    }

    #[must_use]
    pub fn with_history_natures(
        mut self,
        account: &AccountId,
        from_nature: Option<Nature>,
        to_nature: Option<Nature>,
        posting: Posting,
    ) -> Self {
        self.history.push(StoredPosting {
            account: account.clone(),
            from_nature,
            to_nature,
            posting,
        });
        self
    }

    /// Registers a transfer that only answers loads, outside any history.
    #[must_use]
    pub fn with_posting(mut self, posting: Posting) -> Self {
        self.transfers.push(posting);
        self
    }

    #[must_use]
    pub fn with_transaction(mut self, id: &TransactionId, record: TransactionRecord) -> Self {
        self.transactions.insert(id.clone(), record);
        self
    }

    /// Registers an account of `owner` with the given type and balance.
    #[must_use]
    pub fn with_account(
        mut self,
        owner: AccountOwner,
        account_type: &AccountId,
        currency: &str,
        balance: Decimal,
    ) -> Self {
        let id = match &owner {
            AccountOwner::System => format!("system-{account_type}"),
            AccountOwner::User(user) => format!("{user}-{account_type}"),
        };
        self.summaries.push((
            owner,
            AccountSummary {
                id: AccountId::new(id),
                account_type: account_type.clone(),
                account_type_name: account_type.to_string(),
                currency: CurrencyId::new(currency),
                balance,
            },
        ));
        self
    }

    /// Serves history searches in pages of at most `size` items.
    #[must_use]
    pub const fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Makes the n-th payment (from 1) fail.
    #[must_use]
    pub const fn failing_perform(mut self, nth: usize) -> Self {
        self.failing_perform = Some(nth);
        self
    }

    /// Makes the n-th status change (from 1) fail.
    #[must_use]
    pub const fn failing_change_status(mut self, nth: usize) -> Self {
        self.failing_change_status = Some(nth);
        self
    }

    /// Makes every call fail.
    #[must_use]
    pub const fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Payments received, in order, including failed ones.
    #[must_use]
    pub fn performed(&self) -> Vec<PaymentRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                LedgerCall::Perform(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    /// Status changes received, in order, including failed ones.
    #[must_use]
    pub fn status_changes(&self) -> Vec<(PostingId, StatusId)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                LedgerCall::ChangeStatus { posting, status } => Some((posting, status)),
                _ => None,
            })
            .collect()
    }

    /// True if no payment or status change was sent.
    #[must_use]
    pub fn nothing_submitted(&self) -> bool {
        self.calls().iter().all(|call| {
            !matches!(
                call,
                LedgerCall::Perform(_) | LedgerCall::ChangeStatus { .. }
            )
        })
    }

    /// Current statuses of a posting, after the changes applied so far.
    #[must_use]
    pub fn statuses_of(&self, id: &str) -> Vec<StatusId> {
        let id = PostingId::new(id);
        let state = self.state.lock().unwrap();
        self.lookup(&id)
            .map(|posting| self.current(posting, &state).statuses)
            .unwrap_or_default()
    }

    fn lookup(&self, id: &PostingId) -> Option<&Posting> {
        self.transfers
            .iter()
            .chain(self.history.iter().map(|stored| &stored.posting))
            .find(|posting| &posting.id == id)
    }

    fn current(&self, posting: &Posting, state: &LedgerState) -> Posting {
        let mut posting = posting.clone();
        if let Some(statuses) = state.statuses.get(&posting.id) {
            posting.statuses.clone_from(statuses);
        }
        posting
    }

    fn record(&self, call: LedgerCall, name: &str) -> Result<(), LedgerError> {
        self.state.lock().unwrap().calls.push(call);
        if self.unreachable {
            return Err(LedgerError::new(name, "connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    async fn perform(&self, request: &PaymentRequest) -> Result<PostingId, LedgerError> {
        self.record(LedgerCall::Perform(request.clone()), "payment/perform")?;
        let mut state = self.state.lock().unwrap();
        state.performs += 1;
        if self.failing_perform == Some(state.performs) {
            return Err(LedgerError::new("payment/perform", "VALIDATION"));
        }
        Ok(PostingId::new(format!("p{}", state.performs)))
    }

    async fn change_status(
        &self,
        posting: &PostingId,
        new_status: &StatusId,
    ) -> Result<(), LedgerError> {
        self.record(
            LedgerCall::ChangeStatus {
                posting: posting.clone(),
                status: new_status.clone(),
            },
            "transferStatus/changeStatus",
        )?;
        let mut state = self.state.lock().unwrap();
        state.status_changes += 1;
        if self.failing_change_status == Some(state.status_changes) {
            return Err(LedgerError::new("transferStatus/changeStatus", "VALIDATION"));
        }

        let fixture = catalog();
        let flow = [
            FlowKind::Reconciliation,
            FlowKind::Remittance,
            FlowKind::Transfers,
        ]
        .into_iter()
        .map(|kind| fixture.flow(kind))
        .find(|flow| flow.contains(new_status));
        let before = match state.statuses.get(posting) {
            Some(statuses) => statuses.clone(),
            None => self
                .lookup(posting)
                .map(|found| found.statuses.clone())
                .unwrap_or_default(),
        };
        let mut after: Vec<StatusId> = before
            .into_iter()
            .filter(|status| flow.as_ref().is_none_or(|flow| !flow.contains(status)))
            .collect();
        after.push(new_status.clone());
        state.statuses.insert(posting.clone(), after);
        Ok(())
    }

    async fn search_history_page(
        &self,
        query: &HistoryQuery,
        page: u32,
        page_size: u32,
    ) -> Result<HistoryPage, LedgerError> {
        self.record(
            LedgerCall::SearchHistory(query.clone()),
            "account/searchAccountHistory",
        )?;
        let state = self.state.lock().unwrap();
        let mut matching: Vec<Posting> = self
            .history
            .iter()
            .map(|stored| (stored, self.current(&stored.posting, &state)))
            .filter(|(stored, posting)| stored.matches(query, posting))
            .map(|(_, posting)| posting)
            .collect();
        drop(state);
        matching.sort_by(|a, b| b.date.cmp(&a.date));

        let size = self.page_size.unwrap_or(page_size).max(1) as usize;
        let total = matching.len();
        let page_count = total.div_ceil(size);
        let items = matching
            .into_iter()
            .skip(page as usize * size)
            .take(size)
            .collect();

        Ok(HistoryPage {
            items,
            total_count: total as u64,
            page_count: u32::try_from(page_count).unwrap_or(u32::MAX),
        })
    }

    async fn load_posting(&self, posting: &PostingId) -> Result<Option<Posting>, LedgerError> {
        self.record(LedgerCall::LoadPosting(posting.clone()), "transfer/load")?;
        let state = self.state.lock().unwrap();
        Ok(self.lookup(posting).map(|found| {
            let mut loaded = self.current(found, &state);
            loaded.amount = loaded.amount.abs();
            loaded
        }))
    }

    async fn get_transaction(
        &self,
        transaction: &TransactionId,
    ) -> Result<TransactionRecord, LedgerError> {
        self.record(
            LedgerCall::GetTransaction(transaction.clone()),
            "transaction/getData",
        )?;
        self.transactions
            .get(transaction)
            .cloned()
            .ok_or_else(|| LedgerError::new("transaction/getData", "ENTITY_NOT_FOUND"))
    }

    async fn account_summaries(
        &self,
        owner: &AccountOwner,
    ) -> Result<Vec<AccountSummary>, LedgerError> {
        self.record(
            LedgerCall::AccountSummaries(owner.clone()),
            "account/getAccountsSummary",
        )?;
        Ok(self
            .summaries
            .iter()
            .filter(|(candidate, _)| candidate == owner)
            .map(|(_, summary)| summary.clone())
            .collect())
    }

    async fn find_user(&self, login: &str) -> Result<Option<LedgerUser>, LedgerError> {
        self.record(LedgerCall::FindUser(login.to_string()), "user/search")?;
        Ok(self.users.get(login).cloned())
    }
}

/// Directory double.
#[derive(Default)]
pub struct InMemoryDirectory {
    members: HashMap<String, Member>,
    associations: Vec<Association>,
    failing_logins: HashSet<String>,
    unreachable: bool,
    lookups: Mutex<Vec<String>>,
}

impl InMemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.insert(member.login.clone(), member);
        self
    }

    #[must_use]
    pub fn with_association(mut self, association: Association) -> Self {
        self.associations.push(association);
        self
    }

    /// Makes lookups of this login fail.
    #[must_use]
    pub fn failing_member(mut self, login: &str) -> Self {
        self.failing_logins.insert(login.to_string());
        self
    }

    #[must_use]
    pub const fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Logins looked up, in order.
    #[must_use]
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl MemberDirectory for InMemoryDirectory {
    async fn member_by_login(&self, login: &str) -> Result<Option<Member>, DirectoryError> {
        self.lookups.lock().unwrap().push(login.to_string());
        if self.unreachable || self.failing_logins.contains(login) {
            return Err(DirectoryError::new("members", "connection refused"));
        }
        Ok(self.members.get(login).cloned())
    }

    async fn associations(&self) -> Result<Vec<Association>, DirectoryError> {
        if self.unreachable {
            return Err(DirectoryError::new("associations", "connection refused"));
        }
        Ok(self.associations.clone())
    }
}

/// A subscription notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub member_login: String,
    pub member_name: String,
    pub amount: String,
    pub payment_mode: String,
}

/// Notifier double; optionally fails every send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentNotification>>,
    failing: bool,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubscriptionNotifier for RecordingNotifier {
    async fn subscription_paid(
        &self,
        member_login: &str,
        member_name: &str,
        amount: &str,
        payment_mode: &str,
    ) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(SentNotification {
            member_login: member_login.to_string(),
            member_name: member_name.to_string(),
            amount: amount.to_string(),
            payment_mode: payment_mode.to_string(),
        });
        if self.failing {
            return Err(EmailError::SendError("smtp unreachable".to_string()));
        }
        Ok(())
    }
}
