//! Donation allocator.

use std::sync::Arc;

use tracing::{debug, info, warn};

use eusko_shared::DonationConfig;
use eusko_shared::types::PaymentTypeId;

use crate::catalog::Catalog;
use crate::directory::{Member, MemberDirectory};
use crate::donation::allocation::Allocation;
use crate::donation::types::{DonationPeriod, DonationReport, Exchange};
use crate::ledger::{
    Direction, HistoryQuery, LedgerClient, Period, Posting, search_history,
};
use crate::operation::OperationError;

/// Where the exchanging member is recorded on a posting.
#[derive(Debug, Clone, Copy)]
enum MemberSource {
    /// The `adherent` custom field.
    MemberField,
    /// The owner of the account on the other side.
    RelatedOwner,
}

/// Computes the donations owed to associations over a window.
#[derive(Clone)]
pub struct DonationAllocator {
    ledger: Arc<dyn LedgerClient>,
    directory: Arc<dyn MemberDirectory>,
    catalog: Arc<Catalog>,
    config: DonationConfig,
}

impl DonationAllocator {
    /// Creates an allocator.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        directory: Arc<dyn MemberDirectory>,
        catalog: Arc<Catalog>,
        config: DonationConfig,
    ) -> Self {
        Self {
            ledger,
            directory,
            catalog,
            config,
        }
    }

    /// Calculates donations for the exchanges made between `begin` and
    /// `end`, both included.
    ///
    /// # Errors
    ///
    /// Fails if the window is reversed, if the ledger is unavailable or if
    /// the association list cannot be loaded. Unknown members are not
    /// errors: their donations go to the default association.
    pub async fn allocate(&self, period: DonationPeriod) -> Result<DonationReport, OperationError> {
        if period.end < period.begin {
            return Err(OperationError::Validation(format!(
                "donation window ends ({}) before it begins ({})",
                period.end, period.begin
            )));
        }
        let exchanges = self.exchanges(period).await?;
        let associations = self.directory.associations().await?;
        debug!(
            exchanges = exchanges.len(),
            associations = associations.len(),
            "Donation inputs loaded"
        );

        let mut allocation = Allocation::new(&associations, &self.config);
        for exchange in &exchanges {
            let beneficiary = match allocation.beneficiary(&exchange.member_login) {
                Some(known) => known.to_string(),
                None => {
                    let member = self.member(&exchange.member_login).await;
                    allocation.resolve(&exchange.member_login, member.as_ref())
                }
            };
            allocation.credit(&beneficiary, exchange.amount);
        }

        let report = allocation.into_report(period);
        info!(
            begin = %report.begin,
            end = %report.end,
            total_exchanged = %report.total_exchanged,
            total_donated = %report.total_donated,
            "Donations calculated"
        );
        Ok(report)
    }

    /// Collects the euro to eusko exchanges of the window.
    async fn exchanges(&self, period: DonationPeriod) -> Result<Vec<Exchange>, OperationError> {
        let c = &*self.catalog;
        let end = period.end.succ_opt().ok_or_else(|| {
            OperationError::Validation(format!("invalid end date {}", period.end))
        })?;
        let window = Period {
            begin: period.begin,
            end,
        };

        let euro_debit = HistoryQuery::account(c.system_accounts.euro_debit.clone())
            .direction(Direction::Debit)
            .period(window);
        let digital_debit = HistoryQuery::account(c.system_accounts.digital_debit.clone())
            .direction(Direction::Debit)
            .period(window);

        let mut exchanges = Vec::new();
        let desk_postings = self.search(&euro_debit).await?;
        self.collect(
            &desk_postings,
            &[
                &c.payment_types.paper_exchange_euro,
                &c.payment_types.desk_digital_exchange_euro,
            ],
            MemberSource::MemberField,
            &mut exchanges,
        )
        .await?;
        let online_postings = self.search(&digital_debit).await?;
        self.collect(
            &online_postings,
            &[&c.payment_types.online_exchange_eusko],
            MemberSource::RelatedOwner,
            &mut exchanges,
        )
        .await?;
        Ok(exchanges)
    }

    /// Keeps effective postings of the given types.
    async fn collect(
        &self,
        postings: &[Posting],
        payment_types: &[&PaymentTypeId],
        source: MemberSource,
        exchanges: &mut Vec<Exchange>,
    ) -> Result<(), OperationError> {
        for posting in postings {
            if !payment_types.contains(&&posting.payment_type) {
                continue;
            }
            if let Some(transaction) = &posting.transaction_id {
                if !self.ledger.get_transaction(transaction).await?.is_effective() {
                    debug!(posting_id = %posting.id, "Charged back exchange skipped");
                    continue;
                }
            }
            let member = match source {
                MemberSource::MemberField => posting.linked_entity(&self.catalog.fields.member),
                MemberSource::RelatedOwner => posting.related_owner.as_ref(),
            };
            let Some(member) = member else {
                warn!(posting_id = %posting.id, "Exchange without member skipped");
                continue;
            };
            exchanges.push(Exchange {
                member_login: member.short_display.clone(),
                amount: posting.magnitude(),
            });
        }
        Ok(())
    }

    async fn search(&self, query: &HistoryQuery) -> Result<Vec<Posting>, OperationError> {
        Ok(search_history(self.ledger.as_ref(), query).await?)
    }

    /// Directory lookup where any failure counts as an unknown member.
    async fn member(&self, login: &str) -> Option<Member> {
        match self.directory.member_by_login(login).await {
            Ok(member) => member,
            Err(err) => {
                warn!(login, error = %err, "Member lookup failed, using default association");
                None
            }
        }
    }
}
