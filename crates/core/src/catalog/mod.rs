//! Payment type catalog.
//!
//! Maps business roles to the identifiers provisioned in the ledger. The
//! catalog is loaded once at start-up, never mutated, and handed to each
//! component at construction.
//!
//! # Modules
//!
//! - `types` - Identifier groups (payment types, fields, statuses, ...)
//! - `payment_mode` - Desk payment modes
//! - `error` - Loading errors

pub mod error;
pub mod payment_mode;
pub mod types;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use eusko_shared::types::{Currency, CurrencyId, EnumeratedValueId, PaymentTypeId};

use crate::ledger::{CounterLeg, FeeRule};
use crate::workflow::{FlowKind, StatusFlow};

pub use error::CatalogError;
pub use payment_mode::PaymentMode;
pub use types::{
    AccountTypes, Currencies, CustomFields, DedicatedAccounts, Groups, PaymentModeValues,
    PaymentTypes, StatusFlowIds, Statuses, SystemAccounts,
};

/// Identifiers provisioned in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Currencies.
    pub currencies: Currencies,
    /// System accounts.
    pub system_accounts: SystemAccounts,
    /// User account types.
    pub account_types: AccountTypes,
    /// Dedicated account holders.
    #[serde(rename = "users")]
    pub dedicated: DedicatedAccounts,
    /// User groups.
    pub groups: Groups,
    /// Payment types.
    pub payment_types: PaymentTypes,
    /// Transaction custom fields.
    #[serde(rename = "transaction_custom_fields")]
    pub fields: CustomFields,
    /// Payment mode values.
    pub payment_modes: PaymentModeValues,
    /// Transfer statuses.
    #[serde(rename = "transfer_statuses")]
    pub statuses: Statuses,
    /// Status flows.
    pub status_flows: StatusFlowIds,
    /// Transfer fees configured on payment types.
    #[serde(default)]
    pub fee_rules: Vec<FeeRule>,
}

impl Catalog {
    /// Loads the catalog from a file (`.toml`, `.json` or `.yaml`, extension optional).
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, malformed or inconsistent.
    pub fn load(path: &str) -> Result<Self, CatalogError> {
        let catalog: Self = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?
            .try_deserialize()?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Checks that fee rules are unambiguous.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for rule in &self.fee_rules {
            if !seen.insert(&rule.payment_type) {
                return Err(CatalogError::Invalid(format!(
                    "payment type {} has more than one fee rule",
                    rule.payment_type
                )));
            }
            if rule.payment_type == rule.generated_payment_type {
                return Err(CatalogError::Invalid(format!(
                    "fee rule on {} generates its own payment type",
                    rule.payment_type
                )));
            }
        }
        Ok(())
    }

    /// Ledger id of a currency.
    #[must_use]
    pub fn currency_id(&self, currency: Currency) -> &CurrencyId {
        match currency {
            Currency::Eusko => &self.currencies.eusko,
            Currency::Euro => &self.currencies.euro,
        }
    }

    /// Enumerated value of a payment mode.
    #[must_use]
    pub fn payment_mode_value(&self, mode: PaymentMode) -> &EnumeratedValueId {
        match mode {
            PaymentMode::EuroCash | PaymentMode::EuskoCash => &self.payment_modes.cash,
            PaymentMode::EuroCheque => &self.payment_modes.cheque,
        }
    }

    /// A status flow with its graph.
    #[must_use]
    pub fn flow(&self, kind: FlowKind) -> StatusFlow {
        let (id, pending, done) = match kind {
            FlowKind::Reconciliation => (
                &self.status_flows.reconciliation,
                &self.statuses.to_reconcile,
                &self.statuses.reconciled,
            ),
            FlowKind::Remittance => (
                &self.status_flows.remittance,
                &self.statuses.to_remit,
                &self.statuses.remitted,
            ),
            FlowKind::Transfers => (
                &self.status_flows.transfers,
                &self.statuses.transfers_due,
                &self.statuses.transfers_done,
            ),
        };
        StatusFlow::linear(kind, id.clone(), pending.clone(), done.clone())
    }

    /// Who issues the counter-leg of a payment type.
    #[must_use]
    pub fn counter_leg(&self, payment_type: &PaymentTypeId) -> CounterLeg {
        self.fee_rules
            .iter()
            .find(|rule| &rule.payment_type == payment_type)
            .map_or(CounterLeg::Orchestrated, |rule| {
                CounterLeg::LedgerGenerated(rule.clone())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_paper_exchange_counter_leg_is_generated() {
        let catalog = testing::catalog();
        let leg = catalog.counter_leg(&catalog.payment_types.paper_exchange_euro);
        match leg {
            CounterLeg::LedgerGenerated(rule) => {
                assert_eq!(
                    rule.generated_payment_type,
                    catalog.payment_types.paper_exchange_eusko
                );
            }
            CounterLeg::Orchestrated => panic!("paper exchange must be ledger generated"),
        }
    }

    #[test]
    fn test_digital_exchange_counter_leg_is_orchestrated() {
        let catalog = testing::catalog();
        assert_eq!(
            catalog.counter_leg(&catalog.payment_types.desk_digital_exchange_euro),
            CounterLeg::Orchestrated
        );
    }

    #[test]
    fn test_flows_are_linear() {
        let catalog = testing::catalog();
        let flow = catalog.flow(FlowKind::Remittance);
        assert!(flow.is_valid_transition(&catalog.statuses.to_remit, &catalog.statuses.remitted));
        assert!(!flow.contains(&catalog.statuses.transfers_done));
    }

    #[test]
    fn test_validate_rejects_duplicate_rules() {
        let mut catalog = testing::catalog();
        let rule = catalog.fee_rules[0].clone();
        catalog.fee_rules.push(rule);
        assert!(matches!(catalog.validate(), Err(CatalogError::Invalid(_))));
    }

    #[test]
    fn test_payment_mode_values() {
        let catalog = testing::catalog();
        assert_eq!(
            catalog.payment_mode_value(PaymentMode::EuskoCash),
            &catalog.payment_modes.cash
        );
        assert_eq!(
            catalog.payment_mode_value(PaymentMode::EuroCheque),
            &catalog.payment_modes.cheque
        );
    }

    #[test]
    fn test_catalog_deserializes_from_provisioning_names() {
        let json = serde_json::to_value(testing::catalog()).unwrap();
        assert!(json["payment_types"]["change_billets_versement_des_euro"].is_string());
        assert!(json["transaction_custom_fields"]["adherent"].is_string());
        let back: Catalog = serde_json::from_value(json).unwrap();
        assert_eq!(back, testing::catalog());
    }
}
