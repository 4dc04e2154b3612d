//! Provisioned ledger identifiers, grouped by kind.
//!
//! Field names describe the business role; the serde names are the
//! internal names used by the provisioning scripts.

use serde::{Deserialize, Serialize};

use eusko_shared::types::{
    AccountId, CurrencyId, CustomFieldId, EnumeratedValueId, GroupId, PaymentTypeId, StatusFlowId,
    StatusId, UserId,
};

/// Currency ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currencies {
    /// Eusko.
    pub eusko: CurrencyId,
    /// Euro.
    pub euro: CurrencyId,
}

/// System accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemAccounts {
    /// Euro debit account, counterpart of every euro entering the scheme.
    #[serde(rename = "compte_de_debit_euro")]
    pub euro_debit: AccountId,
    /// Digital eusko debit account, source of every digital eusko issued.
    #[serde(rename = "compte_de_debit_eusko_numerique")]
    pub digital_debit: AccountId,
    /// Transit account between the vault and the desks.
    #[serde(rename = "compte_de_transit")]
    pub transit: AccountId,
    /// Paper eusko in circulation.
    #[serde(rename = "compte_des_billets_en_circulation")]
    pub notes_in_circulation: AccountId,
}

/// User account types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTypes {
    /// Paper eusko stock of a bureau de change.
    #[serde(rename = "stock_de_billets_bdc")]
    pub desk_note_stock: AccountId,
    /// Euro till of a bureau de change.
    #[serde(rename = "caisse_euro_bdc")]
    pub desk_euro_till: AccountId,
    /// Digital eusko account of a member.
    #[serde(rename = "compte_d_adherent")]
    pub member_account: AccountId,
}

/// Technical users holding the dedicated euro accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedicatedAccounts {
    /// Euros backing paper eusko.
    #[serde(rename = "compte_dedie_eusko_billet")]
    pub paper: UserId,
    /// Euros backing digital eusko.
    #[serde(rename = "compte_dedie_eusko_numerique")]
    pub digital: UserId,
}

/// User groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Groups {
    /// Business members with an account.
    #[serde(rename = "adherents_prestataires")]
    pub business_members: GroupId,
    /// Individual members with an account.
    #[serde(rename = "adherents_utilisateurs")]
    pub individual_members: GroupId,
}

impl Groups {
    /// Returns true if members of the group hold a digital account.
    #[must_use]
    pub fn holds_account(&self, group: &GroupId) -> bool {
        group == &self.business_members || group == &self.individual_members
    }
}

/// Payment types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PaymentTypes {
    #[serde(rename = "change_billets_versement_des_euro")]
    pub paper_exchange_euro: PaymentTypeId,
    #[serde(rename = "change_billets_versement_des_eusko")]
    pub paper_exchange_eusko: PaymentTypeId,
    #[serde(rename = "change_numerique_en_bdc_versement_des_euro")]
    pub desk_digital_exchange_euro: PaymentTypeId,
    #[serde(rename = "change_numerique_en_ligne_versement_des_euro")]
    pub online_exchange_euro: PaymentTypeId,
    #[serde(rename = "change_numerique_en_ligne_versement_des_eusko")]
    pub online_exchange_eusko: PaymentTypeId,
    #[serde(rename = "credit_du_compte")]
    pub account_credit: PaymentTypeId,
    #[serde(rename = "retrait_du_compte")]
    pub account_debit: PaymentTypeId,
    #[serde(rename = "depot_de_billets")]
    pub notes_deposit: PaymentTypeId,
    #[serde(rename = "retrait_de_billets")]
    pub notes_withdrawal: PaymentTypeId,
    #[serde(rename = "reconversion_billets_versement_des_eusko")]
    pub paper_reconversion: PaymentTypeId,
    #[serde(rename = "reconversion_numerique")]
    pub digital_reconversion: PaymentTypeId,
    #[serde(rename = "cotisation_en_euro")]
    pub euro_subscription: PaymentTypeId,
    #[serde(rename = "cotisation_en_eusko")]
    pub eusko_subscription: PaymentTypeId,
    #[serde(rename = "vente_en_euro")]
    pub euro_sale: PaymentTypeId,
    #[serde(rename = "depot_en_banque")]
    pub bank_deposit: PaymentTypeId,
    #[serde(rename = "regularisation_depot_insuffisant")]
    pub short_deposit_adjustment: PaymentTypeId,
    #[serde(rename = "regularisation_depot_excessif")]
    pub excess_deposit_adjustment: PaymentTypeId,
    #[serde(rename = "paiement_de_banque_de_depot_vers_caisse_euro_bdc")]
    pub bank_to_desk_till: PaymentTypeId,
    #[serde(rename = "paiement_de_caisse_euro_bdc_vers_banque_de_depot")]
    pub desk_till_to_bank: PaymentTypeId,
    #[serde(rename = "virement_de_banque_de_depot_vers_compte_debit_euro")]
    pub bank_to_euro_debit: PaymentTypeId,
    #[serde(rename = "virement_de_banque_de_depot_vers_compte_dedie")]
    pub bank_to_dedicated: PaymentTypeId,
    #[serde(rename = "virement_de_compte_dedie_vers_compte_debit_euro")]
    pub dedicated_to_euro_debit: PaymentTypeId,
    #[serde(rename = "virement_entre_comptes_dedies")]
    pub between_dedicated: PaymentTypeId,
    #[serde(rename = "entree_stock_bdc")]
    pub stock_in: PaymentTypeId,
    #[serde(rename = "sortie_stock_bdc")]
    pub stock_out: PaymentTypeId,
    #[serde(rename = "entree_coffre")]
    pub vault_in: PaymentTypeId,
    #[serde(rename = "sortie_coffre")]
    pub vault_out: PaymentTypeId,
    #[serde(rename = "remise_d_euro_en_caisse")]
    pub till_euro_remittance: PaymentTypeId,
    #[serde(rename = "sortie_caisse_eusko_bdc")]
    pub till_eusko_out: PaymentTypeId,
    #[serde(rename = "sortie_retours_eusko_bdc")]
    pub returned_eusko_out: PaymentTypeId,
    #[serde(rename = "virement_inter_adherent")]
    pub member_transfer: PaymentTypeId,
}

/// Transaction custom fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFields {
    /// Member concerned by the operation.
    #[serde(rename = "adherent")]
    pub member: CustomFieldId,
    /// Member, when the payment type does not require one.
    #[serde(rename = "adherent_facultatif")]
    pub optional_member: CustomFieldId,
    /// Bureau de change concerned by the operation.
    #[serde(rename = "bdc")]
    pub desk: CustomFieldId,
    /// Payment mode (enumerated).
    #[serde(rename = "mode_de_paiement")]
    pub payment_mode: CustomFieldId,
    /// Paper exchange share of a bank deposit.
    #[serde(rename = "montant_changes_billet")]
    pub paper_exchange_total: CustomFieldId,
    /// Digital exchange share of a bank deposit.
    #[serde(rename = "montant_changes_numerique")]
    pub digital_exchange_total: CustomFieldId,
    /// Subscription share of a bank deposit.
    #[serde(rename = "montant_cotisations")]
    pub subscriptions_total: CustomFieldId,
    /// Sales share of a bank deposit.
    #[serde(rename = "montant_ventes")]
    pub sales_total: CustomFieldId,
    /// Bank deposit slip number.
    #[serde(rename = "numero_de_bordereau")]
    pub deposit_slip: CustomFieldId,
    /// Invoice number of a reconversion.
    #[serde(rename = "numero_de_facture")]
    pub invoice_number: CustomFieldId,
    /// Bank transaction reference of a transfer exchange.
    #[serde(rename = "numero_de_transaction_banque")]
    pub bank_reference: CustomFieldId,
    /// Person carrying notes between the vault and a desk.
    #[serde(rename = "porteur")]
    pub carrier: CustomFieldId,
}

/// Values of the payment mode enumerated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentModeValues {
    /// Cash.
    #[serde(rename = "especes")]
    pub cash: EnumeratedValueId,
    /// Cheque.
    #[serde(rename = "cheque")]
    pub cheque: EnumeratedValueId,
}

/// Transfer statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statuses {
    /// Awaiting reconciliation.
    #[serde(rename = "a_rapprocher")]
    pub to_reconcile: StatusId,
    /// Reconciled.
    #[serde(rename = "rapproche")]
    pub reconciled: StatusId,
    /// Awaiting remittance to Euskal Moneta.
    #[serde(rename = "a_remettre_a_euskal_moneta")]
    pub to_remit: StatusId,
    /// Remitted to Euskal Moneta.
    #[serde(rename = "remis_a_euskal_moneta")]
    pub remitted: StatusId,
    /// Bank transfers still to be made.
    #[serde(rename = "virements_a_faire")]
    pub transfers_due: StatusId,
    /// Bank transfers made.
    #[serde(rename = "virements_faits")]
    pub transfers_done: StatusId,
}

/// Transfer status flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlowIds {
    /// Reconciliation flow.
    #[serde(rename = "rapprochement")]
    pub reconciliation: StatusFlowId,
    /// Remittance to Euskal Moneta flow.
    #[serde(rename = "remise_a_euskal_moneta")]
    pub remittance: StatusFlowId,
    /// Bank transfers flow.
    #[serde(rename = "virements")]
    pub transfers: StatusFlowId,
}
