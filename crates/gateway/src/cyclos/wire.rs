//! JSON shapes of the Cyclos web-rpc services.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use eusko_core::ledger::{
    AccountOwner, AccountSummary, CustomValue, Direction, EntityRef, FieldValue, HistoryPage,
    HistoryQuery, LedgerUser, Nature, PaymentRequest, Posting, RecordedField, RecordedValue,
    TransactionRecord,
};
use eusko_shared::types::{
    AccountId, CurrencyId, CustomFieldId, EnumeratedValueId, GroupId, PaymentTypeId, PostingId,
    StatusId, TransactionId, UserId,
};

const SYSTEM: &str = "SYSTEM";
const IMPORTED_CLASS: &str = "org.cyclos.model.banking.transactions.ImportedTransactionData";
const PAYMENT_CLASS: &str = "org.cyclos.model.banking.transactions.PaymentData";

/// Every successful response wraps its payload in `result`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub result: T,
}

/// Error body of a rejected call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    pub error_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct IdRef {
    pub id: String,
}

fn owner_param(owner: &AccountOwner) -> String {
    match owner {
        AccountOwner::System => SYSTEM.to_string(),
        AccountOwner::User(id) => id.to_string(),
    }
}

// ----------------------------------------------------------------------------
// payment/perform
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomValueOut {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_entity_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enumerated_values: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal_value: Option<Decimal>,
}

impl From<&CustomValue> for CustomValueOut {
    fn from(value: &CustomValue) -> Self {
        let field = value.field.to_string();
        match &value.value {
            FieldValue::LinkedEntity(user) => Self {
                field,
                linked_entity_value: Some(user.to_string()),
                ..Self::default()
            },
            FieldValue::Enumerated(id) => Self {
                field,
                enumerated_values: Some(id.to_string()),
                ..Self::default()
            },
            FieldValue::Text(text) => Self {
                field,
                string_value: Some(text.clone()),
                ..Self::default()
            },
            FieldValue::Decimal(decimal) => Self {
                field,
                decimal_value: Some(*decimal),
                ..Self::default()
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PerformPayment {
    #[serde(rename = "type")]
    pub payment_type: String,
    pub amount: Decimal,
    pub currency: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_values: Vec<CustomValueOut>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl From<&PaymentRequest> for PerformPayment {
    fn from(request: &PaymentRequest) -> Self {
        Self {
            payment_type: request.payment_type.to_string(),
            amount: request.amount.value(),
            currency: request.currency.to_string(),
            from: owner_param(&request.from),
            to: owner_param(&request.to),
            custom_values: request.custom_values.iter().map(Into::into).collect(),
            description: request.description.clone(),
        }
    }
}

// ----------------------------------------------------------------------------
// transferStatus/changeStatus
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangeStatus {
    pub transfer: String,
    pub new_status: String,
}

// ----------------------------------------------------------------------------
// account/searchAccountHistory
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct PeriodOut {
    pub begin: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchHistory {
    pub account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<PeriodOut>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_nature: Option<Nature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_nature: Option<Nature>,
    pub order_by: &'static str,
    pub page_size: u32,
    pub current_page: u32,
}

impl SearchHistory {
    pub(crate) fn new(query: &HistoryQuery, page: u32, page_size: u32) -> Self {
        Self {
            account: query.account.to_string(),
            direction: query.direction,
            period: query.period.map(|period| PeriodOut {
                begin: period.begin.to_string(),
                end: period.end.to_string(),
            }),
            statuses: query.statuses.iter().map(ToString::to_string).collect(),
            from_nature: query.from_nature,
            to_nature: query.to_nature,
            order_by: "DATE_DESC",
            page_size,
            current_page: page,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EntityWire {
    pub id: String,
    #[serde(default)]
    pub short_display: String,
    #[serde(default)]
    pub display: String,
}

impl From<EntityWire> for EntityRef {
    fn from(entity: EntityWire) -> Self {
        Self {
            id: UserId::new(entity.id),
            short_display: entity.short_display,
            display: entity.display,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomValueIn {
    pub field: IdRef,
    pub linked_entity_value: Option<EntityWire>,
    pub enumerated_values: Option<Vec<IdRef>>,
    pub string_value: Option<String>,
    pub decimal_value: Option<Decimal>,
}

impl CustomValueIn {
    fn into_recorded(self) -> Option<RecordedField> {
        let value = if let Some(entity) = self.linked_entity_value {
            RecordedValue::LinkedEntity(entity.into())
        } else if let Some(values) = self.enumerated_values {
            RecordedValue::Enumerated(
                values
                    .into_iter()
                    .map(|v| EnumeratedValueId::new(v.id))
                    .collect(),
            )
        } else if let Some(decimal) = self.decimal_value {
            RecordedValue::Decimal(decimal)
        } else {
            RecordedValue::Text(self.string_value?)
        };
        Some(RecordedField {
            field: CustomFieldId::new(self.field.id),
            value,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RelatedAccount {
    pub owner: Option<EntityWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryEntry {
    pub id: String,
    pub transaction_id: Option<String>,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub payment_type: IdRef,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub custom_values: Vec<CustomValueIn>,
    #[serde(default)]
    pub statuses: Vec<IdRef>,
    pub related_account: Option<RelatedAccount>,
}

impl From<HistoryEntry> for Posting {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: PostingId::new(entry.id),
            transaction_id: entry.transaction_id.map(TransactionId::new),
            date: entry.date,
            amount: entry.amount,
            payment_type: PaymentTypeId::new(entry.payment_type.id),
            description: entry.description,
            custom_values: entry
                .custom_values
                .into_iter()
                .filter_map(CustomValueIn::into_recorded)
                .collect(),
            statuses: entry
                .statuses
                .into_iter()
                .map(|status| StatusId::new(status.id))
                .collect(),
            related_owner: entry
                .related_account
                .and_then(|account| account.owner)
                .map(Into::into),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Page<T> {
    pub page_items: Vec<T>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub page_count: u32,
}

impl From<Page<HistoryEntry>> for HistoryPage {
    fn from(page: Page<HistoryEntry>) -> Self {
        Self {
            items: page.page_items.into_iter().map(Into::into).collect(),
            total_count: page.total_count,
            page_count: page.page_count,
        }
    }
}

// ----------------------------------------------------------------------------
// transfer/load
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct CurrencyAmount {
    pub amount: Decimal,
}

/// A transfer as loaded by id; the amount is unsigned.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransferWire {
    pub id: String,
    pub transaction: Option<IdRef>,
    pub date: DateTime<Utc>,
    pub currency_amount: CurrencyAmount,
    #[serde(rename = "type")]
    pub payment_type: IdRef,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub custom_values: Vec<CustomValueIn>,
    #[serde(default)]
    pub statuses: Vec<IdRef>,
    pub from: Option<RelatedAccount>,
}

impl From<TransferWire> for Posting {
    fn from(transfer: TransferWire) -> Self {
        Self {
            id: PostingId::new(transfer.id),
            transaction_id: transfer.transaction.map(|t| TransactionId::new(t.id)),
            date: transfer.date,
            amount: transfer.currency_amount.amount.abs(),
            payment_type: PaymentTypeId::new(transfer.payment_type.id),
            description: transfer.description,
            custom_values: transfer
                .custom_values
                .into_iter()
                .filter_map(CustomValueIn::into_recorded)
                .collect(),
            statuses: transfer
                .statuses
                .into_iter()
                .map(|status| StatusId::new(status.id))
                .collect(),
            related_owner: transfer
                .from
                .and_then(|account| account.owner)
                .map(Into::into),
        }
    }
}

// ----------------------------------------------------------------------------
// transaction/getData
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransferData {
    pub charged_back_by: Option<IdRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransactionData {
    pub class: String,
    pub transfer: Option<TransferData>,
}

impl From<TransactionData> for TransactionRecord {
    fn from(data: TransactionData) -> Self {
        match data.class.as_str() {
            IMPORTED_CLASS => Self::Imported,
            PAYMENT_CLASS => Self::Payment {
                charged_back_by: data
                    .transfer
                    .and_then(|transfer| transfer.charged_back_by)
                    .map(|by| PostingId::new(by.id)),
            },
            _ => Self::Other { name: data.class },
        }
    }
}

// ----------------------------------------------------------------------------
// account/getAccountsSummary
// ----------------------------------------------------------------------------

pub(crate) fn summary_params(owner: &AccountOwner) -> (String, Option<()>) {
    (owner_param(owner), None)
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountStatus {
    pub balance: Decimal,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountWire {
    pub id: String,
    #[serde(rename = "type")]
    pub account_type: NamedRef,
    pub currency: IdRef,
    pub status: AccountStatus,
}

impl From<AccountWire> for AccountSummary {
    fn from(account: AccountWire) -> Self {
        Self {
            id: AccountId::new(account.id),
            account_type: AccountId::new(account.account_type.id),
            account_type_name: account.account_type.name,
            currency: CurrencyId::new(account.currency.id),
            balance: account.status.balance,
        }
    }
}

// ----------------------------------------------------------------------------
// user/search
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchUser<'a> {
    pub keywords: &'a str,
    pub user_status: [&'static str; 3],
}

impl<'a> SearchUser<'a> {
    pub(crate) fn login(login: &'a str) -> Self {
        Self {
            keywords: login,
            user_status: ["ACTIVE", "BLOCKED", "DISABLED"],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserWire {
    pub id: String,
    pub short_display: String,
    #[serde(default)]
    pub display: String,
    pub group: Option<IdRef>,
}

impl From<UserWire> for LedgerUser {
    fn from(user: UserWire) -> Self {
        Self {
            id: UserId::new(user.id),
            login: user.short_display,
            display: user.display,
            group: user.group.map(|group| GroupId::new(group.id)),
        }
    }
}
