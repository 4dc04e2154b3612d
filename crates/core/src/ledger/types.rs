//! Ledger domain types.
//!
//! Write-side types describe a payment to perform. Read-side types are the
//! projections returned by account history searches.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use eusko_shared::types::{
    AccountId, Amount, CurrencyId, CustomFieldId, EnumeratedValueId, GroupId, PaymentTypeId,
    PostingId, StatusId, TransactionId, UserId,
};

/// Side of a payment: the system or a user's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum AccountOwner {
    /// The ledger's system accounts.
    System,
    /// A user account (member, bureau de change, bank, dedicated account).
    User(UserId),
}

impl AccountOwner {
    /// Returns the user id if this is a user account.
    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::System => None,
            Self::User(id) => Some(id),
        }
    }
}

/// Typed value of a transaction custom field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum FieldValue {
    /// Reference to a ledger user.
    LinkedEntity(UserId),
    /// One value of an enumerated field.
    Enumerated(EnumeratedValueId),
    /// Free text.
    Text(String),
    /// Decimal number.
    Decimal(Decimal),
}

/// A custom field value attached to a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomValue {
    /// Field identifier.
    pub field: CustomFieldId,
    /// Field value.
    pub value: FieldValue,
}

impl CustomValue {
    /// Links a user to the payment.
    #[must_use]
    pub fn linked(field: &CustomFieldId, user: &UserId) -> Self {
        Self {
            field: field.clone(),
            value: FieldValue::LinkedEntity(user.clone()),
        }
    }

    /// Attaches an enumerated value.
    #[must_use]
    pub fn enumerated(field: &CustomFieldId, value: &EnumeratedValueId) -> Self {
        Self {
            field: field.clone(),
            value: FieldValue::Enumerated(value.clone()),
        }
    }

    /// Attaches free text.
    #[must_use]
    pub fn text(field: &CustomFieldId, value: impl Into<String>) -> Self {
        Self {
            field: field.clone(),
            value: FieldValue::Text(value.into()),
        }
    }

    /// Attaches a decimal.
    #[must_use]
    pub fn decimal(field: &CustomFieldId, value: Decimal) -> Self {
        Self {
            field: field.clone(),
            value: FieldValue::Decimal(value),
        }
    }
}

/// A payment to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Payment type.
    pub payment_type: PaymentTypeId,
    /// Amount, validated before any submission.
    pub amount: Amount,
    /// Currency.
    pub currency: CurrencyId,
    /// Debited side.
    pub from: AccountOwner,
    /// Credited side.
    pub to: AccountOwner,
    /// Custom field values required by the payment type.
    pub custom_values: Vec<CustomValue>,
    /// Free description shown to operators.
    pub description: String,
}

impl PaymentRequest {
    /// A payment without custom values or description.
    #[must_use]
    pub fn new(
        payment_type: &PaymentTypeId,
        amount: Amount,
        currency: &CurrencyId,
        from: AccountOwner,
        to: AccountOwner,
    ) -> Self {
        Self {
            payment_type: payment_type.clone(),
            amount,
            currency: currency.clone(),
            from,
            to,
            custom_values: Vec::new(),
            description: String::new(),
        }
    }

    /// Adds a custom field value.
    #[must_use]
    pub fn with_value(mut self, value: CustomValue) -> Self {
        self.custom_values.push(value);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Value sent for a custom field, if any.
    #[must_use]
    pub fn value(&self, field: &CustomFieldId) -> Option<&FieldValue> {
        self.custom_values
            .iter()
            .find(|value| &value.field == field)
            .map(|value| &value.value)
    }
}

/// Direction of an account history search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Money entering the account.
    Credit,
    /// Money leaving the account.
    Debit,
}

/// Nature of the other side of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Nature {
    /// A system account.
    System,
    /// A user account.
    User,
}

/// Inclusive-begin, exclusive-end date period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// First day.
    pub begin: NaiveDate,
    /// Day after the last one.
    pub end: NaiveDate,
}

/// Account history search criteria.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryQuery {
    /// Account whose history is searched.
    pub account: AccountId,
    /// Only credits or only debits.
    pub direction: Option<Direction>,
    /// Date window.
    pub period: Option<Period>,
    /// Only transfers currently in one of these statuses.
    pub statuses: Vec<StatusId>,
    /// Nature of the debited side.
    pub from_nature: Option<Nature>,
    /// Nature of the credited side.
    pub to_nature: Option<Nature>,
}

impl HistoryQuery {
    /// Starts a query on an account.
    #[must_use]
    pub fn account(account: AccountId) -> Self {
        Self {
            account,
            ..Self::default()
        }
    }

    /// Restricts to one direction.
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Restricts to a date window.
    #[must_use]
    pub fn period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    /// Restricts to a status.
    #[must_use]
    pub fn status(mut self, status: StatusId) -> Self {
        self.statuses.push(status);
        self
    }

    /// Restricts the nature of the debited side.
    #[must_use]
    pub fn from_nature(mut self, nature: Nature) -> Self {
        self.from_nature = Some(nature);
        self
    }

    /// Restricts the nature of the credited side.
    #[must_use]
    pub fn to_nature(mut self, nature: Nature) -> Self {
        self.to_nature = Some(nature);
        self
    }
}

/// A ledger user as seen through a history entry or a custom field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Ledger id.
    pub id: UserId,
    /// Short display, the login for members and desks.
    pub short_display: String,
    /// Full display name.
    pub display: String,
}

/// Value of a custom field as recorded on a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum RecordedValue {
    /// Linked user.
    LinkedEntity(EntityRef),
    /// Selected enumerated values.
    Enumerated(Vec<EnumeratedValueId>),
    /// Free text.
    Text(String),
    /// Decimal number.
    Decimal(Decimal),
}

/// A custom field as recorded on a posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedField {
    /// Field identifier.
    pub field: CustomFieldId,
    /// Recorded value.
    pub value: RecordedValue,
}

/// A posting as returned by an account history search.
///
/// The amount is signed from the searched account's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Transfer id.
    pub id: PostingId,
    /// Transaction the transfer belongs to, absent for generated transfers.
    pub transaction_id: Option<TransactionId>,
    /// Booking date.
    pub date: DateTime<Utc>,
    /// Signed amount.
    pub amount: Decimal,
    /// Payment type.
    pub payment_type: PaymentTypeId,
    /// Description.
    pub description: String,
    /// Custom field values.
    #[serde(default)]
    pub custom_values: Vec<RecordedField>,
    /// Current status in each status flow of the payment type.
    #[serde(default)]
    pub statuses: Vec<StatusId>,
    /// Owner of the account on the other side, when it is a user.
    pub related_owner: Option<EntityRef>,
}

impl Posting {
    /// Returns the recorded value of a custom field.
    #[must_use]
    pub fn field(&self, field: &CustomFieldId) -> Option<&RecordedValue> {
        self.custom_values
            .iter()
            .find(|value| &value.field == field)
            .map(|value| &value.value)
    }

    /// Returns the user linked through a custom field.
    #[must_use]
    pub fn linked_entity(&self, field: &CustomFieldId) -> Option<&EntityRef> {
        match self.field(field) {
            Some(RecordedValue::LinkedEntity(entity)) => Some(entity),
            _ => None,
        }
    }

    /// Returns true if the posting currently has the given status.
    #[must_use]
    pub fn has_status(&self, status: &StatusId) -> bool {
        self.statuses.contains(status)
    }

    /// Absolute value of the amount.
    #[must_use]
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }
}

/// One page of an account history search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryPage {
    /// Postings of this page, in ledger order.
    pub items: Vec<Posting>,
    /// Total number of matching postings.
    pub total_count: u64,
    /// Number of pages.
    pub page_count: u32,
}

/// Underlying transaction of a posting, as far as charge-backs are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "class")]
pub enum TransactionRecord {
    /// A regular payment, possibly charged back.
    Payment {
        /// Transfer that charged this payment back.
        charged_back_by: Option<PostingId>,
    },
    /// A transaction imported from a legacy system; never charged back.
    Imported,
    /// Any other transaction class.
    Other {
        /// Ledger class name.
        name: String,
    },
}

impl TransactionRecord {
    /// Returns true if postings of this transaction count as real activity.
    #[must_use]
    pub fn is_effective(&self) -> bool {
        match self {
            Self::Payment { charged_back_by } => charged_back_by.is_none(),
            Self::Imported => true,
            Self::Other { .. } => false,
        }
    }
}

/// Balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account id.
    pub id: AccountId,
    /// Account type id.
    pub account_type: AccountId,
    /// Account type display name.
    pub account_type_name: String,
    /// Currency of the account.
    pub currency: CurrencyId,
    /// Current balance.
    pub balance: Decimal,
}

/// A user found in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerUser {
    /// Ledger id.
    pub id: UserId,
    /// Login.
    pub login: String,
    /// Display name.
    pub display: String,
    /// Group the user belongs to.
    pub group: Option<GroupId>,
}

impl LedgerUser {
    /// The user as a payment side.
    #[must_use]
    pub fn owner(&self) -> AccountOwner {
        AccountOwner::User(self.id.clone())
    }
}
