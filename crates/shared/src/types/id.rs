//! Typed identifiers for ledger and directory entities.
//!
//! The ledger hands out opaque identifiers. Wrapping them keeps a `UserId`
//! from being passed where a `PaymentTypeId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers around opaque ledger identifiers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wraps an identifier issued by an external system.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

typed_id!(UserId, "Ledger identifier of a user (member, desk, bank or dedicated account holder).");
typed_id!(AccountId, "Ledger identifier of a system account or account type.");
typed_id!(PostingId, "Ledger identifier of a single transfer.");
typed_id!(TransactionId, "Ledger identifier of the transaction a transfer belongs to.");
typed_id!(PaymentTypeId, "Ledger identifier of a payment type.");
typed_id!(StatusId, "Ledger identifier of a transfer status.");
typed_id!(StatusFlowId, "Ledger identifier of a transfer status flow.");
typed_id!(CustomFieldId, "Ledger identifier of a transaction custom field.");
typed_id!(CurrencyId, "Ledger identifier of a currency.");
typed_id!(GroupId, "Ledger identifier of a user group.");
typed_id!(EnumeratedValueId, "Ledger identifier of a value of an enumerated custom field.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_id_display_and_conversions() {
        let id = UserId::new("-7371965201600299221");
        assert_eq!(id.to_string(), "-7371965201600299221");
        assert_eq!(id.as_str(), "-7371965201600299221");
        assert_eq!(UserId::from("-7371965201600299221"), id);
    }

    #[test]
    fn test_typed_id_serializes_transparently() {
        let id = PostingId::new("42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
        let back: PostingId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(back, id);
    }
}
