//! Structured outcome of an operation: what was committed, what failed.

use serde::Serialize;
use uuid::Uuid;

use eusko_shared::types::{Amount, PaymentTypeId, PostingId, StatusId};

use crate::ledger::{GeneratedTransfer, LedgerError};

/// A ledger call that succeeded. Committed calls are never retracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommittedStep {
    /// A payment was performed.
    Posting {
        /// Position in the operation, from 1.
        index: usize,
        /// Role of the leg in the operation.
        label: String,
        /// Payment type used.
        payment_type: PaymentTypeId,
        /// Id of the created transfer.
        posting_id: PostingId,
        /// Amount moved.
        amount: Amount,
    },
    /// A posting changed status.
    Transition {
        /// Position in the operation, from 1.
        index: usize,
        /// Posting moved.
        posting_id: PostingId,
        /// Previous status.
        from: StatusId,
        /// New status.
        to: StatusId,
    },
}

impl CommittedStep {
    /// Position in the operation.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Posting { index, .. } | Self::Transition { index, .. } => *index,
        }
    }
}

/// The ledger call that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedStep {
    /// Position in the operation, from 1.
    pub index: usize,
    /// What the call was doing.
    pub description: String,
    /// Ledger failure.
    #[serde(serialize_with = "serialize_display")]
    pub error: LedgerError,
}

fn serialize_display<S: serde::Serializer>(
    error: &LedgerError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// An operation stopped after some ledger calls were committed.
///
/// Nothing is rolled back: operators reconcile by hand from this report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialFailure {
    /// Correlation id of the operation, also present in logs.
    pub operation_id: Uuid,
    /// Operation name.
    pub operation: String,
    /// Calls committed before the failure, in order.
    pub completed: Vec<CommittedStep>,
    /// The failing call.
    pub failed: FailedStep,
    /// Selected postings whose status was not changed.
    pub not_transitioned: Vec<PostingId>,
}

impl PartialFailure {
    /// Ids of the transfers created before the failure.
    #[must_use]
    pub fn committed_postings(&self) -> Vec<&PostingId> {
        posting_ids(&self.completed)
    }
}

impl std::fmt::Display for PartialFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} stopped at step {} ({}) after {} committed step(s): {}",
            self.operation,
            self.failed.index,
            self.failed.description,
            self.completed.len(),
            self.failed.error
        )
    }
}

/// A fully applied operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationReport {
    /// Correlation id of the operation, also present in logs.
    pub operation_id: Uuid,
    /// Operation name.
    pub operation: String,
    /// Committed calls, in order.
    pub steps: Vec<CommittedStep>,
    /// Transfers the ledger generates by itself from the committed ones.
    pub generated: Vec<GeneratedTransfer>,
}

impl OperationReport {
    /// Ids of the transfers created.
    #[must_use]
    pub fn posting_ids(&self) -> Vec<&PostingId> {
        posting_ids(&self.steps)
    }

    /// Ids of the postings whose status changed.
    #[must_use]
    pub fn transitioned(&self) -> Vec<&PostingId> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                CommittedStep::Transition { posting_id, .. } => Some(posting_id),
                CommittedStep::Posting { .. } => None,
            })
            .collect()
    }
}

fn posting_ids(steps: &[CommittedStep]) -> Vec<&PostingId> {
    steps
        .iter()
        .filter_map(|step| match step {
            CommittedStep::Posting { posting_id, .. } => Some(posting_id),
            CommittedStep::Transition { .. } => None,
        })
        .collect()
}
