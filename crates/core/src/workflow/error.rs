//! Workflow error types for status transitions.

use thiserror::Error;

use eusko_shared::types::{PostingId, StatusId};

use crate::workflow::types::FlowKind;

/// Errors that can occur while planning status transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// The target status is not part of the flow.
    #[error("Status {status} is not part of the {flow} flow")]
    StatusOutsideFlow {
        /// The flow.
        flow: FlowKind,
        /// The offending status.
        status: StatusId,
    },

    /// The posting has no status in the flow.
    #[error("Posting {posting} does not take part in the {flow} flow")]
    NotInFlow {
        /// The posting.
        posting: PostingId,
        /// The flow.
        flow: FlowKind,
    },

    /// Attempted a move that is not an edge of the flow.
    #[error("Invalid status transition for posting {posting} from {from} to {to}")]
    InvalidTransition {
        /// The posting.
        posting: PostingId,
        /// The current status.
        from: StatusId,
        /// The attempted target status.
        to: StatusId,
    },

    /// The same posting was selected twice in one batch.
    #[error("Posting {0} is selected more than once")]
    DuplicatePosting(PostingId),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::StatusOutsideFlow { .. } => 500,
            Self::NotInFlow { .. } | Self::InvalidTransition { .. } | Self::DuplicatePosting(_) => {
                409
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::StatusOutsideFlow { .. } => "STATUS_OUTSIDE_FLOW",
            Self::NotInFlow { .. } => "NOT_IN_FLOW",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::DuplicatePosting(_) => "DUPLICATE_POSTING",
        }
    }
}
