//! Workflow service for status transitions.
//!
//! Transitions are planned and validated locally before anything is sent
//! to the ledger, so an invalid selection fails with nothing submitted.

use std::collections::HashSet;

use eusko_shared::types::StatusId;

use crate::ledger::Posting;
use crate::workflow::error::WorkflowError;
use crate::workflow::types::{StatusFlow, StatusTransition};

/// Stateless service validating status moves against a flow's graph.
pub struct WorkflowService;

impl WorkflowService {
    /// Returns the posting's current status in a flow.
    #[must_use]
    pub fn current_status<'a>(flow: &StatusFlow, posting: &'a Posting) -> Option<&'a StatusId> {
        posting.statuses.iter().find(|status| flow.contains(status))
    }

    /// Plans moving one posting to `target`.
    ///
    /// # Returns
    /// * `Ok(StatusTransition)` if `target` is one edge away from the current status
    /// * `Err(WorkflowError::StatusOutsideFlow)` if `target` is not in the flow
    /// * `Err(WorkflowError::NotInFlow)` if the posting has no status in the flow
    /// * `Err(WorkflowError::InvalidTransition)` otherwise
    pub fn plan(
        flow: &StatusFlow,
        posting: &Posting,
        target: &StatusId,
    ) -> Result<StatusTransition, WorkflowError> {
        if !flow.contains(target) {
            return Err(WorkflowError::StatusOutsideFlow {
                flow: flow.kind,
                status: target.clone(),
            });
        }

        let current =
            Self::current_status(flow, posting).ok_or_else(|| WorkflowError::NotInFlow {
                posting: posting.id.clone(),
                flow: flow.kind,
            })?;

        if !flow.is_valid_transition(current, target) {
            return Err(WorkflowError::InvalidTransition {
                posting: posting.id.clone(),
                from: current.clone(),
                to: target.clone(),
            });
        }

        Ok(StatusTransition {
            posting: posting.id.clone(),
            flow: flow.kind,
            from: current.clone(),
            to: target.clone(),
        })
    }

    /// Plans moving every posting to `target`, keeping input order.
    ///
    /// Fails on the first posting that cannot move, or if a posting appears
    /// twice.
    pub fn plan_batch(
        flow: &StatusFlow,
        postings: &[Posting],
        target: &StatusId,
    ) -> Result<Vec<StatusTransition>, WorkflowError> {
        let mut seen = HashSet::new();
        postings
            .iter()
            .map(|posting| {
                if !seen.insert(&posting.id) {
                    return Err(WorkflowError::DuplicatePosting(posting.id.clone()));
                }
                Self::plan(flow, posting, target)
            })
            .collect()
    }
}
