//! Sequential submission of ledger calls with step tracking.

use tracing::{error, info};
use uuid::Uuid;

use eusko_shared::types::PostingId;

use crate::ledger::{GeneratedTransfer, LedgerClient, LedgerError, PaymentRequest};
use crate::operation::error::OperationError;
use crate::operation::report::{CommittedStep, FailedStep, OperationReport, PartialFailure};
use crate::workflow::StatusTransition;

/// Drives the ledger calls of one operation, in order.
///
/// The first failing call ends the operation. If nothing was committed
/// before it, the plain ledger error is returned; otherwise the caller gets
/// a [`PartialFailure`] listing every committed step.
pub(crate) struct Submission<'a> {
    ledger: &'a dyn LedgerClient,
    operation: &'static str,
    operation_id: Uuid,
    steps: Vec<CommittedStep>,
    generated: Vec<GeneratedTransfer>,
    planned: Vec<StatusTransition>,
}

impl<'a> Submission<'a> {
    pub(crate) fn start(ledger: &'a dyn LedgerClient, operation: &'static str) -> Self {
        let operation_id = Uuid::new_v4();
        info!(%operation_id, operation, "Operation started");
        Self {
            ledger,
            operation,
            operation_id,
            steps: Vec::new(),
            generated: Vec::new(),
            planned: Vec::new(),
        }
    }

    /// Registers the status transitions applied after all postings.
    pub(crate) fn with_transitions(mut self, transitions: Vec<StatusTransition>) -> Self {
        self.planned = transitions;
        self
    }

    /// Records a transfer the ledger will create from the last posting.
    pub(crate) fn expect_generated(&mut self, transfer: GeneratedTransfer) {
        self.generated.push(transfer);
    }

    pub(crate) async fn post(
        &mut self,
        label: &str,
        request: PaymentRequest,
    ) -> Result<PostingId, OperationError> {
        let index = self.steps.len() + 1;
        match self.ledger.perform(&request).await {
            Ok(posting_id) => {
                info!(
                    operation_id = %self.operation_id,
                    step = index,
                    label,
                    payment_type = %request.payment_type,
                    posting_id = %posting_id,
                    amount = %request.amount,
                    "Payment performed"
                );
                self.steps.push(CommittedStep::Posting {
                    index,
                    label: label.to_string(),
                    payment_type: request.payment_type,
                    posting_id: posting_id.clone(),
                    amount: request.amount,
                });
                Ok(posting_id)
            }
            Err(err) => {
                let pending = self.planned.iter().map(|t| t.posting.clone()).collect();
                Err(self.fail(index, label.to_string(), err, pending))
            }
        }
    }

    /// Applies every registered transition, in selection order.
    pub(crate) async fn apply_transitions(&mut self) -> Result<(), OperationError> {
        let planned = std::mem::take(&mut self.planned);
        for (position, transition) in planned.iter().enumerate() {
            let index = self.steps.len() + 1;
            if let Err(err) = self
                .ledger
                .change_status(&transition.posting, &transition.to)
                .await
            {
                let pending = planned[position..]
                    .iter()
                    .map(|t| t.posting.clone())
                    .collect();
                let description = format!("{} -> {}", transition.posting, transition.to);
                return Err(self.fail(index, description, err, pending));
            }
            info!(
                operation_id = %self.operation_id,
                step = index,
                posting_id = %transition.posting,
                from = %transition.from,
                to = %transition.to,
                "Status changed"
            );
            self.steps.push(CommittedStep::Transition {
                index,
                posting_id: transition.posting.clone(),
                from: transition.from.clone(),
                to: transition.to.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> OperationReport {
        info!(
            operation_id = %self.operation_id,
            operation = self.operation,
            steps = self.steps.len(),
            "Operation completed"
        );
        OperationReport {
            operation_id: self.operation_id,
            operation: self.operation.to_string(),
            steps: self.steps,
            generated: self.generated,
        }
    }

    fn fail(
        &self,
        index: usize,
        description: String,
        error: LedgerError,
        not_transitioned: Vec<PostingId>,
    ) -> OperationError {
        if self.steps.is_empty() {
            error!(
                operation_id = %self.operation_id,
                operation = self.operation,
                step = index,
                error = %error,
                "Operation failed before any ledger change"
            );
            return OperationError::Ledger(error);
        }

        let failure = PartialFailure {
            operation_id: self.operation_id,
            operation: self.operation.to_string(),
            completed: self.steps.clone(),
            failed: FailedStep {
                index,
                description,
                error,
            },
            not_transitioned,
        };
        error!(
            operation_id = %self.operation_id,
            operation = self.operation,
            committed = ?failure.committed_postings(),
            failed_step = index,
            error = %failure.failed.error,
            "Operation partially applied"
        );
        OperationError::Partial(Box::new(failure))
    }
}
