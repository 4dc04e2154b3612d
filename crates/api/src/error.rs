//! Mapping of operation outcomes to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};

use eusko_core::operation::OperationError;

/// Turns an operation result into a response: 200 with the value, or the
/// error rendered by [`error_response`].
pub fn respond<T: Serialize>(result: Result<T, OperationError>) -> Response {
    match result {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => error_response(e),
    }
}

/// Renders an operation error as `{"error", "message"}`.
///
/// A partial failure also lists the committed steps, the failing step and
/// the postings left untouched, so operators can finish by hand.
pub fn error_response(err: OperationError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let code = err.error_code();
    let message = err.to_string();

    if status.is_server_error() {
        error!(error = %message, code, "Operation failed");
    } else {
        warn!(error = %message, code, "Operation rejected");
    }

    let body = match err {
        OperationError::Partial(failure) => json!({
            "error": code,
            "message": message,
            "operation_id": failure.operation_id,
            "completed": failure.completed,
            "failed": failure.failed,
            "not_transitioned": failure.not_transitioned,
        }),
        _ => json!({
            "error": code,
            "message": message,
        }),
    };
    (status, Json(body)).into_response()
}

/// 400 for malformed query parameters.
pub fn bad_request(message: impl Into<String>) -> Response {
    error_response(OperationError::Validation(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eusko_core::directory::DirectoryError;
    use eusko_core::ledger::LedgerError;
    use eusko_core::operation::{CommittedStep, FailedStep, PartialFailure};
    use eusko_core::workflow::WorkflowError;
    use eusko_shared::types::{Amount, PaymentTypeId, PostingId};
    use http_body_util::BodyExt;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use uuid::Uuid;

    async fn body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[rstest]
    #[case(OperationError::Validation("bad".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR")]
    #[case(OperationError::NotFound("B009".into()), StatusCode::NOT_FOUND, "NOT_FOUND")]
    #[case(OperationError::Forbidden("x".into()), StatusCode::FORBIDDEN, "FORBIDDEN")]
    #[case(
        OperationError::InsufficientFunds("error-member-not-enough-money".into()),
        StatusCode::UNPROCESSABLE_ENTITY,
        "INSUFFICIENT_FUNDS"
    )]
    #[case(
        OperationError::Ledger(LedgerError::new("user/search", "down")),
        StatusCode::SERVICE_UNAVAILABLE,
        "LEDGER_UNAVAILABLE"
    )]
    #[case(
        OperationError::Directory(DirectoryError::new("members", "down")),
        StatusCode::SERVICE_UNAVAILABLE,
        "DIRECTORY_UNAVAILABLE"
    )]
    #[case(
        OperationError::Workflow(WorkflowError::DuplicatePosting(PostingId::new("7"))),
        StatusCode::CONFLICT,
        "DUPLICATE_POSTING"
    )]
    #[tokio::test]
    async fn test_error_statuses(
        #[case] err: OperationError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let response = error_response(err);
        assert_eq!(response.status(), status);
        let json = body(response).await;
        assert_eq!(json["error"], code);
        assert!(json["message"].is_string());
        assert!(json.get("completed").is_none());
    }

    #[tokio::test]
    async fn test_partial_failure_lists_committed_steps() {
        let failure = PartialFailure {
            operation_id: Uuid::nil(),
            operation: "bank_deposit".to_string(),
            completed: vec![CommittedStep::Posting {
                index: 1,
                label: "deposit".to_string(),
                payment_type: PaymentTypeId::new("depot_en_banque"),
                posting_id: PostingId::new("501"),
                amount: Amount::new(dec!(120)).unwrap(),
            }],
            failed: FailedStep {
                index: 2,
                description: "transition 12 to rapproche".to_string(),
                error: LedgerError::new("transferStatus/changeStatus", "timeout"),
            },
            not_transitioned: vec![PostingId::new("12")],
        };

        let response = error_response(OperationError::Partial(Box::new(failure)));

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body(response).await;
        assert_eq!(json["error"], "PARTIALLY_APPLIED");
        assert_eq!(json["completed"][0]["posting_id"], "501");
        assert_eq!(json["completed"][0]["kind"], "posting");
        assert_eq!(json["failed"]["index"], 2);
        assert_eq!(json["not_transitioned"], json!(["12"]));
    }
}
