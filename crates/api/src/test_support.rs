//! In-memory application state for route tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use eusko_core::directory::MemberKind;
use eusko_core::donation::DonationAllocator;
use eusko_core::orchestrator::TransactionOrchestrator;
use eusko_core::reconciliation::ReconciliationEngine;
use eusko_core::testing::{self, InMemoryDirectory, InMemoryLedger, RecordingNotifier};
use eusko_shared::DonationConfig;

use crate::AppState;

pub const DESK: &str = "B001";
pub const MEMBER: &str = "E12345";
pub const BANK: &str = "banque_1";

/// A desk, a bank and one individual member.
pub fn ledger() -> InMemoryLedger {
    InMemoryLedger::new()
        .with_desk(DESK)
        .with_user(BANK, "bank-1", None)
        .with_user(MEMBER, "u-e12345", Some("adherents_utilisateurs"))
}

pub fn directory() -> InMemoryDirectory {
    InMemoryDirectory::new()
        .with_member(testing::member(MEMBER, MemberKind::Individual))
        .with_association(testing::association("1", "Z00001", "Euskal Moneta", 40))
}

pub fn state(ledger: &Arc<InMemoryLedger>, directory: InMemoryDirectory) -> AppState {
    let catalog = Arc::new(testing::catalog());
    let directory = Arc::new(directory);
    AppState {
        orchestrator: Arc::new(TransactionOrchestrator::new(
            ledger.clone(),
            directory.clone(),
            catalog.clone(),
            Arc::new(RecordingNotifier::new()),
        )),
        reconciliation: Arc::new(ReconciliationEngine::new(ledger.clone(), catalog.clone())),
        donations: Arc::new(DonationAllocator::new(
            ledger.clone(),
            directory,
            catalog,
            DonationConfig::default(),
        )),
    }
}

/// Sends one request; `body` is JSON for POSTs.
pub async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    let request = match body {
        Some(json) => request.body(Body::from(json.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
