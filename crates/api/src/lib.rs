//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for desk operations, reconciliation and donations
//! - The mapping of operation errors to HTTP responses

pub mod error;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use eusko_core::donation::DonationAllocator;
use eusko_core::orchestrator::TransactionOrchestrator;
use eusko_core::reconciliation::ReconciliationEngine;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Multi-leg desk and member operations.
    pub orchestrator: Arc<TransactionOrchestrator>,
    /// Pending lists and batch validations.
    pub reconciliation: Arc<ReconciliationEngine>,
    /// Donation calculation.
    pub donations: Arc<DonationAllocator>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
