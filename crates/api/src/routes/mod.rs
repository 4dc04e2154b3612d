//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod desks;
pub mod donations;
pub mod health;
pub mod operations;
pub mod reconciliation;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(desks::routes())
        .merge(operations::routes())
        .merge(reconciliation::routes())
        .merge(donations::routes())
}
