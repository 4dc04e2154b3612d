//! Donation report route.

use axum::{
    Router,
    extract::{Query, State},
    response::Response,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;

use eusko_core::donation::DonationPeriod;

use crate::AppState;
use crate::error::respond;

/// Creates the donation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/donations", get(donations))
}

/// Window of the calculation, both days included.
#[derive(Debug, Deserialize)]
pub struct DonationQuery {
    /// First day.
    pub begin: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
}

/// GET `/donations?begin=&end=` - Donations owed to associations.
async fn donations(State(state): State<AppState>, Query(query): Query<DonationQuery>) -> Response {
    let period = DonationPeriod {
        begin: query.begin,
        end: query.end,
    };
    respond(state.donations.allocate(period).await)
}
