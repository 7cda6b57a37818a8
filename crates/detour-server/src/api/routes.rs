//! REST API routes.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{plan, zones};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/routes/plan", post(plan::plan_route))
        // Zone registry
        .route("/v1/zones", post(zones::create_zone).get(zones::list_zones))
        .route("/v1/zones/check", get(zones::check_point))
        .route("/v1/zones/:id", get(zones::get_zone).delete(zones::delete_zone))
}
