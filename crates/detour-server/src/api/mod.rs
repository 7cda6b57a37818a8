//! API routes for the detour server.

mod error;
pub mod plan;
mod routes;
pub mod zones;

pub use error::ApiError;

use axum::Router;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}
