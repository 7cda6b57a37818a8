//! Keep-out zone registry endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use detour_core::Point;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::ApiError;
use crate::state::{AppState, ZoneRecord};

#[derive(Debug, Deserialize)]
pub struct CreateZoneRequest {
    pub lat: f64,
    pub lon: f64,
    pub radius_m: f64,
}

/// Register a new zone.
pub async fn create_zone(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateZoneRequest>,
) -> Result<(StatusCode, Json<ZoneRecord>), ApiError> {
    let record = state.add_zone(req.lat, req.lon, req.radius_m)?;
    tracing::info!(
        "Registered zone {} at ({}, {}) r={}m",
        record.zone.id,
        req.lat,
        req.lon,
        req.radius_m
    );
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_zones(State(state): State<Arc<AppState>>) -> Json<Vec<ZoneRecord>> {
    Json(state.get_zones())
}

pub async fn get_zone(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<ZoneRecord>, ApiError> {
    state.get_zone(id).map(Json).ok_or(ApiError::ZoneNotFound(id))
}

pub async fn delete_zone(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    if state.remove_zone(id) {
        tracing::info!("Deleted zone {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::ZoneNotFound(id))
    }
}

#[derive(Debug, Deserialize)]
pub struct PointCheckQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct PointCheckResponse {
    pub inside_zone: bool,
    /// Zones whose clearance margin contains the point
    pub zone_ids: Vec<u32>,
    pub valid: bool,
}

/// Check a point against every registered zone.
pub async fn check_point(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PointCheckQuery>,
) -> Result<Json<PointCheckResponse>, ApiError> {
    let field = state.zone_field()?;
    let point = Point::new(query.lat, query.lon);
    let zone_ids: Vec<u32> = field.zones_at(&point).map(|zone| zone.id).collect();

    Ok(Json(PointCheckResponse {
        inside_zone: !zone_ids.is_empty(),
        valid: field.point_valid(&point),
        zone_ids,
    }))
}
