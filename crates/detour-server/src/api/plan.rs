//! Route planning endpoint.

use axum::{extract::State, Json};
use detour_core::{
    Boundary, Navigator, PlanRequest, PlanStatus, PlannerConfig, Point, Route, TurnDirection,
    Zone,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::ApiError;
use crate::state::AppState;

/// Zone given inline with a plan request.
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneInput {
    /// Defaults to the zone's position in the request
    #[serde(default)]
    pub id: Option<u32>,
    pub lat: f64,
    pub lon: f64,
    pub radius_m: f64,
}

#[derive(Debug, Deserialize)]
pub struct PlanRouteRequest {
    pub start: Point,
    pub goal: Point,
    #[serde(default)]
    pub current_heading: Option<f64>,
    /// Inline zones; registered zones are used when absent.
    #[serde(default)]
    pub zones: Option<Vec<ZoneInput>>,
    #[serde(default)]
    pub boundary: Option<Boundary>,
    /// Overrides the server's planner defaults.
    #[serde(default)]
    pub config: Option<PlannerConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanRouteResponse {
    pub status: PlanStatus,
    pub turn: TurnDirection,
    pub iterations: usize,
    pub length_m: f64,
    pub via: Vec<Point>,
    /// Turning arc followed by the planned path
    pub points: Vec<Point>,
}

impl From<Route> for PlanRouteResponse {
    fn from(route: Route) -> Self {
        let length_m = route.length_m();
        Self {
            status: route.status,
            turn: route.turn,
            iterations: route.iterations,
            length_m,
            via: route.via.clone(),
            points: route.into_points().collect(),
        }
    }
}

/// Plan a route; an exhausted search is still a `200` with status `exhausted`.
pub async fn plan_route(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlanRouteRequest>,
) -> Result<Json<PlanRouteResponse>, ApiError> {
    let config = req
        .config
        .unwrap_or_else(|| state.config().planner.clone());
    let zones: Vec<Zone> = match req.zones {
        Some(inline) => inline
            .into_iter()
            .enumerate()
            .map(|(idx, z)| Zone::new(z.id.unwrap_or(idx as u32), z.lat, z.lon, z.radius_m))
            .collect(),
        None => state.get_zones().into_iter().map(|r| r.zone).collect(),
    };
    let zone_count = zones.len();
    let navigator = Navigator::new(zones, req.boundary, config)?;
    let request = PlanRequest {
        start: req.start,
        goal: req.goal,
        current_heading: req.current_heading,
    };

    let route = tokio::task::spawn_blocking(move || navigator.navigate(&request))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;

    tracing::info!(
        status = ?route.status,
        turn = ?route.turn,
        iterations = route.iterations,
        zones = zone_count,
        "Planned route"
    );
    Ok(Json(route.into()))
}
