//! End-to-end route pipeline: heading arcs, planning, refinement.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::config::{Capabilities, PlannerConfig};
use crate::error::PlanResult;
use crate::heading::{adjust_heading, HeadingAdjustment};
use crate::models::{Boundary, PlanStatus, Point, TurnDirection, Zone};
use crate::planner::plan_path;
use crate::postprocess::{legs_clear, optimize_path, smooth_path, thin_path};
use crate::spatial::path_length_m;
use crate::waypoints::{ensure_waypoint_budget, generate_waypoints};
use crate::zones::ZoneField;

/// One routing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub start: Point,
    pub goal: Point,
    /// Vehicle heading in degrees; enables turning arcs when set.
    #[serde(default)]
    pub current_heading: Option<f64>,
}

/// A planned route, optionally prefixed by a turning arc.
///
/// When `arc` is non-empty its last point is the first point of `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub status: PlanStatus,
    pub arc: Vec<Point>,
    pub path: Vec<Point>,
    pub via: Vec<Point>,
    pub iterations: usize,
    pub turn: TurnDirection,
}

impl Route {
    /// Total length in meters, arc included.
    pub fn length_m(&self) -> f64 {
        path_length_m(&self.arc) + path_length_m(&self.path)
    }

    /// Number of points yielded by [`Route::into_points`].
    pub fn point_count(&self) -> usize {
        self.arc.len().saturating_sub(1) + self.path.len()
    }

    pub fn into_points(self) -> RouteStream {
        let mut arc = self.arc;
        arc.pop();
        RouteStream {
            arc: arc.into_iter(),
            path: self.path.into_iter(),
        }
    }
}

/// Arc points (without the joint) followed by the planned path.
#[derive(Debug, Clone)]
pub struct RouteStream {
    arc: std::vec::IntoIter<Point>,
    path: std::vec::IntoIter<Point>,
}

impl Iterator for RouteStream {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        self.arc.next().or_else(|| self.path.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.arc.len() + self.path.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for RouteStream {}

impl FusedIterator for RouteStream {}

/// Planner bound to one zone field and configuration.
#[derive(Debug, Clone)]
pub struct Navigator {
    field: ZoneField,
    config: PlannerConfig,
}

impl Navigator {
    pub fn new(
        zones: Vec<Zone>,
        boundary: Option<Boundary>,
        config: PlannerConfig,
    ) -> PlanResult<Self> {
        config.validate()?;
        let field = ZoneField::new(zones, boundary, config.clearance)?;
        Ok(Self { field, config })
    }

    pub fn field(&self) -> &ZoneField {
        &self.field
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn capabilities(&self, request: &PlanRequest) -> Capabilities {
        Capabilities {
            boundary: self.field.boundary().is_some(),
            heading_adjustment: request.current_heading.is_some(),
        }
    }

    /// Plan a route for `request`.
    ///
    /// With a heading set and the first leg beyond the turn limit, both
    /// turning arcs are planned and the clear one (shorter if both are) is
    /// returned. If neither is clear the shorter is returned as exhausted.
    pub fn navigate(&self, request: &PlanRequest) -> PlanResult<Route> {
        ensure_waypoint_budget(request.start, request.goal, self.config.step_size_km)?;
        let capabilities = self.capabilities(request);
        let heading = match request.current_heading {
            Some(heading) if capabilities.heading_adjustment => heading,
            _ => return self.plan_leg(request.start, Vec::new(), request.goal, TurnDirection::None),
        };

        let straight = generate_waypoints(request.start, request.goal, self.config.step_size_km)?;
        let adjustment = adjust_heading(
            heading,
            &straight,
            self.config.max_turn_angle_deg,
            self.config.turn_step_m,
        )?;
        let (right_arc, left_arc) = match adjustment {
            HeadingAdjustment::NoAdjustment => {
                return self.plan_leg(request.start, Vec::new(), request.goal, TurnDirection::None)
            }
            HeadingAdjustment::Adjusted {
                right_arc,
                left_arc,
            } => (right_arc, left_arc),
        };

        let right = self.plan_leg(request.start, right_arc, request.goal, TurnDirection::Right)?;
        let left = self.plan_leg(request.start, left_arc, request.goal, TurnDirection::Left)?;
        tracing::debug!(
            right_clear = right.status.is_success(),
            right_m = right.length_m(),
            left_clear = left.status.is_success(),
            left_m = left.length_m(),
            "planned both turning arcs"
        );
        Ok(choose_route(right, left))
    }

    /// Plan from the end of `arc` (or from `start` without one) and refine
    /// the result.
    fn plan_leg(
        &self,
        start: Point,
        arc: Vec<Point>,
        goal: Point,
        turn: TurnDirection,
    ) -> PlanResult<Route> {
        let start = arc.last().copied().unwrap_or(start);

        let outcome = plan_path(&self.field, start, goal, &self.config)?;
        let mut status = outcome.status;
        if !self.field.path_clear(&arc) {
            status = PlanStatus::Exhausted;
        }

        let path = if outcome.status.is_success() {
            self.refine(&outcome.path, &outcome.corners)?
        } else {
            outcome.path
        };

        Ok(Route {
            status,
            arc,
            path,
            via: outcome.via,
            iterations: outcome.iterations,
            turn,
        })
    }

    /// Thin the raw path when configured, keeping the detour corners it was
    /// stitched through. If a thinned leg cuts a zone, or thinning is off,
    /// the raw path is smoothed (or pruned) instead.
    fn refine(&self, path: &[Point], corners: &[Point]) -> PlanResult<Vec<Point>> {
        let step_km = self.config.step_size_km;
        if let Some(n) = self.config.keep_every_n {
            let thinned = thin_path(path, corners, n)?;
            if legs_clear(&self.field, &thinned, step_km) {
                return Ok(thinned);
            }
            tracing::debug!(
                keep_every_n = n,
                points = thinned.len(),
                "thinned path cuts a zone; refining the full path instead"
            );
        }
        if self.config.smoothing {
            smooth_path(&self.field, path, step_km)
        } else {
            optimize_path(&self.field, path, step_km)
        }
    }
}

fn choose_route(right: Route, left: Route) -> Route {
    match (right.status.is_success(), left.status.is_success()) {
        (true, false) => right,
        (false, true) => left,
        _ if left.length_m() < right.length_m() => left,
        _ => right,
    }
}
