//! Bounded replanning loop around keep-out zones.
//!
//! Each iteration finds the first intruding zone, searches bypass points on
//! both sides of it, and re-stitches the whole path through the accumulated
//! via points. The loop ends once the path is clear or the iteration budget
//! is spent.

use crate::config::{Capabilities, PlannerConfig};
use crate::detour::{search_detour, select_candidates};
use crate::error::PlanResult;
use crate::models::{PlanOutcome, PlanStatus, Point};
use crate::spatial::bearing;
use crate::stitch::{stitch_path, StitchedPath};
use crate::waypoints::generate_waypoints;
use crate::zones::ZoneField;

/// Per-run accumulator threaded through the iterations.
struct LoopState {
    path: Vec<Point>,
    via: Vec<Point>,
    /// Via points the current path was stitched through
    corners: Vec<Point>,
    preferred: Option<Point>,
    final_segment_start: Option<usize>,
    iterations: usize,
}

/// Plan a zone-clear path from `start` to `goal`.
///
/// Only configuration problems are errors; running out of iterations yields
/// [`PlanStatus::Exhausted`] with the last attempted path.
pub fn plan_path(
    field: &ZoneField,
    start: Point,
    goal: Point,
    config: &PlannerConfig,
) -> PlanResult<PlanOutcome> {
    config.validate()?;
    let step_km = config.step_size_km;
    let capabilities = Capabilities {
        boundary: field.boundary().is_some(),
        heading_adjustment: false,
    };

    let mut state = LoopState {
        path: generate_waypoints(start, goal, step_km)?,
        via: Vec::new(),
        corners: Vec::new(),
        preferred: None,
        final_segment_start: None,
        iterations: 0,
    };

    while !field.path_clear(&state.path) && state.iterations < config.max_iterations {
        let Some(run) = field.first_intrusion_run(&state.path) else {
            tracing::warn!("path leaves the boundary without entering a zone; nothing to detour");
            break;
        };
        if state.path.len() < 2 {
            break;
        }
        let zone = run.zone;

        let seg_idx = match state.final_segment_start {
            Some(idx) if idx >= 2 => idx - 2,
            _ => state.path.len() - 2,
        };
        let current_bearing = bearing(&state.path[seg_idx], &state.path[seg_idx + 1]);
        let anchor = state.via.last().copied().unwrap_or(goal);

        tracing::debug!(
            iteration = state.iterations,
            zone = zone.id,
            entry = run.entry_index,
            midpoint = run.midpoint_index(),
            bearing = current_bearing,
            "path intrudes on zone"
        );

        let candidates = search_detour(field, zone, anchor, current_bearing, step_km, &config.detour);
        let (preferred, alternative) = select_candidates(
            field,
            capabilities,
            &state.preferred.unwrap_or(goal),
            candidates.right,
            candidates.left,
        );

        for candidate in [preferred, alternative, preferred] {
            let corners = with_candidate(candidate, &state.via);
            let StitchedPath {
                path,
                final_segment_start,
            } = stitch_path(field, start, &corners, goal, step_km);
            state.path = path;
            state.corners = corners;
            state.final_segment_start = final_segment_start;
            if field.path_clear(&state.path) {
                break;
            }
        }

        state.via.push(preferred);
        state.preferred = Some(preferred);
        state.iterations += 1;
        tracing::debug!(
            iteration = state.iterations,
            via = state.via.len(),
            clear = field.path_clear(&state.path),
            "replanned"
        );
    }

    let status = if field.path_clear(&state.path) {
        tracing::info!(
            iterations = state.iterations,
            points = state.path.len(),
            "clear path found"
        );
        PlanStatus::Success
    } else {
        tracing::info!(
            iterations = state.iterations,
            "iteration budget exhausted; returning best-effort path"
        );
        PlanStatus::Exhausted
    };

    Ok(PlanOutcome {
        status,
        path: state.path,
        via: state.via,
        corners: state.corners,
        iterations: state.iterations,
    })
}

fn with_candidate(candidate: Point, via: &[Point]) -> Vec<Point> {
    let mut points = Vec::with_capacity(via.len() + 1);
    points.push(candidate);
    points.extend_from_slice(via);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClearanceMargin;
    use crate::models::{Boundary, Zone};
    use crate::spatial::distance;

    const START: Point = Point::new(40.23221, 29.00999);
    const GOAL: Point = Point::new(40.23008, 29.00499);

    fn default_zones() -> Vec<Zone> {
        vec![
            Zone::new(0, 40.23260922, 29.00573015, 50.0),
            Zone::new(1, 40.23351019, 28.99976492, 50.0),
            Zone::new(2, 40.23105297, 29.00744677, 75.0),
            Zone::new(3, 40.23090554, 29.00221109, 170.0),
        ]
    }

    fn default_field() -> ZoneField {
        ZoneField::new(default_zones(), None, ClearanceMargin::default()).unwrap()
    }

    fn assert_clearance(field: &ZoneField, path: &[Point]) {
        for point in path {
            for zone in field.zones() {
                let dist_m = distance(point, &zone.center) * 1000.0;
                assert!(
                    dist_m > field.clearance_margin_m(zone),
                    "{point:?} is {dist_m:.1}m from zone {}",
                    zone.id
                );
            }
        }
    }

    #[test]
    fn default_scenario_succeeds_with_detours() {
        let field = default_field();
        let config = PlannerConfig::default();
        assert_eq!(config.max_iterations, 3);

        let outcome = plan_path(&field, START, GOAL, &config).unwrap();
        assert_eq!(outcome.status, PlanStatus::Success);
        assert!(!outcome.via.is_empty());
        assert!(outcome.iterations <= config.max_iterations);
        assert_eq!(outcome.path.first(), Some(&START));
        assert_eq!(outcome.path.last(), Some(&GOAL));
        assert_clearance(&field, &outcome.path);
    }

    #[test]
    fn corners_lie_on_the_returned_path() {
        let field = default_field();
        let outcome = plan_path(&field, START, GOAL, &PlannerConfig::default()).unwrap();
        assert!(!outcome.corners.is_empty());
        for corner in &outcome.corners {
            assert!(outcome.path.contains(corner), "{corner:?} missing from path");
        }
    }

    #[test]
    fn empty_field_returns_straight_path() {
        let field = ZoneField::new(vec![], None, ClearanceMargin::default()).unwrap();
        let config = PlannerConfig::default();
        let outcome = plan_path(&field, START, GOAL, &config).unwrap();
        assert_eq!(outcome.status, PlanStatus::Success);
        assert_eq!(outcome.iterations, 0);
        assert!(outcome.via.is_empty());
        assert!(outcome.corners.is_empty());
        assert_eq!(
            outcome.path,
            generate_waypoints(START, GOAL, config.step_size_km).unwrap()
        );
    }

    #[test]
    fn zero_iterations_exhausts_with_straight_path() {
        let field = default_field();
        let config = PlannerConfig {
            max_iterations: 0,
            ..PlannerConfig::default()
        };
        let straight = generate_waypoints(START, GOAL, config.step_size_km).unwrap();
        assert!(!field.path_clear(&straight));

        let outcome = plan_path(&field, START, GOAL, &config).unwrap();
        assert_eq!(outcome.status, PlanStatus::Exhausted);
        assert_eq!(outcome.path, straight);
        assert!(outcome.via.is_empty());
        assert_eq!(outcome.iterations, 0);
    }

    #[test]
    fn multi_detour_scenarios_stay_within_budget() {
        let field = default_field();
        let config = PlannerConfig::default();
        let cases = [
            (Point::new(40.23107, 29.00900), Point::new(40.23323, 29.00200)),
            (Point::new(40.23187, 28.99960), GOAL),
            (Point::new(40.23392, 28.99619), GOAL),
            (Point::new(40.22844, 28.99969), Point::new(40.23323, 29.00200)),
        ];
        for (start, goal) in cases {
            let outcome = plan_path(&field, start, goal, &config).unwrap();
            assert!(outcome.iterations <= config.max_iterations);
            assert_eq!(outcome.via.len(), outcome.iterations);
            assert_eq!(outcome.status, PlanStatus::Success, "{start:?} -> {goal:?}");
            assert_clearance(&field, &outcome.path);
        }
    }

    #[test]
    fn boundary_run_keeps_points_inside_box() {
        let boundary = Boundary::from_points(vec![
            Point::new(40.2280, 28.9950),
            Point::new(40.2360, 29.0120),
        ])
        .unwrap();
        let field =
            ZoneField::new(default_zones(), Some(boundary.clone()), ClearanceMargin::default())
                .unwrap();
        let outcome = plan_path(&field, START, GOAL, &PlannerConfig::default()).unwrap();
        assert_eq!(outcome.status, PlanStatus::Success);
        assert!(outcome.path.iter().all(|p| boundary.contains(p)));
    }

    #[test]
    fn invalid_step_fails_before_planning() {
        let config = PlannerConfig {
            step_size_km: -1.0,
            ..PlannerConfig::default()
        };
        assert!(plan_path(&default_field(), START, GOAL, &config).is_err());
    }
}
