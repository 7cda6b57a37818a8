//! Fixed-step waypoint generation along great-circle bearings.

use crate::error::{ensure_positive, PlanError, PlanResult};
use crate::models::Point;
use crate::spatial::{bearing, destination, distance};

/// Largest number of steps a single start-to-goal leg may take.
///
/// 10 m steps cover 1000 km; anything finer over a longer leg is rejected.
pub const MAX_WAYPOINTS: usize = 100_000;

/// Step from `start` toward `goal` every `step_km`, re-aiming at the goal
/// after each step, and finish exactly on `goal`.
///
/// Returns `[start]` alone when both points coincide.
pub fn generate_waypoints(start: Point, goal: Point, step_km: f64) -> PlanResult<Vec<Point>> {
    ensure_waypoint_budget(start, goal, step_km)?;
    Ok(generate_unchecked(start, goal, step_km))
}

/// Reject a step size that would need more than [`MAX_WAYPOINTS`] steps
/// from `start` to `goal`.
pub fn ensure_waypoint_budget(start: Point, goal: Point, step_km: f64) -> PlanResult<()> {
    ensure_positive("step_size_km", step_km)?;
    if !start.is_finite() || !goal.is_finite() {
        return Err(PlanError::invalid("start and goal must be finite coordinates"));
    }
    let steps = distance(&start, &goal) / step_km;
    if steps > MAX_WAYPOINTS as f64 {
        return Err(PlanError::invalid(format!(
            "step_size_km {step_km} needs {steps:.0} waypoints, more than {MAX_WAYPOINTS}"
        )));
    }
    Ok(())
}

/// Callers must have validated `step_km` already.
pub(crate) fn generate_unchecked(start: Point, goal: Point, step_km: f64) -> Vec<Point> {
    if start == goal {
        return vec![start];
    }

    let total_km = distance(&start, &goal);
    // Each step closes the gap by one step length; the slack covers rounding.
    let max_steps = ((total_km / step_km).ceil() as usize).saturating_add(2);
    let mut waypoints = Vec::with_capacity(max_steps.min(MAX_WAYPOINTS) + 1);
    waypoints.push(start);

    let mut current = start;
    let mut steps = 0usize;
    while distance(&current, &goal) > step_km && steps < max_steps {
        current = destination(&current, step_km * 1000.0, bearing(&current, &goal));
        waypoints.push(current);
        steps += 1;
    }

    waypoints.push(goal);
    waypoints
}
