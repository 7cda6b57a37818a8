//! Path refinement: pruning, smoothing and waypoint thinning.

use crate::error::{ensure_positive, PlanError, PlanResult};
use crate::models::Point;
use crate::waypoints::generate_unchecked;
use crate::zones::ZoneField;

/// Smoothed curves must reproduce the endpoints within this many degrees.
const ENDPOINT_EPSILON_DEG: f64 = 1e-9;
const SMOOTHING_OVERSAMPLE: usize = 10;

/// Reason a smoothed curve was thrown away.
#[derive(Debug)]
enum SmoothingUnsafe {
    Intrudes,
    EndpointDrift,
}

/// Drop waypoints that can be skipped without crossing a zone.
///
/// An interior point survives only if the straight waypointed leg from the
/// last kept point to its successor is blocked. The pass repeats until no
/// point is removed, so the result is a fixed point of this function.
pub fn optimize_path(field: &ZoneField, path: &[Point], step_km: f64) -> PlanResult<Vec<Point>> {
    ensure_positive("step_size_km", step_km)?;
    let mut current = path.to_vec();
    loop {
        let pruned = prune_pass(field, &current, step_km);
        if pruned.len() == current.len() {
            return Ok(pruned);
        }
        current = pruned;
    }
}

fn prune_pass(field: &ZoneField, path: &[Point], step_km: f64) -> Vec<Point> {
    let [first, .., last] = path else {
        return path.to_vec();
    };
    let mut kept = vec![*first];
    for (idx, point) in path.iter().enumerate().take(path.len() - 1).skip(1) {
        let anchor = kept[kept.len() - 1];
        if !field.path_clear(&generate_unchecked(anchor, path[idx + 1], step_km)) {
            kept.push(*point);
        }
    }
    kept.push(*last);
    kept
}

/// True when the waypointed leg between every pair of consecutive points
/// is clear.
pub(crate) fn legs_clear(field: &ZoneField, path: &[Point], step_km: f64) -> bool {
    path.windows(2)
        .all(|pair| field.path_clear(&generate_unchecked(pair[0], pair[1], step_km)))
}

/// Resample the path along a Catmull-Rom curve at ten times its density.
///
/// If the curve intrudes on a zone, leaves the boundary, or drifts off the
/// endpoints, the pruned path from [`optimize_path`] is returned instead.
pub fn smooth_path(field: &ZoneField, path: &[Point], step_km: f64) -> PlanResult<Vec<Point>> {
    ensure_positive("step_size_km", step_km)?;
    match try_smooth(field, path) {
        Ok(smoothed) => Ok(smoothed),
        Err(reason) => {
            tracing::debug!(?reason, "smoothed path rejected; using pruned path");
            optimize_path(field, path, step_km)
        }
    }
}

fn try_smooth(field: &ZoneField, path: &[Point]) -> Result<Vec<Point>, SmoothingUnsafe> {
    let smoothed = catmull_rom(path, path.len() * SMOOTHING_OVERSAMPLE);
    if let (Some(a), Some(b), Some(c), Some(d)) =
        (path.first(), smoothed.first(), path.last(), smoothed.last())
    {
        if !a.approx_eq(b, ENDPOINT_EPSILON_DEG) || !c.approx_eq(d, ENDPOINT_EPSILON_DEG) {
            return Err(SmoothingUnsafe::EndpointDrift);
        }
    }
    if !field.path_clear(&smoothed) {
        return Err(SmoothingUnsafe::Intrudes);
    }
    Ok(smoothed)
}

/// Uniform Catmull-Rom spline through every point, sampled evenly in the
/// curve parameter. Ends are clamped by repeating the first and last point.
fn catmull_rom(points: &[Point], samples: usize) -> Vec<Point> {
    if points.len() < 2 || samples < 2 {
        return points.to_vec();
    }
    let segments = points.len() - 1;
    let mut curve = Vec::with_capacity(samples);
    curve.push(points[0]);

    for k in 1..samples - 1 {
        let u = k as f64 * segments as f64 / (samples - 1) as f64;
        let seg = (u.floor() as usize).min(segments - 1);
        let t = u - seg as f64;
        let p0 = points[seg.saturating_sub(1)];
        let p1 = points[seg];
        let p2 = points[seg + 1];
        let p3 = points[(seg + 2).min(segments)];
        curve.push(Point::new(
            catmull_rom_component(p0.lat, p1.lat, p2.lat, p3.lat, t),
            catmull_rom_component(p0.lon, p1.lon, p2.lon, p3.lon, t),
        ));
    }

    curve.push(points[segments]);
    curve
}

fn catmull_rom_component(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Keep via points, every `keep_every_n`-th index, and the last point.
pub fn thin_path(path: &[Point], via_points: &[Point], keep_every_n: usize) -> PlanResult<Vec<Point>> {
    if keep_every_n < 1 {
        return Err(PlanError::invalid("keep_every_n must be at least 1"));
    }
    let last = path.len().saturating_sub(1);
    Ok(path
        .iter()
        .enumerate()
        .filter(|(idx, point)| {
            idx % keep_every_n == 0 || *idx == last || via_points.contains(point)
        })
        .map(|(_, point)| *point)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClearanceMargin, PlannerConfig};
    use crate::models::Zone;
    use crate::planner::plan_path;
    use crate::spatial::destination;

    const START: Point = Point::new(40.23221, 29.00999);
    const GOAL: Point = Point::new(40.23008, 29.00499);

    fn default_field() -> ZoneField {
        ZoneField::new(
            vec![
                Zone::new(0, 40.23260922, 29.00573015, 50.0),
                Zone::new(1, 40.23351019, 28.99976492, 50.0),
                Zone::new(2, 40.23105297, 29.00744677, 75.0),
                Zone::new(3, 40.23090554, 29.00221109, 170.0),
            ],
            None,
            ClearanceMargin::default(),
        )
        .unwrap()
    }

    fn planned(field: &ZoneField) -> Vec<Point> {
        plan_path(field, START, GOAL, &PlannerConfig::default())
            .unwrap()
            .path
    }

    #[test]
    fn optimize_keeps_endpoints_and_stays_clear() {
        let field = default_field();
        let path = planned(&field);
        let optimized = optimize_path(&field, &path, 0.01).unwrap();

        assert_eq!(optimized.first(), path.first());
        assert_eq!(optimized.last(), path.last());
        assert!(optimized.len() < path.len());
        assert!(legs_clear(&field, &optimized, 0.01));
        assert!(!legs_clear(&field, &[START, GOAL], 0.01));
    }

    #[test]
    fn optimize_is_idempotent() {
        let field = default_field();
        let once = optimize_path(&field, &planned(&field), 0.01).unwrap();
        let twice = optimize_path(&field, &once, 0.01).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn optimize_collapses_open_straight_line() {
        let field = ZoneField::new(vec![], None, ClearanceMargin::default()).unwrap();
        let path = generate_unchecked(START, GOAL, 0.01);
        assert_eq!(optimize_path(&field, &path, 0.01).unwrap(), vec![START, GOAL]);
        assert_eq!(optimize_path(&field, &path[..1], 0.01).unwrap(), vec![START]);
    }

    #[test]
    fn smooth_resamples_and_pins_endpoints() {
        let field = default_field();
        let path = planned(&field);
        let smoothed = smooth_path(&field, &path, 0.01).unwrap();

        assert_eq!(smoothed.len(), path.len() * 10);
        assert_eq!(smoothed.first(), path.first());
        assert_eq!(smoothed.last(), path.last());
        assert!(field.path_clear(&smoothed));
    }

    #[test]
    fn unsafe_smoothing_falls_back_to_pruned_path() {
        // The curve bulges east of the northbound leg into a zone that sits
        // between two waypoints.
        let corner = Point::new(40.0, 29.0);
        let zone_center = destination(&destination(&corner, 15.0, 180.0), 5.0, 90.0);
        let field = ZoneField::new(
            vec![Zone::new(0, zone_center.lat, zone_center.lon, 8.0)],
            None,
            ClearanceMargin::Fixed { meters: 0.0 },
        )
        .unwrap();
        let path = vec![
            destination(&corner, 60.0, 180.0),
            destination(&corner, 30.0, 180.0),
            corner,
            destination(&corner, 30.0, 270.0),
            destination(&corner, 60.0, 270.0),
        ];
        assert!(field.path_clear(&path));

        let smoothed = smooth_path(&field, &path, 0.01).unwrap();
        assert!(field.path_clear(&smoothed));
        assert_eq!(smoothed, optimize_path(&field, &path, 0.01).unwrap());
    }

    #[test]
    fn thin_keeps_via_points_stride_and_last() {
        let path: Vec<Point> = (0..10)
            .map(|i| destination(&START, i as f64 * 10.0, 90.0))
            .collect();
        let via = [path[5]];
        let thinned = thin_path(&path, &via, 3).unwrap();
        assert_eq!(
            thinned,
            vec![path[0], path[3], path[5], path[6], path[9]]
        );
        assert_eq!(thin_path(&path, &[], 1).unwrap(), path);
        assert!(matches!(
            thin_path(&path, &via, 0),
            Err(PlanError::InvalidConfig(_))
        ));
    }
}
