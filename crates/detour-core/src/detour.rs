//! Perpendicular detour search around an intruding zone.

use crate::config::{Capabilities, DetourConfig};
use crate::models::{Point, Zone};
use crate::spatial::{destination, distance};
use crate::waypoints::generate_unchecked;
use crate::zones::ZoneField;

/// Bypass points on both sides of a zone.
#[derive(Debug, Clone, PartialEq)]
pub struct DetourCandidates {
    pub right: Point,
    pub left: Point,
    /// Whether the sub-path to `right` was confirmed zone-clear
    pub right_clear: bool,
    pub left_clear: bool,
    pub right_probes: usize,
    pub left_probes: usize,
}

impl DetourCandidates {
    pub fn both_clear(&self) -> bool {
        self.right_clear && self.left_clear
    }
}

struct Side {
    bearing_deg: f64,
    point: Point,
    clear: bool,
    probes: usize,
}

impl Side {
    fn new(bearing_deg: f64, initial: Point) -> Self {
        Self {
            bearing_deg,
            point: initial,
            clear: false,
            probes: 0,
        }
    }
}

/// Search for a clear bypass point right and left of `zone`.
///
/// Offsets start at `radius + initial_dist` and shrink by the configured
/// decrement down to the floor. A side stops shrinking once the waypointed
/// sub-path from `anchor` to its candidate is clear. When the floor is hit
/// with a side still blocked, that side falls back to its initial-offset
/// candidate, which is not guaranteed clear.
pub fn search_detour(
    field: &ZoneField,
    zone: &Zone,
    anchor: Point,
    current_bearing: f64,
    step_km: f64,
    config: &DetourConfig,
) -> DetourCandidates {
    let center = zone.center;
    let initial_dist = config.initial_dist_m(zone.radius_m);
    let offset_point = |dist: f64, bearing_deg: f64| destination(&center, zone.radius_m + dist, bearing_deg);

    let right_bearing = current_bearing + 90.0;
    let left_bearing = current_bearing - 90.0;
    let right_initial = offset_point(initial_dist, right_bearing);
    let left_initial = offset_point(initial_dist, left_bearing);
    let mut sides = [
        Side::new(right_bearing, right_initial),
        Side::new(left_bearing, left_initial),
    ];

    for probe in 0..config.probe_budget(zone.radius_m) {
        let dist = initial_dist - probe as f64 * config.decrement_step_m;
        for side in sides.iter_mut().filter(|side| !side.clear) {
            side.point = offset_point(dist, side.bearing_deg);
            side.probes += 1;
            side.clear = field.path_clear(&generate_unchecked(anchor, side.point, step_km));
            tracing::trace!(
                zone = zone.id,
                dist_m = dist,
                bearing = side.bearing_deg,
                clear = side.clear,
                "detour probe"
            );
        }
        if sides.iter().all(|side| side.clear) {
            break;
        }
    }

    let [right, left] = sides;
    DetourCandidates {
        right: if right.clear { right.point } else { right_initial },
        left: if left.clear { left.point } else { left_initial },
        right_clear: right.clear,
        left_clear: left.clear,
        right_probes: right.probes,
        left_probes: left.probes,
    }
}

/// Order two candidates as `(preferred, alternative)`: the one closer to
/// `reference` wins, ties go to `right`.
pub fn rank_candidates(reference: &Point, right: Point, left: Point) -> (Point, Point) {
    if distance(reference, &right) <= distance(reference, &left) {
        (right, left)
    } else {
        (left, right)
    }
}

/// Like [`rank_candidates`], but with a boundary configured a candidate that
/// fails the full validity check forces the other one into both slots.
pub fn select_candidates(
    field: &ZoneField,
    capabilities: Capabilities,
    reference: &Point,
    right: Point,
    left: Point,
) -> (Point, Point) {
    if capabilities.boundary {
        match (field.point_valid(&right), field.point_valid(&left)) {
            (true, false) => return (right, right),
            (false, true) => return (left, left),
            _ => {}
        }
    }
    rank_candidates(reference, right, left)
}
