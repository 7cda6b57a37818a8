//! Nearest-first stitching of via points into one continuous path.

use crate::models::Point;
use crate::spatial::distance;
use crate::waypoints::generate_unchecked;
use crate::zones::ZoneField;

/// A stitched path plus the break index used for bearing recovery.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchedPath {
    pub path: Vec<Point>,
    /// Index where the final (last via point to goal) segment starts,
    /// reported only when the via portion before it is not clear.
    pub final_segment_start: Option<usize>,
}

/// Visit every via point greedily, nearest to the current location first,
/// then head for the goal.
///
/// Sub-paths are joined without duplicating their shared endpoint. Equal
/// distances resolve to the via point listed first.
pub fn stitch_path(
    field: &ZoneField,
    origin: Point,
    via_points: &[Point],
    goal: Point,
    step_km: f64,
) -> StitchedPath {
    let mut path = Vec::new();
    let mut current = origin;
    let mut remaining: Vec<Point> = via_points.to_vec();

    while let Some(next_idx) = nearest_index(&current, &remaining) {
        let next = remaining.remove(next_idx);
        let segment = generate_unchecked(current, next, step_km);
        path.extend_from_slice(&segment[..segment.len() - 1]);
        current = next;
    }

    let final_segment_start = if field.path_clear(&path) {
        None
    } else {
        Some(path.len())
    };

    path.extend(generate_unchecked(current, goal, step_km));
    StitchedPath {
        path,
        final_segment_start,
    }
}

fn nearest_index(from: &Point, candidates: &[Point]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, candidate) in candidates.iter().enumerate() {
        let dist = distance(from, candidate);
        if best.map_or(true, |(_, best_dist)| dist < best_dist) {
            best = Some((idx, dist));
        }
    }
    best.map(|(idx, _)| idx)
}
