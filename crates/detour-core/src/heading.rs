//! Turning arcs from the vehicle's current heading onto a path's first bearing.

use crate::error::{ensure_positive, PlanResult};
use crate::models::Point;
use crate::waypoints::MAX_WAYPOINTS;
use crate::spatial::{angle_diff, bearing, destination, normalize_bearing};

/// Outcome of [`adjust_heading`].
#[derive(Debug, Clone, PartialEq)]
pub enum HeadingAdjustment {
    /// The path's first leg is already within the turn limit.
    NoAdjustment,
    /// Two candidate arcs, turning clockwise and counter-clockwise.
    Adjusted {
        right_arc: Vec<Point>,
        left_arc: Vec<Point>,
    },
}

/// Build turning arcs from `path[0]` when the heading change onto the first
/// leg exceeds `max_turn_deg`.
///
/// Each arc turns by `max_turn_deg` per `turn_step_m` step until it is within
/// the limit of the target bearing, then takes one final step on the target
/// bearing. The last arc point is where planning restarts.
pub fn adjust_heading(
    current_heading: f64,
    path: &[Point],
    max_turn_deg: f64,
    turn_step_m: f64,
) -> PlanResult<HeadingAdjustment> {
    ensure_turn_limit(max_turn_deg)?;
    ensure_positive("turn_step_m", turn_step_m)?;
    if !current_heading.is_finite() {
        return Err(crate::PlanError::invalid("current heading must be finite"));
    }

    let [first, second, ..] = path else {
        return Ok(HeadingAdjustment::NoAdjustment);
    };
    let target = bearing(first, second);
    if angle_diff(current_heading, target).abs() <= max_turn_deg {
        return Ok(HeadingAdjustment::NoAdjustment);
    }

    Ok(HeadingAdjustment::Adjusted {
        right_arc: turning_arc(*first, current_heading, target, max_turn_deg, turn_step_m, 1.0),
        left_arc: turning_arc(*first, current_heading, target, max_turn_deg, turn_step_m, -1.0),
    })
}

/// A full circle must fit in [`MAX_WAYPOINTS`] turning steps.
pub(crate) fn ensure_turn_limit(max_turn_deg: f64) -> PlanResult<()> {
    ensure_positive("max_turn_angle_deg", max_turn_deg)?;
    if 360.0 / max_turn_deg > MAX_WAYPOINTS as f64 {
        return Err(crate::PlanError::invalid(format!(
            "max_turn_angle_deg {max_turn_deg} needs more than {MAX_WAYPOINTS} turning steps"
        )));
    }
    Ok(())
}

fn turning_arc(
    origin: Point,
    current_heading: f64,
    target: f64,
    max_turn_deg: f64,
    step_m: f64,
    direction: f64,
) -> Vec<Point> {
    // One full revolution is always enough to come within the limit.
    let max_turns = (360.0 / max_turn_deg).ceil() as usize + 1;
    let mut arc = vec![origin];
    let mut heading = normalize_bearing(current_heading);
    let mut last = origin;

    for _ in 0..max_turns {
        if angle_diff(heading, target).abs() <= max_turn_deg {
            break;
        }
        heading = normalize_bearing(heading + direction * max_turn_deg);
        last = destination(&last, step_m, heading);
        arc.push(last);
    }

    arc.push(destination(&last, step_m, target));
    arc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::distance;

    const ORIGIN: Point = Point::new(40.23221, 29.00999);

    fn path_heading(bearing_deg: f64) -> Vec<Point> {
        vec![ORIGIN, destination(&ORIGIN, 10.0, bearing_deg)]
    }

    #[test]
    fn small_turns_need_no_adjustment() {
        let path = path_heading(250.0);
        assert_eq!(
            adjust_heading(245.0, &path, 7.0, 10.0).unwrap(),
            HeadingAdjustment::NoAdjustment
        );
        assert_eq!(
            adjust_heading(90.0, &path[..1], 7.0, 10.0).unwrap(),
            HeadingAdjustment::NoAdjustment
        );
    }

    #[test]
    fn arcs_turn_in_opposite_directions_and_finish_on_target() {
        let target = 250.0;
        let path = path_heading(target);
        let HeadingAdjustment::Adjusted {
            right_arc,
            left_arc,
        } = adjust_heading(90.0, &path, 7.0, 10.0).unwrap()
        else {
            panic!("expected an adjustment");
        };

        for arc in [&right_arc, &left_arc] {
            assert_eq!(arc[0], ORIGIN);
            for pair in arc.windows(2) {
                assert!((distance(&pair[0], &pair[1]) * 1000.0 - 10.0).abs() < 0.01);
            }
            let n = arc.len();
            let last_leg = bearing(&arc[n - 2], &arc[n - 1]);
            assert!(angle_diff(last_leg, target).abs() < 0.01);
        }

        // 90 -> 250 clockwise is 160 degrees (22 turns), counter-clockwise 200 (28 turns)
        assert_eq!(right_arc.len(), 1 + 22 + 1);
        assert_eq!(left_arc.len(), 1 + 28 + 1);
        let first_right = bearing(&right_arc[0], &right_arc[1]);
        let first_left = bearing(&left_arc[0], &left_arc[1]);
        assert!((first_right - 97.0).abs() < 0.01);
        assert!((first_left - 83.0).abs() < 0.01);
    }

    #[test]
    fn rejects_non_positive_turn_limit() {
        assert!(adjust_heading(0.0, &path_heading(180.0), 0.0, 10.0).is_err());
        assert!(adjust_heading(f64::NAN, &path_heading(180.0), 7.0, 10.0).is_err());
        assert!(adjust_heading(0.0, &path_heading(180.0), 1e-9, 10.0).is_err());
    }
}
