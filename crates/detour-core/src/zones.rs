//! Keep-out zone field: point and path clearance queries.

use crate::config::ClearanceMargin;
use crate::error::PlanResult;
use crate::models::{Boundary, Point, Zone};
use crate::spatial::haversine_distance;

/// First contiguous stretch of a path inside one zone.
#[derive(Debug, Clone, PartialEq)]
pub struct IntrusionRun<'a> {
    pub zone: &'a Zone,
    pub entry_index: usize,
    /// Last index still inside the zone
    pub exit_index: usize,
}

impl IntrusionRun<'_> {
    pub fn midpoint_index(&self) -> usize {
        self.entry_index + (self.exit_index - self.entry_index + 1) / 2
    }
}

/// Read-only set of keep-out zones plus an optional boundary.
///
/// Safe to share immutably between concurrent planners.
#[derive(Debug, Clone)]
pub struct ZoneField {
    zones: Vec<Zone>,
    boundary: Option<Boundary>,
    clearance: ClearanceMargin,
}

impl ZoneField {
    pub fn new(
        zones: Vec<Zone>,
        boundary: Option<Boundary>,
        clearance: ClearanceMargin,
    ) -> PlanResult<Self> {
        clearance.validate()?;
        for zone in &zones {
            zone.validate()?;
        }
        Ok(Self {
            zones,
            boundary,
            clearance,
        })
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn boundary(&self) -> Option<&Boundary> {
        self.boundary.as_ref()
    }

    pub fn clearance(&self) -> ClearanceMargin {
        self.clearance
    }

    /// Minimum distance in meters a point must keep from the zone center.
    pub fn clearance_margin_m(&self, zone: &Zone) -> f64 {
        self.clearance.margin_m(zone.radius_m)
    }

    fn zone_contains(&self, zone: &Zone, point: &Point) -> bool {
        haversine_distance(point.lat, point.lon, zone.center.lat, zone.center.lon)
            <= self.clearance_margin_m(zone)
    }

    /// First zone (by index) whose clearance margin contains the point.
    pub fn zone_at(&self, point: &Point) -> Option<&Zone> {
        self.zones.iter().find(|zone| self.zone_contains(zone, point))
    }

    /// Every zone whose clearance margin contains the point.
    pub fn zones_at<'a>(&'a self, point: &'a Point) -> impl Iterator<Item = &'a Zone> + 'a {
        self.zones
            .iter()
            .filter(move |zone| self.zone_contains(zone, point))
    }

    pub fn point_in_zone(&self, point: &Point) -> bool {
        self.zone_at(point).is_some()
    }

    /// Always true when no boundary is configured.
    pub fn point_in_bounds(&self, point: &Point) -> bool {
        self.boundary
            .as_ref()
            .map_or(true, |boundary| boundary.contains(point))
    }

    pub fn point_valid(&self, point: &Point) -> bool {
        !self.point_in_zone(point) && self.point_in_bounds(point)
    }

    pub fn path_clear(&self, path: &[Point]) -> bool {
        path.iter().all(|point| self.point_valid(point))
    }

    /// First point in traversal order inside a zone, with that zone.
    pub fn first_intrusion(&self, path: &[Point]) -> Option<(Point, &Zone)> {
        path.iter()
            .find_map(|point| self.zone_at(point).map(|zone| (*point, zone)))
    }

    /// The first run of consecutive points inside the same zone.
    pub fn first_intrusion_run(&self, path: &[Point]) -> Option<IntrusionRun<'_>> {
        let (entry_index, zone) = path
            .iter()
            .enumerate()
            .find_map(|(idx, point)| self.zone_at(point).map(|zone| (idx, zone)))?;
        let exit_index = path[entry_index..]
            .iter()
            .take_while(|point| self.zone_contains(zone, point))
            .count()
            + entry_index
            - 1;
        Some(IntrusionRun {
            zone,
            entry_index,
            exit_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::destination;

    fn field() -> ZoneField {
        ZoneField::new(
            vec![
                Zone::new(0, 40.23260922, 29.00573015, 50.0),
                Zone::new(1, 40.23351019, 28.99976492, 50.0),
            ],
            None,
            ClearanceMargin::Fixed { meters: 30.0 },
        )
        .unwrap()
    }

    #[test]
    fn clearance_margin_not_raw_radius_defines_inside() {
        let field = field();
        let zone = &field.zones()[0];
        let at_60m = destination(&zone.center, 60.0, 10.0);
        let at_81m = destination(&zone.center, 81.0, 10.0);
        assert!(field.point_in_zone(&at_60m));
        assert!(!field.point_in_zone(&at_81m));
        assert_eq!(field.clearance_margin_m(zone), 80.0);
    }

    #[test]
    fn first_intrusion_prefers_lowest_zone_index() {
        let overlapping = ZoneField::new(
            vec![
                Zone::new(7, 40.0, 29.0, 100.0),
                Zone::new(3, 40.0, 29.0005, 100.0),
            ],
            None,
            ClearanceMargin::Fixed { meters: 0.0 },
        )
        .unwrap();
        let outside = Point::new(40.01, 29.0);
        let both = Point::new(40.0, 29.00025);
        let (point, zone) = overlapping.first_intrusion(&[outside, both]).unwrap();
        assert_eq!(point, both);
        assert_eq!(zone.id, 7);
        assert!(overlapping.first_intrusion(&[outside]).is_none());

        let ids: Vec<u32> = overlapping.zones_at(&both).map(|zone| zone.id).collect();
        assert_eq!(ids, vec![7, 3]);
        assert_eq!(overlapping.zones_at(&outside).count(), 0);
    }

    #[test]
    fn boundary_checks_are_inclusive_and_optional() {
        let boundary =
            Boundary::from_points(vec![Point::new(40.0, 29.0), Point::new(40.01, 29.01)]).unwrap();
        let field = ZoneField::new(vec![], Some(boundary), ClearanceMargin::default()).unwrap();
        assert!(field.point_in_bounds(&Point::new(40.0, 29.01)));
        assert!(!field.point_in_bounds(&Point::new(40.02, 29.005)));
        assert!(!field.path_clear(&[Point::new(40.005, 29.005), Point::new(40.02, 29.005)]));

        let open = ZoneField::new(vec![], None, ClearanceMargin::default()).unwrap();
        assert!(open.point_valid(&Point::new(-10.0, 100.0)));
    }

    #[test]
    fn intrusion_run_spans_consecutive_points() {
        let field = field();
        let center = field.zones()[0].center;
        let path: Vec<Point> = [-150.0, -70.0, -30.0, 10.0, 50.0, 120.0]
            .iter()
            .map(|offset: &f64| destination(&center, offset.abs(), if *offset < 0.0 { 270.0 } else { 90.0 }))
            .collect();
        let run = field.first_intrusion_run(&path).unwrap();
        assert_eq!(run.zone.id, 0);
        assert_eq!(run.entry_index, 1);
        assert_eq!(run.exit_index, 4);
        assert_eq!(run.midpoint_index(), 3);
    }

    #[test]
    fn rejects_invalid_zones() {
        let result = ZoneField::new(
            vec![Zone::new(0, 40.0, 29.0, -5.0)],
            None,
            ClearanceMargin::default(),
        );
        assert!(result.is_err());
    }
}
