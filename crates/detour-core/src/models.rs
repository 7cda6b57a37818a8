//! Core data models for route planning.

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Component-wise comparison with a tolerance in degrees.
    pub fn approx_eq(&self, other: &Point, epsilon_deg: f64) -> bool {
        (self.lat - other.lat).abs() <= epsilon_deg && (self.lon - other.lon).abs() <= epsilon_deg
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// A circular keep-out zone ("red zone").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: u32,
    pub center: Point,
    pub radius_m: f64,
}

impl Zone {
    pub fn new(id: u32, lat: f64, lon: f64, radius_m: f64) -> Self {
        Self {
            id,
            center: Point::new(lat, lon),
            radius_m,
        }
    }

    pub fn validate(&self) -> PlanResult<()> {
        if !self.center.is_finite() {
            return Err(PlanError::invalid(format!(
                "zone {} has a non-finite center",
                self.id
            )));
        }
        if !(self.radius_m.is_finite() && self.radius_m > 0.0) {
            return Err(PlanError::invalid(format!(
                "zone {} radius must be positive, got {}",
                self.id, self.radius_m
            )));
        }
        Ok(())
    }
}

/// Axis-aligned box in degrees, inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: &Point) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lon >= self.min_lon
            && point.lon <= self.max_lon
    }
}

/// Allowed operating region. Only the bounding box of the points matters;
/// the points are not treated as a polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Boundary {
    points: Vec<Point>,
    bbox: BoundingBox,
}

impl Boundary {
    pub fn from_points(points: Vec<Point>) -> PlanResult<Self> {
        let first = points
            .first()
            .copied()
            .ok_or_else(|| PlanError::invalid("boundary needs at least one point"))?;
        if points.iter().any(|p| !p.is_finite()) {
            return Err(PlanError::invalid("boundary contains a non-finite point"));
        }
        let bbox = points.iter().fold(
            BoundingBox {
                min_lat: first.lat,
                max_lat: first.lat,
                min_lon: first.lon,
                max_lon: first.lon,
            },
            |acc, p| BoundingBox {
                min_lat: acc.min_lat.min(p.lat),
                max_lat: acc.max_lat.max(p.lat),
                min_lon: acc.min_lon.min(p.lon),
                max_lon: acc.max_lon.max(p.lon),
            },
        );
        Ok(Self { points, bbox })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.bbox.contains(point)
    }
}

impl TryFrom<Vec<Point>> for Boundary {
    type Error = PlanError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Boundary::from_points(points)
    }
}

impl From<Boundary> for Vec<Point> {
    fn from(boundary: Boundary) -> Self {
        boundary.points
    }
}

/// Terminal state of one planning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// The returned path clears every zone (and the boundary, if any).
    Success,
    /// The iteration budget ran out; the path is best-effort only.
    Exhausted,
}

impl PlanStatus {
    pub fn is_success(self) -> bool {
        self == PlanStatus::Success
    }
}

/// Result of a single planning loop run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub status: PlanStatus,
    pub path: Vec<Point>,
    /// Detour points in discovery order.
    pub via: Vec<Point>,
    /// Detour points the returned path actually passes through.
    #[serde(default)]
    pub corners: Vec<Point>,
    pub iterations: usize,
}

/// Which pre-pended turning arc a route uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnDirection {
    #[default]
    None,
    Right,
    Left,
}
