//! Pre-defined planning scenarios and JSON scenario files.

use anyhow::{Context, Result};
use detour_core::{Boundary, PlanRequest, Point, Zone};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A zone field plus one start/goal request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub boundary: Option<Boundary>,
    pub start: Point,
    pub goal: Point,
    #[serde(default)]
    pub current_heading: Option<f64>,
}

impl Scenario {
    pub fn request(&self) -> PlanRequest {
        PlanRequest {
            start: self.start,
            goal: self.goal,
            current_heading: self.current_heading,
        }
    }
}

const DEFAULT_GOAL: Point = Point::new(40.23008, 29.00499);
const NORTHERN_GOAL: Point = Point::new(40.23323, 29.00200);

/// The four-zone test field.
pub fn default_zones() -> Vec<Zone> {
    vec![
        Zone::new(0, 40.23260922, 29.00573015, 50.0),
        Zone::new(1, 40.23351019, 28.99976492, 50.0),
        Zone::new(2, 40.23105297, 29.00744677, 75.0),
        Zone::new(3, 40.23090554, 29.00221109, 170.0),
    ]
}

fn on_default_field(name: &str, start: Point, goal: Point) -> Scenario {
    Scenario {
        name: name.to_string(),
        zones: default_zones(),
        boundary: None,
        start,
        goal,
        current_heading: None,
    }
}

/// Names accepted by [`builtin_scenario`].
pub fn builtin_names() -> &'static [&'static str] {
    &[
        "default",
        "eastern-crossing",
        "western-approach",
        "far-west",
        "southern-approach",
        "bounded",
    ]
}

pub fn builtin_scenario(name: &str) -> Option<Scenario> {
    let start = Point::new(40.23221, 29.00999);
    let scenario = match name {
        "default" => on_default_field(name, start, DEFAULT_GOAL),
        "eastern-crossing" => on_default_field(name, Point::new(40.23107, 29.00900), NORTHERN_GOAL),
        "western-approach" => on_default_field(name, Point::new(40.23187, 28.99960), DEFAULT_GOAL),
        "far-west" => on_default_field(name, Point::new(40.23392, 28.99619), DEFAULT_GOAL),
        "southern-approach" => {
            on_default_field(name, Point::new(40.22844, 28.99969), NORTHERN_GOAL)
        }
        "bounded" => {
            let corners = vec![Point::new(40.2280, 28.9950), Point::new(40.2360, 29.0120)];
            Scenario {
                boundary: Boundary::from_points(corners).ok(),
                ..on_default_field(name, start, DEFAULT_GOAL)
            }
        }
        _ => return None,
    };
    Some(scenario)
}

/// Read a scenario from a JSON file.
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse scenario {}", path.display()))
}
