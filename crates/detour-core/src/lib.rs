pub mod config;
pub mod detour;
pub mod error;
pub mod heading;
pub mod models;
pub mod navigator;
pub mod planner;
pub mod postprocess;
pub mod spatial;
pub mod stitch;
pub mod waypoints;
pub mod zones;

pub use config::{Capabilities, ClearanceMargin, DetourConfig, PlannerConfig};
pub use detour::{rank_candidates, search_detour, select_candidates, DetourCandidates};
pub use error::{PlanError, PlanResult};
pub use heading::{adjust_heading, HeadingAdjustment};
pub use models::{
    Boundary, BoundingBox, PlanOutcome, PlanStatus, Point, TurnDirection, Zone,
};
pub use navigator::{Navigator, PlanRequest, Route, RouteStream};
pub use planner::plan_path;
pub use postprocess::{optimize_path, smooth_path, thin_path};
pub use spatial::{bearing, destination, distance, haversine_distance};
pub use stitch::{stitch_path, StitchedPath};
pub use waypoints::generate_waypoints;
pub use zones::{IntrusionRun, ZoneField};
