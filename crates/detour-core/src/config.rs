//! Planner tunables.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, PlanError, PlanResult};
use crate::heading::ensure_turn_limit;

/// Upper bound on offsets probed per side, whatever the decrement.
pub const MAX_DETOUR_PROBES: usize = 1_000;

/// Safety inflation added to a zone's radius.
///
/// A point closer to a zone center than `radius + inflation` counts as
/// inside the zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClearanceMargin {
    /// Flat inflation in meters.
    Fixed { meters: f64 },
    /// Inflation proportional to the radius (`1/6` gives `radius * 7/6`).
    Fraction { ratio: f64 },
}

impl Default for ClearanceMargin {
    fn default() -> Self {
        ClearanceMargin::Fixed { meters: 30.0 }
    }
}

impl ClearanceMargin {
    /// Minimum allowed distance from the zone center, in meters.
    pub fn margin_m(&self, radius_m: f64) -> f64 {
        match *self {
            ClearanceMargin::Fixed { meters } => radius_m + meters,
            ClearanceMargin::Fraction { ratio } => radius_m + radius_m * ratio,
        }
    }

    pub fn validate(&self) -> PlanResult<()> {
        let value = match *self {
            ClearanceMargin::Fixed { meters } => meters,
            ClearanceMargin::Fraction { ratio } => ratio,
        };
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(PlanError::invalid(format!(
                "clearance inflation must be a non-negative finite number, got {value}"
            )))
        }
    }
}

fn ensure_non_negative(name: &str, value: f64) -> PlanResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PlanError::invalid(format!(
            "{name} must be a non-negative finite number, got {value}"
        )))
    }
}

/// Parameters of the perpendicular detour search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetourConfig {
    /// Constant part of the initial offset beyond the radius (meters)
    pub clearance_constant_m: f64,
    /// Initial offset adds `radius / radius_divisor`
    pub radius_divisor: f64,
    /// How much the offset shrinks per probe (meters)
    pub decrement_step_m: f64,
    /// Smallest offset probed (meters)
    pub min_dist_m: f64,
}

impl Default for DetourConfig {
    fn default() -> Self {
        Self {
            clearance_constant_m: 10.0,
            radius_divisor: 1.5,
            decrement_step_m: 10.0,
            min_dist_m: 20.0,
        }
    }
}

impl DetourConfig {
    pub fn initial_dist_m(&self, radius_m: f64) -> f64 {
        self.clearance_constant_m + radius_m / self.radius_divisor
    }

    /// Number of offsets probed per side for a zone of this radius.
    pub fn probe_budget(&self, radius_m: f64) -> usize {
        let initial = self.initial_dist_m(radius_m);
        if initial < self.min_dist_m {
            return 0;
        }
        let steps = ((initial - self.min_dist_m) / self.decrement_step_m).floor();
        (steps as usize).saturating_add(1).min(MAX_DETOUR_PROBES)
    }

    pub fn validate(&self) -> PlanResult<()> {
        ensure_positive("detour.radius_divisor", self.radius_divisor)?;
        ensure_positive("detour.decrement_step_m", self.decrement_step_m)?;
        ensure_non_negative("detour.clearance_constant_m", self.clearance_constant_m)?;
        ensure_non_negative("detour.min_dist_m", self.min_dist_m)
    }
}

/// Configuration for one navigation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Waypoint spacing in kilometers
    pub step_size_km: f64,
    /// Upper bound on replanning iterations
    pub max_iterations: usize,
    /// Largest heading change allowed per turning step (degrees)
    pub max_turn_angle_deg: f64,
    /// Length of each turning step (meters)
    pub turn_step_m: f64,
    pub clearance: ClearanceMargin,
    pub detour: DetourConfig,
    /// Smooth successful paths (falls back to pruning when unsafe)
    pub smoothing: bool,
    /// Thin successful paths down to every n-th waypoint plus via points
    pub keep_every_n: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            step_size_km: 0.01,
            max_iterations: 3,
            max_turn_angle_deg: 7.0,
            turn_step_m: 10.0,
            clearance: ClearanceMargin::default(),
            detour: DetourConfig::default(),
            smoothing: true,
            keep_every_n: None,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> PlanResult<()> {
        ensure_positive("step_size_km", self.step_size_km)?;
        ensure_turn_limit(self.max_turn_angle_deg)?;
        ensure_positive("turn_step_m", self.turn_step_m)?;
        self.clearance.validate()?;
        self.detour.validate()?;
        if self.keep_every_n == Some(0) {
            return Err(PlanError::invalid("keep_every_n must be at least 1"));
        }
        Ok(())
    }
}

/// Optional behaviors of the single planning pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Candidates and paths must also stay inside a boundary box
    pub boundary: bool,
    /// A turning arc from the current heading is pre-pended
    pub heading_adjustment: bool,
}
