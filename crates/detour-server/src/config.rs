//! Server configuration from environment.

use std::env;
use std::str::FromStr;

use detour_core::{ClearanceMargin, PlannerConfig};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Planner defaults for requests that don't carry their own settings.
    pub planner: PlannerConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = PlannerConfig::default();
        let clearance = env_parse("DETOUR_CLEARANCE_M")
            .map(|meters| ClearanceMargin::Fixed { meters })
            .unwrap_or(defaults.clearance);

        Self {
            server_port: env_parse("DETOUR_PORT").unwrap_or(3000),
            planner: PlannerConfig {
                step_size_km: env_parse("DETOUR_STEP_SIZE_KM").unwrap_or(defaults.step_size_km),
                max_iterations: env_parse("DETOUR_MAX_ITERATIONS")
                    .unwrap_or(defaults.max_iterations),
                max_turn_angle_deg: env_parse("DETOUR_MAX_TURN_DEG")
                    .unwrap_or(defaults.max_turn_angle_deg),
                clearance,
                ..defaults
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            planner: PlannerConfig::default(),
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
