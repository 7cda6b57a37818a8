//! Detour CLI - command line tools for the route planner.
//!
//! This crate provides:
//! - detour_plan: plan a route for a built-in or JSON scenario

pub mod geojson;
pub mod output;
pub mod scenarios;

pub use output::{render, OutputFormat};
pub use scenarios::{builtin_names, builtin_scenario, load_scenario, Scenario};
