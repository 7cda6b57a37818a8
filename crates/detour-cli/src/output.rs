//! Rendering a planned route for the terminal or other tools.

use anyhow::Result;
use clap::ValueEnum;
use detour_core::{Route, ZoneField};
use std::fmt::Write;

use crate::geojson::feature_collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The route as JSON
    Json,
    /// A GeoJSON FeatureCollection with zones and via points
    Geojson,
    /// A summary line followed by one `lat,lon` per point
    Text,
}

pub fn render(format: OutputFormat, route: &Route, field: &ZoneField) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(route)?,
        OutputFormat::Geojson => serde_json::to_string_pretty(&feature_collection(route, field))?,
        OutputFormat::Text => {
            let mut out = format!(
                "status={:?} turn={:?} iterations={} via={} length_m={:.1}\n",
                route.status,
                route.turn,
                route.iterations,
                route.via.len(),
                route.length_m()
            );
            for point in route.clone().into_points() {
                writeln!(out, "{:.8},{:.8}", point.lat, point.lon)?;
            }
            out
        }
    };
    Ok(rendered)
}
