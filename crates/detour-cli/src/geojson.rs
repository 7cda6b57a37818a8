//! GeoJSON export of a planned route and the zones around it.

use detour_core::{Point, Route, ZoneField};
use serde_json::{json, Value};

fn position(point: &Point) -> Value {
    json!([point.lon, point.lat])
}

fn point_feature(point: &Point, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": position(point) },
        "properties": properties,
    })
}

/// Route as a LineString, zones and via points as Point features, and the
/// boundary box (if any) as a Polygon.
pub fn feature_collection(route: &Route, field: &ZoneField) -> Value {
    let mut features = Vec::with_capacity(field.zones().len() + route.via.len() + 2);

    let coordinates: Vec<Value> = route.clone().into_points().map(|p| position(&p)).collect();
    features.push(json!({
        "type": "Feature",
        "geometry": { "type": "LineString", "coordinates": coordinates },
        "properties": {
            "kind": "route",
            "status": route.status,
            "turn": route.turn,
            "iterations": route.iterations,
            "length_m": route.length_m(),
        },
    }));

    for zone in field.zones() {
        features.push(point_feature(
            &zone.center,
            json!({
                "kind": "zone",
                "id": zone.id,
                "radius_m": zone.radius_m,
                "clearance_m": field.clearance_margin_m(zone),
            }),
        ));
    }

    for (order, via) in route.via.iter().enumerate() {
        features.push(point_feature(via, json!({ "kind": "via", "order": order })));
    }

    if let Some(boundary) = field.boundary() {
        let bbox = boundary.bbox();
        let ring = json!([
            [bbox.min_lon, bbox.min_lat],
            [bbox.max_lon, bbox.min_lat],
            [bbox.max_lon, bbox.max_lat],
            [bbox.min_lon, bbox.max_lat],
            [bbox.min_lon, bbox.min_lat],
        ]);
        features.push(json!({
            "type": "Feature",
            "geometry": { "type": "Polygon", "coordinates": [ring] },
            "properties": { "kind": "boundary" },
        }));
    }

    json!({ "type": "FeatureCollection", "features": features })
}
