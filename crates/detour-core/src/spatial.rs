//! Spherical geometry on a local tangent surface.
//!
//! All functions are total for finite input. Behavior near the poles and the
//! antimeridian is not a concern for the short ranges this crate plans over.

use crate::models::Point;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate distance between two points in meters using the Haversine formula.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Great-circle distance in kilometers.
pub fn distance(a: &Point, b: &Point) -> f64 {
    haversine_distance(a.lat, a.lon, b.lat, b.lon) / 1000.0
}

/// Initial bearing from `a` to `b` in degrees, normalized to [0, 360).
pub fn bearing(a: &Point, b: &Point) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_lambda = (b.lon - a.lon).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_bearing(x.atan2(y).to_degrees())
}

/// Wrap any angle into [0, 360).
pub fn normalize_bearing(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Point reached by travelling `distance_m` from `origin` along `bearing_deg`.
pub fn destination(origin: &Point, distance_m: f64, bearing_deg: f64) -> Point {
    if distance_m.abs() <= f64::EPSILON {
        return *origin;
    }

    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let bearing_rad = bearing_deg.to_radians();
    let angular_distance = distance_m / EARTH_RADIUS_M;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let mut lon2 = lon1 + y.atan2(x);
    lon2 =
        (lon2 + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI) - std::f64::consts::PI;

    Point::new(lat2.to_degrees(), lon2.to_degrees())
}

/// Signed smallest rotation from heading `a` to heading `b`, in (-180, 180].
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let diff = (b - a).rem_euclid(360.0);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Total length of a polyline in meters.
pub fn path_length_m(path: &[Point]) -> f64 {
    path.windows(2)
        .map(|pair| haversine_distance(pair[0].lat, pair[0].lon, pair[1].lat, pair[1].lon))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_distance(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111_194.0).abs() < 100.0);
        let km = distance(&Point::new(0.0, 0.0), &Point::new(1.0, 0.0));
        assert!((km - 111.194).abs() < 0.1);
    }

    #[test]
    fn test_haversine_same_point() {
        let p = Point::new(40.23221, 29.00999);
        assert!(distance(&p, &p) < 1e-9);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = Point::new(40.0, 29.0);
        assert!(bearing(&origin, &Point::new(40.01, 29.0)).abs() < 1e-6);
        assert!((bearing(&origin, &Point::new(40.0, 29.01)) - 90.0).abs() < 0.01);
        assert!((bearing(&origin, &Point::new(39.99, 29.0)) - 180.0).abs() < 1e-6);
        let west = bearing(&origin, &Point::new(40.0, 28.99));
        assert!((west - 270.0).abs() < 0.01);
        assert!((0.0..360.0).contains(&west));
    }

    #[test]
    fn angle_diff_range() {
        assert_eq!(angle_diff(10.0, 30.0), 20.0);
        assert_eq!(angle_diff(350.0, 10.0), 20.0);
        assert_eq!(angle_diff(10.0, 350.0), -20.0);
        assert_eq!(angle_diff(0.0, 180.0), 180.0);
        assert_eq!(angle_diff(180.0, 0.0), 180.0);
        assert_eq!(angle_diff(90.0, -90.0), 180.0);
        assert!(angle_diff(0.0, 540.5) < 0.0);
    }

    #[test]
    fn destination_round_trips_random_pairs() {
        let mut rng = rand::rng();
        for _ in 0..500 {
            let a = Point::new(
                rng.random_range(-60.0..60.0),
                rng.random_range(-170.0..170.0),
            );
            let b = Point::new(
                a.lat + rng.random_range(-0.03..0.03),
                a.lon + rng.random_range(-0.03..0.03),
            );
            let reached = destination(&a, distance(&a, &b) * 1000.0, bearing(&a, &b));
            let error_m = distance(&reached, &b) * 1000.0;
            assert!(error_m < 1.0, "round trip error {error_m}m for {a:?} -> {b:?}");
        }
    }

    #[test]
    fn destination_zero_distance_is_identity() {
        let p = Point::new(40.2, 29.0);
        assert_eq!(destination(&p, 0.0, 123.0), p);
    }

    #[test]
    fn path_length_sums_segments() {
        let a = Point::new(40.0, 29.0);
        let b = destination(&a, 100.0, 45.0);
        let c = destination(&b, 50.0, 90.0);
        assert!((path_length_m(&[a, b, c]) - 150.0).abs() < 0.01);
        assert_eq!(path_length_m(&[a]), 0.0);
    }
}
