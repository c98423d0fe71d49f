use geo::{Closest, ClosestPoint, Distance, Geodesic};
use geo_types::{LineString, Point};

use crate::entities::Coordinates;

pub const METERS_PER_MILE: f64 = 1609.344;

/// Geodesic (WGS84 ellipsoid) distance in miles.
pub fn distance_miles(a: Coordinates, b: Coordinates) -> f64 {
    Geodesic.distance(Point::from(a), Point::from(b)) / METERS_PER_MILE
}

/// Planar interpolation in (longitude, latitude) space.
///
/// Segment boundaries are placed with this on purpose; switching to a
/// geodesic midpoint moves every split coordinate.
pub fn interpolate(a: Coordinates, b: Coordinates, ratio: f64) -> Coordinates {
    Coordinates::new(
        a.longitude + (b.longitude - a.longitude) * ratio,
        a.latitude + (b.latitude - a.latitude) * ratio,
    )
}

/// Distance in miles from `point` to the nearest point of `line`.
///
/// The nearest point is found in degree space, then measured geodesically.
pub fn distance_to_line_miles(point: Coordinates, line: &LineString<f64>) -> Option<f64> {
    match line.closest_point(&Point::from(point)) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => {
            Some(distance_miles(point, p.into()))
        }
        Closest::Indeterminate => None,
    }
}

#[test]
fn equator_distance_matches_arc_length() {
    // along the equator the geodesic is the equator itself
    let a = Coordinates::new(0.0, 0.0);
    let b = Coordinates::new(1.0, 0.0);

    let expected = 6_378_137.0 * 1f64.to_radians() / METERS_PER_MILE;
    assert!((distance_miles(a, b) - expected).abs() < 1e-6);
}

#[test]
fn chicago_to_denver_is_about_920_miles() {
    let chicago = Coordinates::new(-87.6298, 41.8781);
    let denver = Coordinates::new(-104.9903, 39.7392);

    let d = distance_miles(chicago, denver);
    assert!((d - 920.0).abs() < 10.0, "{}", d);
}

#[test]
fn interpolate_is_planar() {
    let a = Coordinates::new(-100.0, 30.0);
    let b = Coordinates::new(-90.0, 50.0);

    assert_eq!(interpolate(a, b, 0.0), a);
    assert_eq!(interpolate(a, b, 1.0), b);
    assert_eq!(interpolate(a, b, 0.25), Coordinates::new(-97.5, 35.0));
}

#[test]
fn distance_to_line_uses_closest_vertex_or_edge() {
    let line = LineString::from(vec![(0.0, 0.0), (2.0, 0.0)]);

    let on_line = distance_to_line_miles(Coordinates::new(1.0, 0.0), &line).unwrap();
    assert!(on_line < 1e-9);

    let off_line = distance_to_line_miles(Coordinates::new(1.0, 0.1), &line).unwrap();
    let direct = distance_miles(Coordinates::new(1.0, 0.1), Coordinates::new(1.0, 0.0));
    assert!((off_line - direct).abs() < 1e-9);
}

/// Longitude reached after travelling `miles` east along the equator from 0°.
#[cfg(test)]
pub fn equator_longitude(miles: f64) -> f64 {
    (miles * METERS_PER_MILE / 6_378_137.0).to_degrees()
}
