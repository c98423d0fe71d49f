use crate::{
    entities::{Route, RouteSegment},
    error::{invalid_input_error, Error},
    geodesy::{distance_miles, interpolate},
};

// absorbs float drift so exact multiples of the segment length do not
// leave a zero-length tail
const EPSILON_MILES: f64 = 1e-6;

/// Smallest segment limit that still makes progress past the drift tolerance.
pub const MIN_SEGMENT_MILES: f64 = 1e-3;

/// Splits a route into segments of at most `max_segment_miles`.
///
/// Split points are interpolated on the pair that crosses the limit and are
/// shared by the closing and the next segment. Returns the segments and
/// their lengths, index-aligned.
pub fn segment_route(
    route: &Route,
    max_segment_miles: f64,
) -> Result<(Vec<RouteSegment>, Vec<f64>), Error> {
    if !max_segment_miles.is_finite() || max_segment_miles < MIN_SEGMENT_MILES {
        return Err(invalid_input_error());
    }

    let points = route.points();

    let mut segments = vec![];
    let mut distances = vec![];

    let mut current = vec![points[0]];
    let mut accumulated = 0.0;

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let length = distance_miles(a, b);
        let mut consumed = 0.0;

        while accumulated + (length - consumed) > max_segment_miles + EPSILON_MILES {
            let needed = max_segment_miles - accumulated;

            // a limit landing on the previous point closes the segment there
            if needed > EPSILON_MILES {
                consumed += needed;
                current.push(interpolate(a, b, consumed / length));
            }

            let split = current[current.len() - 1];
            let closed = std::mem::replace(&mut current, vec![split]);

            segments.push(RouteSegment::new(closed, max_segment_miles));
            distances.push(max_segment_miles);
            accumulated = 0.0;
        }

        accumulated += length - consumed;
        current.push(b);
    }

    if current.len() >= 2 {
        segments.push(RouteSegment::new(current, accumulated));
        distances.push(accumulated);
    }

    Ok((segments, distances))
}

#[cfg(test)]
fn equator_route(longitudes: &[f64]) -> Route {
    use crate::entities::Coordinates;

    Route::new(
        longitudes
            .iter()
            .map(|&longitude| Coordinates::new(longitude, 0.0))
            .collect(),
    )
    .unwrap()
}

#[test]
fn short_route_is_a_single_segment() {
    let route = equator_route(&[0.0, 2.0]);
    let length = route.length_miles();

    let (segments, distances) = segment_route(&route, 500.0).unwrap();

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].points, route.points());
    assert!((distances[0] - length).abs() < 1e-9);
    assert_eq!(segments[0].length_miles, distances[0]);
}

#[test]
fn exact_multiple_has_no_dangling_tail() {
    use crate::geodesy::equator_longitude;

    let end = equator_longitude(1000.0);
    let route = equator_route(&[0.0, end]);

    let (segments, distances) = segment_route(&route, 500.0).unwrap();

    assert_eq!(segments.len(), 2);
    assert_eq!(distances[0], 500.0);
    assert!((distances[1] - 500.0).abs() < 1e-6);

    // the split point is planar-interpolated and shared by both segments
    let split = segments[0].points[1];
    assert!((split.longitude - end / 2.0).abs() < 1e-9);
    assert_eq!(segments[1].points[0], split);
    assert_eq!(segments[1].points.len(), 2);
}

#[test]
fn remainder_becomes_a_shorter_final_segment() {
    use crate::geodesy::equator_longitude;

    let route = equator_route(&[0.0, equator_longitude(1200.0)]);

    let (segments, distances) = segment_route(&route, 500.0).unwrap();

    assert_eq!(segments.len(), 3);
    assert_eq!(distances[..2], [500.0, 500.0]);
    assert!((distances[2] - 200.0).abs() < 1e-6);
}

#[test]
fn many_vertices_are_kept_in_order() {
    use crate::entities::polyline_miles;

    let longitudes: Vec<f64> = (0..=20).map(|i| i as f64).collect();
    let route = equator_route(&longitudes);
    let total = route.length_miles();

    let (segments, distances) = segment_route(&route, 500.0).unwrap();

    assert_eq!(segments.len(), (total / 500.0).ceil() as usize);
    assert_eq!(segments.len(), distances.len());
    assert!((distances.iter().sum::<f64>() - total).abs() < 1e-6);

    for (segment, distance) in segments.iter().zip(distances.iter()) {
        assert!(segment.points.len() >= 2);
        assert!(*distance <= 500.0 + 1e-6);
        assert!((polyline_miles(&segment.points) - distance).abs() < 1e-6);
    }

    for pair in segments.windows(2) {
        assert_eq!(pair[0].points.last(), pair[1].points.first());
    }

    assert_eq!(segments[0].points[0], route.points()[0]);
    assert_eq!(
        segments.last().unwrap().points.last(),
        route.points().last()
    );
}

#[test]
fn one_pair_can_span_several_segments() {
    use crate::geodesy::equator_longitude;

    let route = equator_route(&[0.0, 0.5, equator_longitude(1600.0)]);

    let (segments, distances) = segment_route(&route, 500.0).unwrap();

    assert_eq!(segments.len(), 4);
    assert_eq!(distances[..3], [500.0, 500.0, 500.0]);
    assert!((distances[3] - 100.0).abs() < 1e-6);
    assert_eq!(segments[0].points.len(), 3);
}

#[test]
fn non_positive_limit_is_rejected() {
    let route = equator_route(&[0.0, 1.0]);

    assert!(segment_route(&route, 0.0).is_err());
    assert!(segment_route(&route, -5.0).is_err());
    assert!(segment_route(&route, f64::NAN).is_err());
}

#[test]
fn limit_within_drift_tolerance_is_rejected() {
    let route = equator_route(&[0.0, 1.0]);

    assert!(segment_route(&route, EPSILON_MILES).is_err());
    assert!(segment_route(&route, 5e-7).is_err());
}

#[test]
fn smallest_accepted_limit_still_terminates() {
    // 0.01 degrees of equator is ~0.69 miles
    let route = equator_route(&[0.0, 0.01]);
    let total = route.length_miles();

    let (segments, distances) = segment_route(&route, MIN_SEGMENT_MILES).unwrap();

    assert_eq!(segments.len(), (total / MIN_SEGMENT_MILES).ceil() as usize);
    assert!(segments.iter().all(|segment| segment.points.len() >= 2));
    assert!((distances.iter().sum::<f64>() - total).abs() < 1e-6);
}
