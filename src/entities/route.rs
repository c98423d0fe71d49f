use geo_types::{Coord, LineString};
use serde::{Deserialize, Serialize};

use crate::{
    entities::Coordinates,
    error::{route_unavailable_error, Error},
    geodesy::distance_miles,
};

/// Polyline returned by the route provider, start to end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    points: Vec<Coordinates>,
}

impl Route {
    pub fn new(points: Vec<Coordinates>) -> Result<Self, Error> {
        if points.len() < 2 {
            return Err(route_unavailable_error());
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[Coordinates] {
        &self.points
    }

    pub fn length_miles(&self) -> f64 {
        polyline_miles(&self.points)
    }
}

/// Contiguous piece of a route no longer than the vehicle range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub points: Vec<Coordinates>,
    pub length_miles: f64,
}

impl RouteSegment {
    pub fn new(points: Vec<Coordinates>, length_miles: f64) -> Self {
        Self {
            points,
            length_miles,
        }
    }

    pub fn line_string(&self) -> LineString<f64> {
        LineString::new(self.points.iter().copied().map(Coord::from).collect())
    }
}

pub fn polyline_miles(points: &[Coordinates]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_miles(pair[0], pair[1]))
        .sum()
}

#[test]
fn route_needs_two_points() {
    use crate::error::ErrorKind;

    let err = Route::new(vec![Coordinates::new(-90.0, 40.0)]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::RouteUnavailable);

    let route = Route::new(vec![
        Coordinates::new(-90.0, 40.0),
        Coordinates::new(-89.0, 40.0),
    ])
    .unwrap();
    assert_eq!(route.points().len(), 2);
}

#[test]
fn segment_line_string_keeps_axis_order() {
    let segment = RouteSegment::new(
        vec![Coordinates::new(-90.0, 40.0), Coordinates::new(-89.0, 41.0)],
        0.0,
    );

    let line = segment.line_string();
    let first = line.0[0];
    assert_eq!((first.x, first.y), (-90.0, 40.0));
}
