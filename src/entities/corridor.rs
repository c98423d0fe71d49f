use geo_types::{Geometry, LineString};

use crate::{entities::RouteSegment, geodesy::METERS_PER_MILE};

/// Polyline widened by a fixed radius; the station index query region.
#[derive(Clone, Debug, PartialEq)]
pub struct Corridor {
    pub line: LineString<f64>,
    pub radius_miles: f64,
}

impl Corridor {
    pub fn around(segment: &RouteSegment, radius_miles: f64) -> Self {
        Self {
            line: segment.line_string(),
            radius_miles,
        }
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_miles * METERS_PER_MILE
    }

    pub fn geometry(&self) -> Geometry<f64> {
        Geometry::LineString(self.line.clone())
    }
}
