use geo_types::{Coord, Geometry, Point};
use serde::{Deserialize, Serialize};

/// WGS84 position in degrees, stored as (longitude, latitude).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl From<Coordinates> for Coord<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Coord {
            x: coordinates.longitude,
            y: coordinates.latitude,
        }
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::new(coordinates.longitude, coordinates.latitude)
    }
}

impl From<Coordinates> for Geometry<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Geometry::Point(coordinates.into())
    }
}

impl From<Coord<f64>> for Coordinates {
    fn from(coord: Coord<f64>) -> Self {
        Self::new(coord.x, coord.y)
    }
}

impl From<Point<f64>> for Coordinates {
    fn from(point: Point<f64>) -> Self {
        Self::new(point.x(), point.y())
    }
}

// map viewers expect latitude first
impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        format!("{},{}", coordinates.latitude, coordinates.longitude)
    }
}

/// Axis-aligned box used for the country bounds check.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_longitude: f64,
    pub min_latitude: f64,
    pub max_longitude: f64,
    pub max_latitude: f64,
}

/// Contiguous United States.
pub const US_BOUNDS: BoundingBox = BoundingBox {
    min_longitude: -124.848974,
    min_latitude: 24.396308,
    max_longitude: -66.885444,
    max_latitude: 49.384358,
};

impl BoundingBox {
    pub fn contains(&self, coordinates: Coordinates) -> bool {
        (self.min_longitude..=self.max_longitude).contains(&coordinates.longitude)
            && (self.min_latitude..=self.max_latitude).contains(&coordinates.latitude)
    }
}

#[test]
fn string_form_is_latitude_first() {
    let chicago = Coordinates::new(-87.6298, 41.8781);
    let s: String = chicago.into();

    assert_eq!(s, "41.8781,-87.6298");
}

#[test]
fn us_bounds_contains_mainland_only() {
    assert!(US_BOUNDS.contains(Coordinates::new(-87.6298, 41.8781)));
    assert!(US_BOUNDS.contains(Coordinates::new(-124.848974, 24.396308)));
    assert!(!US_BOUNDS.contains(Coordinates::new(-0.1276, 51.5072)));
    assert!(!US_BOUNDS.contains(Coordinates::new(-149.9003, 61.2181)));
}
