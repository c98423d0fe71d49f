use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, FuelStop};

const MAP_BASE_URL: &str = "https://maps.openrouteservice.org/directions";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub waypoints: Vec<Coordinates>,
    pub fuel_stops: Vec<FuelStop>,
    pub total_fuel_cost: f64,
    pub map_url: String,
}

impl RoutePlan {
    pub fn start(&self) -> Option<&Coordinates> {
        self.waypoints.first()
    }

    pub fn end(&self) -> Option<&Coordinates> {
        self.waypoints.last()
    }

    pub fn stop_count(&self) -> usize {
        self.fuel_stops.len()
    }
}

/// Shareable viewer link; every waypoint is written latitude first.
pub fn map_url(waypoints: &[Coordinates]) -> String {
    let a = waypoints
        .iter()
        .map(|&waypoint| String::from(waypoint))
        .collect::<Vec<_>>()
        .join(",");

    let (n1, n2) = waypoints
        .first()
        .map(|start| (start.latitude, start.longitude))
        .unwrap_or_default();

    format!(
        "{}?n1={}&n2={}&a={}&b=0&c=0&k1=en-US&k2=mi",
        MAP_BASE_URL, n1, n2, a
    )
}

#[test]
fn map_url_swaps_axes() {
    let waypoints = vec![
        Coordinates::new(-87.5, 41.5),
        Coordinates::new(-95.25, 39.0),
        Coordinates::new(-104.75, 39.75),
    ];

    assert_eq!(
        map_url(&waypoints),
        "https://maps.openrouteservice.org/directions?n1=41.5&n2=-87.5&a=41.5,-87.5,39,-95.25,39.75,-104.75&b=0&c=0&k1=en-US&k2=mi"
    );
}
