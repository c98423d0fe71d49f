use async_trait::async_trait;

use crate::{
    entities::{Corridor, FuelStation},
    error::Error,
    external::StationIndex,
    geodesy::distance_to_line_miles,
};

/// Station index held entirely in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStationIndex {
    stations: Vec<FuelStation>,
}

impl MemoryStationIndex {
    pub fn new(stations: Vec<FuelStation>) -> Self {
        Self { stations }
    }
}

#[async_trait]
impl StationIndex for MemoryStationIndex {
    #[tracing::instrument(skip_all, fields(radius_miles = corridor.radius_miles))]
    async fn query_corridor(&self, corridor: &Corridor) -> Result<Vec<FuelStation>, Error> {
        let mut stations: Vec<FuelStation> = self
            .stations
            .iter()
            .filter(|station| {
                distance_to_line_miles(station.location, &corridor.line)
                    .map(|d| d <= corridor.radius_miles)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        stations.sort_by(|a, b| a.price.total_cmp(&b.price).then_with(|| a.id.cmp(&b.id)));

        Ok(stations)
    }
}

#[test]
fn corridor_query_filters_and_sorts_by_price() {
    use crate::entities::{Coordinates, RouteSegment};
    use tokio_test::block_on;

    let station = |id: i32, price: f64, longitude: f64, latitude: f64| FuelStation {
        id,
        name: format!("Station {}", id),
        address: "".into(),
        city: "".into(),
        state: "KS".into(),
        price,
        location: Coordinates::new(longitude, latitude),
    };

    let index = MemoryStationIndex::new(vec![
        station(1, 3.49, -98.0, 38.05),
        station(2, 3.09, -97.5, 37.95),
        station(3, 2.59, -97.0, 40.0),
        station(4, 3.09, -98.5, 38.0),
    ]);

    let segment = RouteSegment::new(
        vec![Coordinates::new(-99.0, 38.0), Coordinates::new(-97.0, 38.0)],
        109.0,
    );
    let corridor = Corridor::around(&segment, 25.0);

    let found = block_on(index.query_corridor(&corridor)).unwrap();
    let ids: Vec<i32> = found.iter().map(|s| s.id).collect();

    // station 3 is ~138 miles north of the line
    assert_eq!(ids, vec![2, 4, 1]);
}
