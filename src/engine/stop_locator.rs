use crate::{
    config::PlannerSettings,
    entities::{Coordinates, Corridor, FuelStation, FuelStop, RouteSegment},
    error::Error,
    external::StationIndex,
    geodesy::distance_miles,
};

// keeps a segment recorded at exactly the range from asking for a second stop
const RATIO_TOLERANCE: f64 = 1e-9;

/// Number of stops needed so no stop covers more than a full tank.
pub fn required_stops(segment_distance: f64, max_range_miles: f64) -> usize {
    let ratio = segment_distance / max_range_miles;

    ((ratio - RATIO_TOLERANCE).ceil().max(0.0) as usize).max(1)
}

/// Index of the `i`-th of `count` evenly spread targets in a list of `len` points.
pub fn target_index(i: usize, count: usize, len: usize) -> usize {
    let fraction = (i as f64 + 0.5) / count as f64;

    ((fraction * len as f64) as usize).min(len.saturating_sub(1))
}

/// Cheapest candidate within `radius_miles` of `target`; nearer wins a price tie.
pub fn select_station<'a>(
    candidates: &'a [FuelStation],
    target: Coordinates,
    radius_miles: f64,
) -> Option<&'a FuelStation> {
    candidates
        .iter()
        .map(|station| (station, distance_miles(station.location, target)))
        .filter(|(_, distance)| *distance <= radius_miles)
        .min_by(|(a, a_distance), (b, b_distance)| {
            a.price
                .total_cmp(&b.price)
                .then_with(|| a_distance.total_cmp(b_distance))
        })
        .map(|(station, _)| station)
}

/// Picks fuel stops along one segment from the station index.
pub struct StopLocator<'a> {
    stations: &'a (dyn StationIndex + Send + Sync),
    settings: PlannerSettings,
}

impl<'a> StopLocator<'a> {
    pub fn new(stations: &'a (dyn StationIndex + Send + Sync), settings: PlannerSettings) -> Self {
        Self { stations, settings }
    }

    /// Stops for the segment in travel order, or `None` when nothing is in reach.
    #[tracing::instrument(skip(self, segment), fields(points = segment.points.len()))]
    pub async fn find_stops(
        &self,
        segment: &RouteSegment,
        segment_distance: f64,
    ) -> Result<Option<Vec<FuelStop>>, Error> {
        let radius = self.settings.search_radius_miles;
        let corridor = Corridor::around(segment, radius);

        let candidates = self.stations.query_corridor(&corridor).await?;

        if candidates.is_empty() {
            tracing::warn!("no stations in segment corridor");
            return Ok(None);
        }

        let max_range = self.settings.max_range_miles;
        let count = required_stops(segment_distance, max_range);
        let covered = (segment_distance / count as f64).min(max_range);

        let mut stops = Vec::with_capacity(count);

        for i in 0..count {
            let target = segment.points[target_index(i, count, segment.points.len())];

            match select_station(&candidates, target, radius) {
                Some(station) => stops.push(FuelStop::new(
                    station.clone(),
                    covered,
                    self.settings.miles_per_gallon,
                )),
                None => tracing::warn!(?target, "no station within radius of stop target"),
            }
        }

        if stops.is_empty() {
            return Ok(None);
        }

        Ok(Some(stops))
    }
}

#[cfg(test)]
fn station(id: i32, price: f64, longitude: f64, latitude: f64) -> FuelStation {
    FuelStation {
        id,
        name: format!("Station {}", id),
        address: format!("{} Highway Rd", id),
        city: "Salina".into(),
        state: "KS".into(),
        price,
        location: Coordinates::new(longitude, latitude),
    }
}

#[test]
fn required_stops_rounds_up_per_full_tank() {
    assert_eq!(required_stops(500.0, 500.0), 1);
    assert_eq!(required_stops(750.0, 500.0), 2);
    assert_eq!(required_stops(1000.0, 500.0), 2);
    assert_eq!(required_stops(120.0, 500.0), 1);
    assert_eq!(required_stops(0.0, 500.0), 1);
    assert_eq!(required_stops(500.000_000_000_1, 500.0), 1);
}

#[test]
fn targets_spread_across_the_segment() {
    assert_eq!(target_index(0, 1, 2), 1);
    assert_eq!(target_index(0, 1, 11), 5);
    assert_eq!(target_index(0, 2, 11), 2);
    assert_eq!(target_index(1, 2, 11), 8);
    assert_eq!(target_index(2, 3, 3), 2);
}

#[test]
fn equal_price_prefers_nearer_station() {
    let target = Coordinates::new(-97.6, 38.8);
    let candidates = vec![
        station(1, 3.19, -97.9, 38.8),
        station(2, 3.19, -97.65, 38.8),
    ];

    let selected = select_station(&candidates, target, 25.0).unwrap();
    assert_eq!(selected.id, 2);
}

#[test]
fn cheaper_station_wins_regardless_of_distance() {
    let target = Coordinates::new(-97.6, 38.8);
    let candidates = vec![
        station(1, 3.49, -97.6, 38.8),
        station(2, 3.09, -97.9, 38.8),
    ];

    let selected = select_station(&candidates, target, 25.0).unwrap();
    assert_eq!(selected.id, 2);
}

#[test]
fn stations_outside_radius_are_ignored() {
    let target = Coordinates::new(-97.6, 38.8);
    let candidates = vec![station(1, 1.99, -99.6, 38.8)];

    assert!(select_station(&candidates, target, 25.0).is_none());
}

#[test]
fn long_segment_gets_a_stop_per_target() {
    use crate::external::MemoryStationIndex;
    use tokio_test::block_on;

    let points: Vec<Coordinates> = (0..=10)
        .map(|i| Coordinates::new(i as f64, 0.0))
        .collect();
    let segment = RouteSegment::new(points, 750.0);

    // targets are points 2 and 8
    let index = MemoryStationIndex::new(vec![
        station(1, 3.59, 2.1, 0.0),
        station(2, 2.96, 8.0, 0.1),
        station(3, 3.99, 5.0, 0.0),
    ]);

    let settings = PlannerSettings::default();
    let locator = StopLocator::new(&index, settings);

    let stops = block_on(locator.find_stops(&segment, 750.0)).unwrap().unwrap();

    assert_eq!(stops.len(), 2);
    assert_eq!(stops[0].station.id, 1);
    assert_eq!(stops[1].station.id, 2);
    assert_eq!(stops[0].distance_miles, 375.0);
    assert_eq!(stops[0].gallons, 37.5);
    assert_eq!(stops[1].cost, 111.0);
}

#[test]
fn unreachable_target_is_omitted() {
    use crate::external::MemoryStationIndex;
    use tokio_test::block_on;

    let points: Vec<Coordinates> = (0..=10)
        .map(|i| Coordinates::new(i as f64, 0.0))
        .collect();
    let segment = RouteSegment::new(points, 750.0);

    let index = MemoryStationIndex::new(vec![station(1, 3.59, 8.0, 0.0)]);
    let locator = StopLocator::new(&index, PlannerSettings::default());

    let stops = block_on(locator.find_stops(&segment, 750.0)).unwrap().unwrap();

    assert_eq!(stops.len(), 1);
    assert_eq!(stops[0].station.id, 1);
}

#[test]
fn empty_corridor_yields_none() {
    use crate::external::MemoryStationIndex;
    use tokio_test::block_on;

    let segment = RouteSegment::new(
        vec![Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0)],
        69.0,
    );

    let index = MemoryStationIndex::new(vec![station(1, 2.5, 40.0, 40.0)]);
    let locator = StopLocator::new(&index, PlannerSettings::default());

    assert_eq!(block_on(locator.find_stops(&segment, 69.0)).unwrap(), None);
}

#[test]
fn stations_in_corridor_but_far_from_targets_yield_none() {
    use crate::external::MemoryStationIndex;
    use tokio_test::block_on;

    let points: Vec<Coordinates> = (0..=4)
        .map(|i| Coordinates::new(i as f64, 0.0))
        .collect();
    let segment = RouteSegment::new(points, 276.0);

    // target is point 2; the only station sits beside point 0
    let index = MemoryStationIndex::new(vec![station(1, 2.5, 0.0, 0.1)]);
    let locator = StopLocator::new(&index, PlannerSettings::default());

    assert_eq!(block_on(locator.find_stops(&segment, 276.0)).unwrap(), None);
}
