use super::Engine;

use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};

use crate::{
    api::PlanningAPI,
    engine::{aggregate, segment_route, StopLocator},
    entities::{FuelStop, RoutePlan},
    error::{invalid_input_error, Error},
};

#[async_trait]
impl PlanningAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn plan_route(&self, start: String, end: String) -> Result<RoutePlan, Error> {
        let (start, end) = (start.trim(), end.trim());

        if start.is_empty() || end.is_empty() {
            return Err(invalid_input_error());
        }

        let start_coordinates = self.resolve_location(start).await?;
        let end_coordinates = self.resolve_location(end).await?;

        let route = self
            .routes
            .get_route(start_coordinates, end_coordinates)
            .await?;

        let (segments, distances) = segment_route(&route, self.settings.max_range_miles)?;

        tracing::info!(
            segments = segments.len(),
            miles = distances.iter().sum::<f64>(),
            "route segmented"
        );

        let locator = StopLocator::new(self.stations.as_ref(), self.settings);

        // buffered keeps segment order whatever order the queries finish in
        let per_segment_stops: Vec<Vec<FuelStop>> = stream::iter(segments.iter().zip(distances))
            .map(|(segment, distance)| locator.find_stops(segment, distance))
            .boxed()
            .buffered(self.settings.segment_concurrency)
            .map_ok(Option::unwrap_or_default)
            .try_collect()
            .await?;

        let plan = aggregate(start_coordinates, end_coordinates, per_segment_stops)?;

        tracing::info!(
            stops = plan.stop_count(),
            total_fuel_cost = plan.total_fuel_cost,
            "route planned"
        );

        Ok(plan)
    }
}

#[cfg(test)]
mod fakes {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::entities::{BoundingBox, Coordinates, Corridor, FuelStation, Route};
    use crate::error::{route_unavailable_error, Error};
    use crate::external::{LocationResolver, MemoryStationIndex, RouteProvider, StationIndex};

    pub const WORLD: BoundingBox = BoundingBox {
        min_longitude: -180.0,
        min_latitude: -90.0,
        max_longitude: 180.0,
        max_latitude: 90.0,
    };

    #[derive(Clone, Default)]
    pub struct Calls(Arc<AtomicUsize>);

    impl Calls {
        pub fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }

        fn hit(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub struct Gazetteer {
        pub places: HashMap<String, Coordinates>,
        pub bounds: BoundingBox,
        pub calls: Calls,
    }

    #[async_trait]
    impl LocationResolver for Gazetteer {
        async fn resolve(&self, text: &str) -> Result<Option<Coordinates>, Error> {
            self.calls.hit();
            Ok(self.places.get(text).copied())
        }

        fn is_within_country_bounds(&self, coordinates: Coordinates) -> bool {
            self.bounds.contains(coordinates)
        }
    }

    /// Straight line from start to end.
    pub struct StraightRoads {
        pub fail: bool,
        pub calls: Calls,
    }

    #[async_trait]
    impl RouteProvider for StraightRoads {
        async fn get_route(&self, start: Coordinates, end: Coordinates) -> Result<Route, Error> {
            self.calls.hit();

            if self.fail {
                return Err(route_unavailable_error());
            }

            Route::new(vec![start, end])
        }
    }

    /// Memory index that counts queries and can answer western corridors last.
    pub struct CountingIndex {
        pub inner: MemoryStationIndex,
        pub calls: Calls,
        pub slow_west: bool,
        pub finished: Arc<Mutex<Vec<f64>>>,
    }

    #[async_trait]
    impl StationIndex for CountingIndex {
        async fn query_corridor(&self, corridor: &Corridor) -> Result<Vec<FuelStation>, Error> {
            self.calls.hit();

            let west = corridor.line.0[0].x;
            if self.slow_west {
                let delay = (60.0 - 4.0 * west).max(0.0) as u64;
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let stations = self.inner.query_corridor(corridor).await?;
            self.finished.lock().unwrap().push(west);

            Ok(stations)
        }
    }
}

#[cfg(test)]
struct Harness {
    engine: Engine,
    resolver_calls: fakes::Calls,
    route_calls: fakes::Calls,
    station_calls: fakes::Calls,
    finished: std::sync::Arc<std::sync::Mutex<Vec<f64>>>,
}

#[cfg(test)]
fn harness(
    places: Vec<(&str, crate::entities::Coordinates)>,
    bounds: crate::entities::BoundingBox,
    stations: Vec<crate::entities::FuelStation>,
    route_fails: bool,
    slow_west: bool,
) -> Harness {
    use crate::config::PlannerSettings;
    use crate::external::MemoryStationIndex;

    let resolver_calls = fakes::Calls::default();
    let route_calls = fakes::Calls::default();
    let station_calls = fakes::Calls::default();
    let finished = std::sync::Arc::new(std::sync::Mutex::new(vec![]));

    let engine = Engine::new(
        fakes::Gazetteer {
            places: places
                .into_iter()
                .map(|(name, coordinates)| (name.to_string(), coordinates))
                .collect(),
            bounds,
            calls: resolver_calls.clone(),
        },
        fakes::StraightRoads {
            fail: route_fails,
            calls: route_calls.clone(),
        },
        fakes::CountingIndex {
            inner: MemoryStationIndex::new(stations),
            calls: station_calls.clone(),
            slow_west,
            finished: finished.clone(),
        },
        PlannerSettings::default(),
    )
    .unwrap();

    Harness {
        engine,
        resolver_calls,
        route_calls,
        station_calls,
        finished,
    }
}

#[cfg(test)]
fn priced_station(id: i32, price: f64, longitude: f64, latitude: f64) -> crate::entities::FuelStation {
    crate::entities::FuelStation {
        id,
        name: format!("Travel Center {}", id),
        address: "I-70".into(),
        city: "Anytown".into(),
        state: "KS".into(),
        price,
        location: crate::entities::Coordinates::new(longitude, latitude),
    }
}

#[test]
fn thousand_mile_route_buys_two_full_tanks() {
    use crate::entities::Coordinates;
    use crate::geodesy::equator_longitude;
    use tokio_test::block_on;

    let start = Coordinates::new(0.0, 0.0);
    let end = Coordinates::new(equator_longitude(1000.0), 0.0);
    let midway = end.longitude / 2.0;

    let h = harness(
        vec![("Origin", start), ("Destination", end)],
        fakes::WORLD,
        vec![
            priced_station(1, 3.0, midway - 0.1, 0.05),
            priced_station(2, 3.0, end.longitude - 0.1, 0.0),
        ],
        false,
        false,
    );

    let plan = block_on(h.engine.plan_route("Origin".into(), "Destination".into())).unwrap();

    assert_eq!(plan.stop_count(), 2);
    assert_eq!(plan.fuel_stops[0].station.id, 1);
    assert_eq!(plan.fuel_stops[1].station.id, 2);

    for stop in plan.fuel_stops.iter() {
        assert!((stop.gallons - 50.0).abs() < 1e-6);
        assert_eq!(stop.cost, 150.0);
    }

    assert_eq!(plan.total_fuel_cost, 300.0);
    assert_eq!(
        plan.waypoints,
        vec![
            start,
            plan.fuel_stops[0].location(),
            plan.fuel_stops[1].location(),
            end
        ]
    );
    assert!(plan.map_url.starts_with("https://maps.openrouteservice.org/directions?n1=0&n2=0&a=0,0,"));
    assert_eq!(h.station_calls.count(), 2);
}

#[test]
fn unknown_destination_stops_before_routing() {
    use crate::entities::Coordinates;
    use crate::error::ErrorKind;
    use tokio_test::block_on;

    let h = harness(
        vec![("Origin", Coordinates::new(0.0, 0.0))],
        fakes::WORLD,
        vec![priced_station(1, 3.0, 0.0, 0.0)],
        false,
        false,
    );

    let err = block_on(h.engine.plan_route("Origin".into(), "Atlantis".into())).unwrap_err();

    assert_eq!(err.kind, ErrorKind::LocationNotFound);
    assert_eq!(h.resolver_calls.count(), 2);
    assert_eq!(h.route_calls.count(), 0);
    assert_eq!(h.station_calls.count(), 0);
}

#[test]
fn no_station_near_any_segment_fails() {
    use crate::entities::Coordinates;
    use crate::error::ErrorKind;
    use crate::geodesy::equator_longitude;
    use tokio_test::block_on;

    let h = harness(
        vec![
            ("Origin", Coordinates::new(0.0, 0.0)),
            ("Destination", Coordinates::new(equator_longitude(700.0), 0.0)),
        ],
        fakes::WORLD,
        vec![priced_station(1, 2.0, 5.0, 40.0)],
        false,
        false,
    );

    let err = block_on(h.engine.plan_route("Origin".into(), "Destination".into())).unwrap_err();

    assert_eq!(err.kind, ErrorKind::NoStationsFound);
    assert_eq!(h.station_calls.count(), 2);
}

#[test]
fn out_of_bounds_start_fails_fast() {
    use crate::entities::{Coordinates, US_BOUNDS};
    use crate::error::ErrorKind;
    use tokio_test::block_on;

    let h = harness(
        vec![
            ("London", Coordinates::new(-0.1276, 51.5072)),
            ("Denver", Coordinates::new(-104.9903, 39.7392)),
        ],
        US_BOUNDS,
        vec![],
        false,
        false,
    );

    let err = block_on(h.engine.plan_route("London".into(), "Denver".into())).unwrap_err();

    assert_eq!(err.kind, ErrorKind::LocationOutOfBounds);
    assert_eq!(h.resolver_calls.count(), 1);
    assert_eq!(h.route_calls.count(), 0);
}

#[test]
fn blank_input_is_rejected_without_lookups() {
    use crate::error::ErrorKind;
    use tokio_test::block_on;

    let h = harness(vec![], fakes::WORLD, vec![], false, false);

    let err = block_on(h.engine.plan_route("  ".into(), "Denver".into())).unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidInput);
    assert_eq!(h.resolver_calls.count(), 0);
}

#[test]
fn route_provider_failure_skips_station_search() {
    use crate::entities::Coordinates;
    use crate::error::ErrorKind;
    use tokio_test::block_on;

    let h = harness(
        vec![
            ("Origin", Coordinates::new(0.0, 0.0)),
            ("Destination", Coordinates::new(1.0, 0.0)),
        ],
        fakes::WORLD,
        vec![priced_station(1, 3.0, 1.0, 0.0)],
        true,
        false,
    );

    let err = block_on(h.engine.plan_route("Origin".into(), "Destination".into())).unwrap_err();

    assert_eq!(err.kind, ErrorKind::RouteUnavailable);
    assert_eq!(h.route_calls.count(), 1);
    assert_eq!(h.station_calls.count(), 0);
}

#[test]
fn stops_follow_segment_order_not_completion_order() {
    use crate::entities::Coordinates;
    use crate::geodesy::equator_longitude;
    use tokio_test::block_on;

    let end = Coordinates::new(equator_longitude(1200.0), 0.0);
    let first_split = equator_longitude(500.0);
    let second_split = equator_longitude(1000.0);

    let h = harness(
        vec![("Origin", Coordinates::new(0.0, 0.0)), ("Destination", end)],
        fakes::WORLD,
        vec![
            priced_station(1, 3.5, first_split, 0.1),
            priced_station(2, 3.4, second_split, 0.1),
            priced_station(3, 3.3, end.longitude, 0.1),
        ],
        false,
        true,
    );

    let plan = block_on(h.engine.plan_route("Origin".into(), "Destination".into())).unwrap();

    let finished = h.finished.lock().unwrap().clone();
    assert_eq!(finished.len(), 3);
    assert!(finished[0] > finished[2], "western corridor should finish last");

    let ids: Vec<i32> = plan.fuel_stops.iter().map(|s| s.station.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn invalid_settings_are_rejected() {
    use crate::config::PlannerSettings;
    use crate::external::MemoryStationIndex;

    let settings = PlannerSettings {
        max_range_miles: 0.0,
        ..PlannerSettings::default()
    };

    let result = Engine::new(
        fakes::Gazetteer {
            places: Default::default(),
            bounds: fakes::WORLD,
            calls: Default::default(),
        },
        fakes::StraightRoads {
            fail: false,
            calls: Default::default(),
        },
        MemoryStationIndex::default(),
        settings,
    );

    assert!(result.is_err());
}
