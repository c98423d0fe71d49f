use std::sync::Arc;

use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::entities::{FuelStop, RoutePlan};
use crate::error::Error;
use crate::server::cache::{cache_key, PlanCache};
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct PlanParams {
    start: String,
    end: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelStopView {
    pub location: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub gallons: f64,
    pub cost: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanView {
    pub route_map_url: String,
    pub fuel_stops: Vec<FuelStopView>,
    pub total_fuel_cost: f64,
}

impl From<&FuelStop> for FuelStopView {
    fn from(stop: &FuelStop) -> Self {
        Self {
            location: stop.station.name.clone(),
            address: stop.station.address.clone(),
            city: stop.station.city.clone(),
            state: stop.station.state.clone(),
            price: stop.station.price,
            latitude: stop.station.location.latitude,
            longitude: stop.station.location.longitude,
            gallons: stop.gallons,
            cost: stop.cost,
        }
    }
}

impl From<&RoutePlan> for PlanView {
    fn from(plan: &RoutePlan) -> Self {
        Self {
            route_map_url: plan.map_url.clone(),
            fuel_stops: plan.fuel_stops.iter().map(Into::into).collect(),
            total_fuel_cost: plan.total_fuel_cost,
        }
    }
}

#[axum_macros::debug_handler]
pub async fn plan(
    Extension(api): Extension<DynAPI>,
    Extension(cache): Extension<Arc<PlanCache>>,
    Json(params): Json<PlanParams>,
) -> Result<Json<PlanView>, Error> {
    let key = cache_key(&params.start, &params.end);

    if let Some(plan) = cache.get(&key).await {
        tracing::info!(%key, "plan cache hit");
        return Ok(Json((&plan).into()));
    }

    let plan = api.plan_route(params.start, params.end).await?;
    let view = PlanView::from(&plan);

    cache.insert(key, plan).await;

    Ok(view.into())
}

#[test]
fn view_matches_legacy_response_shape() {
    use crate::entities::{Coordinates, FuelStation};

    let station = FuelStation {
        id: 7,
        name: "Love's Travel Stop".into(),
        address: "I-80, EXIT 190".into(),
        city: "Elm Creek".into(),
        state: "NE".into(),
        price: 3.279,
        location: Coordinates::new(-99.37, 40.72),
    };

    let stop = FuelStop::new(station, 500.0, 10.0);
    let plan = RoutePlan {
        waypoints: vec![],
        fuel_stops: vec![stop],
        total_fuel_cost: 163.95,
        map_url: "https://maps.openrouteservice.org/directions".into(),
    };

    let value = serde_json::to_value(PlanView::from(&plan)).unwrap();

    assert_eq!(value["total_fuel_cost"], 163.95);
    assert_eq!(value["fuel_stops"][0]["location"], "Love's Travel Stop");
    assert_eq!(value["fuel_stops"][0]["latitude"], 40.72);
    assert_eq!(value["fuel_stops"][0]["gallons"], 50.0);
    assert_eq!(value["fuel_stops"][0]["cost"], 163.95);
    assert!(value["route_map_url"].is_string());
}

#[cfg(test)]
mod counting {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::api::{PlanningAPI, API};
    use crate::entities::{map_url, Coordinates, FuelStation, FuelStop, RoutePlan};
    use crate::error::{location_not_found_error, Error};

    /// Plans a fixed one-stop trip and counts how often it is asked to.
    pub struct FixedPlanner {
        pub calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl PlanningAPI for FixedPlanner {
        async fn plan_route(&self, start: String, _end: String) -> Result<RoutePlan, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if start == "Atlantis" {
                return Err(location_not_found_error());
            }

            let station = FuelStation {
                id: 11,
                name: "Pilot Travel Center".into(),
                address: "I-70, EXIT 252".into(),
                city: "Salina".into(),
                state: "KS".into(),
                price: 3.09,
                location: Coordinates::new(-97.6, 38.8),
            };
            let stop = FuelStop::new(station, 420.0, 10.0);

            let waypoints = vec![
                Coordinates::new(-94.6, 39.1),
                stop.location(),
                Coordinates::new(-104.99, 39.74),
            ];

            Ok(RoutePlan {
                map_url: map_url(&waypoints),
                waypoints,
                total_fuel_cost: stop.cost,
                fuel_stops: vec![stop],
            })
        }
    }

    impl API for FixedPlanner {}
}

#[test]
fn repeated_request_is_served_from_cache() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::block_on;

    let calls = Arc::new(AtomicUsize::new(0));
    let api: DynAPI = Arc::new(counting::FixedPlanner {
        calls: calls.clone(),
    });
    let cache = Arc::new(PlanCache::new(3600));

    let request = || PlanParams {
        start: "Kansas City, MO".into(),
        end: "Denver, CO".into(),
    };

    let Json(miss) = block_on(plan(
        Extension(api.clone()),
        Extension(cache.clone()),
        Json(request()),
    ))
    .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let Json(hit) = block_on(plan(
        Extension(api.clone()),
        Extension(cache.clone()),
        Json(request()),
    ))
    .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert_eq!(hit, miss);
    assert_eq!(hit.fuel_stops.len(), 1);
    assert_eq!(hit.total_fuel_cost, 129.78);
}

#[test]
fn failed_plan_is_not_cached() {
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::block_on;

    let calls = Arc::new(AtomicUsize::new(0));
    let api: DynAPI = Arc::new(counting::FixedPlanner {
        calls: calls.clone(),
    });
    let cache = Arc::new(PlanCache::new(3600));

    for _ in 0..2 {
        let params = PlanParams {
            start: "Atlantis".into(),
            end: "Denver, CO".into(),
        };

        let err = block_on(plan(
            Extension(api.clone()),
            Extension(cache.clone()),
            Json(params),
        ))
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::LocationNotFound);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(block_on(cache.get(&cache_key("Atlantis", "Denver, CO"))).is_none());
}
