use crate::{
    entities::{map_url, round_cents, Coordinates, FuelStop, RoutePlan},
    error::{no_stations_found_error, Error},
};

/// Joins per-segment stops, already in segment order, into the final plan.
pub fn aggregate(
    start: Coordinates,
    end: Coordinates,
    per_segment_stops: Vec<Vec<FuelStop>>,
) -> Result<RoutePlan, Error> {
    let fuel_stops: Vec<FuelStop> = per_segment_stops.into_iter().flatten().collect();

    if fuel_stops.is_empty() {
        return Err(no_stations_found_error());
    }

    let total_fuel_cost = round_cents(fuel_stops.iter().map(|stop| stop.cost).sum());

    let mut waypoints = Vec::with_capacity(fuel_stops.len() + 2);
    waypoints.push(start);
    waypoints.extend(fuel_stops.iter().map(FuelStop::location));
    waypoints.push(end);

    let map_url = map_url(&waypoints);

    Ok(RoutePlan {
        waypoints,
        fuel_stops,
        total_fuel_cost,
        map_url,
    })
}

#[cfg(test)]
fn stop(id: i32, price: f64, longitude: f64) -> FuelStop {
    use crate::entities::FuelStation;

    let station = FuelStation {
        id,
        name: format!("Truck Stop {}", id),
        address: "".into(),
        city: "".into(),
        state: "".into(),
        price,
        location: Coordinates::new(longitude, 40.0),
    };

    FuelStop::new(station, 333.0, 10.0)
}

#[test]
fn no_stops_anywhere_is_a_failure() {
    use crate::error::ErrorKind;

    let start = Coordinates::new(-100.0, 40.0);
    let end = Coordinates::new(-90.0, 40.0);

    let err = aggregate(start, end, vec![]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoStationsFound);

    let err = aggregate(start, end, vec![vec![], vec![]]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoStationsFound);
}

#[test]
fn stops_are_flattened_in_segment_order() {
    let start = Coordinates::new(-100.0, 40.0);
    let end = Coordinates::new(-90.0, 40.0);

    let plan = aggregate(
        start,
        end,
        vec![
            vec![stop(1, 3.111, -98.0), stop(2, 3.222, -97.0)],
            vec![],
            vec![stop(3, 3.333, -93.0)],
        ],
    )
    .unwrap();

    let ids: Vec<i32> = plan.fuel_stops.iter().map(|s| s.station.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    assert_eq!(plan.stop_count(), 3);
    assert_eq!(plan.waypoints.len(), 5);
    assert_eq!(plan.start(), Some(&start));
    assert_eq!(plan.end(), Some(&end));
    assert_eq!(plan.waypoints[2], Coordinates::new(-97.0, 40.0));
}

#[test]
fn total_is_the_rounded_sum_of_stop_costs() {
    let start = Coordinates::new(-100.0, 40.0);
    let end = Coordinates::new(-90.0, 40.0);

    let stops = vec![stop(1, 3.111, -98.0), stop(2, 3.222, -97.0), stop(3, 3.333, -93.0)];
    let expected = round_cents(stops.iter().map(|s| s.cost).sum());

    let plan = aggregate(start, end, vec![stops]).unwrap();

    assert_eq!(plan.total_fuel_cost, expected);
    assert!((plan.total_fuel_cost - (103.6 + 107.29 + 110.99)).abs() < 1e-9);
    assert!(plan.map_url.contains("a=40,-100,40,-98,40,-97,40,-93,40,-90&"));
}
