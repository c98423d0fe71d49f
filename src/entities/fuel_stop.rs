use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, FuelStation};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelStop {
    pub station: FuelStation,
    pub gallons: f64,
    pub cost: f64,
    /// Share of the segment this purchase is meant to cover.
    pub distance_miles: f64,
}

impl FuelStop {
    pub fn new(station: FuelStation, distance_miles: f64, miles_per_gallon: f64) -> Self {
        let gallons = distance_miles / miles_per_gallon;
        let cost = round_cents(station.price * gallons);

        Self {
            station,
            gallons,
            cost,
            distance_miles,
        }
    }

    pub fn location(&self) -> Coordinates {
        self.station.location
    }
}

/// Rounds to two decimals, halves away from zero.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[test]
fn stop_cost_is_price_times_gallons() {
    let station = FuelStation {
        id: 1,
        name: "Pilot".into(),
        address: "I-80 Exit 10".into(),
        city: "Big Springs".into(),
        state: "NE".into(),
        price: 3.0,
        location: Coordinates::new(-102.07, 41.06),
    };

    let stop = FuelStop::new(station, 500.0, 10.0);
    assert_eq!(stop.gallons, 50.0);
    assert_eq!(stop.cost, 150.0);
}

#[test]
fn round_cents_rounds_half_away_from_zero() {
    assert_eq!(round_cents(1.005_000_1), 1.01);
    assert_eq!(round_cents(2.5), 2.5);
    assert_eq!(round_cents(3.14159), 3.14);
    assert_eq!(round_cents(0.125), 0.13);
}
