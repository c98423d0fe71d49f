use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// Fuel station as held by the station index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FuelStation {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub price: f64,
    pub location: Coordinates,
}
