pub mod memory_index;
pub mod nominatim;
pub mod openrouteservice;

use async_trait::async_trait;

use crate::{
    entities::{Coordinates, Corridor, FuelStation, Route, US_BOUNDS},
    error::Error,
};

pub use memory_index::MemoryStationIndex;
pub use nominatim::Nominatim;
pub use openrouteservice::OpenRouteService;

/// Free-text geocoding plus the country bounds check.
#[async_trait]
pub trait LocationResolver {
    async fn resolve(&self, text: &str) -> Result<Option<Coordinates>, Error>;

    fn is_within_country_bounds(&self, coordinates: Coordinates) -> bool {
        US_BOUNDS.contains(coordinates)
    }
}

/// Road geometry between two points.
#[async_trait]
pub trait RouteProvider {
    async fn get_route(&self, start: Coordinates, end: Coordinates) -> Result<Route, Error>;
}

/// Read-only spatial store of fuel stations.
#[async_trait]
pub trait StationIndex {
    /// Stations intersecting the corridor, cheapest first.
    async fn query_corridor(&self, corridor: &Corridor) -> Result<Vec<FuelStation>, Error>;
}
