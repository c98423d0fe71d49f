mod aggregator;
mod planning_api;
mod segmenter;
mod stop_locator;

pub use aggregator::aggregate;
pub use segmenter::{segment_route, MIN_SEGMENT_MILES};
pub use stop_locator::{required_stops, select_station, target_index, StopLocator};

use crate::{
    api::API,
    config::PlannerSettings,
    entities::Coordinates,
    error::{location_not_found_error, location_out_of_bounds_error, Error},
    external::{LocationResolver, RouteProvider, StationIndex},
};

pub struct Engine {
    resolver: Box<dyn LocationResolver + Send + Sync>,
    routes: Box<dyn RouteProvider + Send + Sync>,
    stations: Box<dyn StationIndex + Send + Sync>,
    settings: PlannerSettings,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(
        resolver: impl LocationResolver + Send + Sync + 'static,
        routes: impl RouteProvider + Send + Sync + 'static,
        stations: impl StationIndex + Send + Sync + 'static,
        settings: PlannerSettings,
    ) -> Result<Self, Error> {
        settings.validate()?;

        Ok(Self {
            resolver: Box::new(resolver),
            routes: Box::new(routes),
            stations: Box::new(stations),
            settings,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn resolve_location(&self, text: &str) -> Result<Coordinates, Error> {
        let coordinates = self
            .resolver
            .resolve(text)
            .await?
            .ok_or_else(location_not_found_error)?;

        if !self.resolver.is_within_country_bounds(coordinates) {
            tracing::info!(?coordinates, "location outside country bounds");
            return Err(location_out_of_bounds_error());
        }

        Ok(coordinates)
    }
}

impl API for Engine {}
