use fuelroute::config::Config;
use fuelroute::db::{PgPool, PgStationIndex};
use fuelroute::engine::Engine;
use fuelroute::error::Error;
use fuelroute::external::{Nominatim, OpenRouteService};
use fuelroute::server::{cache::PlanCache, serve};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let PgPool(pool) = PgPool::new(&config.database_url, config.database_max_connections).await?;
    let stations = PgStationIndex::new(pool).await?;

    let engine = Engine::new(
        Nominatim::new(config.nominatim_api_base.clone()),
        OpenRouteService::new(config.ors_api_base.clone(), config.ors_api_key.clone()),
        stations,
        config.planner,
    )?;

    serve(engine, PlanCache::new(config.plan_cache_ttl_secs), config.listen_addr).await
}
