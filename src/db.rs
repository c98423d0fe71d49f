use async_trait::async_trait;
use geozero::wkb;
use sqlx::{postgres::PgPoolOptions, Executor, Pool, Postgres, Row};

use crate::{
    entities::{Coordinates, Corridor, FuelStation},
    error::Error,
    external::StationIndex,
};

pub struct PgPool(pub Pool<Postgres>);

impl PgPool {
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        Ok(Self(pool))
    }
}

/// Station index over the `fuel_stations` PostGIS table.
#[derive(Clone, Debug)]
pub struct PgStationIndex {
    pool: Pool<Postgres>,
}

impl PgStationIndex {
    #[tracing::instrument(name = "PgStationIndex::new", skip_all)]
    pub async fn new(pool: Pool<Postgres>) -> Result<Self, Error> {
        pool.execute("CREATE EXTENSION IF NOT EXISTS postgis").await?;
        pool.execute("CREATE TABLE IF NOT EXISTS fuel_stations (id SERIAL PRIMARY KEY, name VARCHAR(255) NOT NULL, address VARCHAR(255) NOT NULL, city VARCHAR(100) NOT NULL, state VARCHAR(100) NOT NULL, price DOUBLE PRECISION NOT NULL, location geography(Point, 4326) NOT NULL)")
            .await?;
        pool.execute("CREATE INDEX IF NOT EXISTS fuel_stations_location_idx ON fuel_stations USING GIST (location)")
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl StationIndex for PgStationIndex {
    #[tracing::instrument(skip_all, fields(radius_miles = corridor.radius_miles))]
    async fn query_corridor(&self, corridor: &Corridor) -> Result<Vec<FuelStation>, Error> {
        let query = "
            SELECT
                s.id,
                s.name,
                s.address,
                s.city,
                s.state,
                s.price,
                ST_X(s.location::geometry) AS longitude,
                ST_Y(s.location::geometry) AS latitude
            FROM
                fuel_stations s
            WHERE
                ST_DWithin(s.location, ST_SetSRID($1, 4326)::geography, $2)
            ORDER BY
                s.price ASC,
                s.id ASC
        ";

        let mut conn = self.pool.acquire().await?;
        let results = conn
            .fetch_all(
                sqlx::query(query)
                    .bind(wkb::Encode(corridor.geometry()))
                    .bind(corridor.radius_meters()),
            )
            .await?;

        let mut stations = Vec::with_capacity(results.len());

        for result in results.iter() {
            stations.push(FuelStation {
                id: result.try_get("id")?,
                name: result.try_get("name")?,
                address: result.try_get("address")?,
                city: result.try_get("city")?,
                state: result.try_get("state")?,
                price: result.try_get("price")?,
                location: Coordinates::new(
                    result.try_get("longitude")?,
                    result.try_get("latitude")?,
                ),
            });
        }

        tracing::info!(count = stations.len(), "stations in corridor");

        Ok(stations)
    }
}
