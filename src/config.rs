use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::engine::MIN_SEGMENT_MILES;
use crate::error::{config_error, invalid_input_error, Error};

/// Tunables of the fuel stop planner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlannerSettings {
    /// Full-tank range; also the maximum segment length.
    pub max_range_miles: f64,
    pub miles_per_gallon: f64,
    pub search_radius_miles: f64,
    /// Upper bound on concurrent station index queries per request.
    pub segment_concurrency: usize,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            max_range_miles: 500.0,
            miles_per_gallon: 10.0,
            search_radius_miles: 25.0,
            segment_concurrency: 4,
        }
    }
}

impl PlannerSettings {
    pub fn validate(&self) -> Result<(), Error> {
        let positive = [
            self.max_range_miles,
            self.miles_per_gallon,
            self.search_radius_miles,
        ];

        if positive.iter().any(|v| !v.is_finite() || *v <= 0.0) || self.segment_concurrency == 0 {
            return Err(invalid_input_error());
        }

        // the range doubles as the segment limit
        if self.max_range_miles < MIN_SEGMENT_MILES {
            return Err(invalid_input_error());
        }

        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub ors_api_base: String,
    pub ors_api_key: String,
    pub nominatim_api_base: String,
    pub listen_addr: SocketAddr,
    pub plan_cache_ttl_secs: i64,
    pub planner: PlannerSettings,
}

impl Config {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let defaults = PlannerSettings::default();

        let planner = PlannerSettings {
            max_range_miles: var_or("MAX_RANGE_MILES", defaults.max_range_miles)?,
            miles_per_gallon: var_or("MILES_PER_GALLON", defaults.miles_per_gallon)?,
            search_radius_miles: var_or("SEARCH_RADIUS_MILES", defaults.search_radius_miles)?,
            segment_concurrency: var_or("SEGMENT_CONCURRENCY", defaults.segment_concurrency)?,
        };
        planner.validate().map_err(|_| config_error("planner settings"))?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: var_or("DATABASE_MAX_CONNECTIONS", 5)?,
            ors_api_base: env::var("ORS_API_BASE")
                .unwrap_or_else(|_| "api.openrouteservice.org".into()),
            ors_api_key: env::var("ORS_API_KEY")?,
            nominatim_api_base: env::var("NOMINATIM_API_BASE")
                .unwrap_or_else(|_| "nominatim.openstreetmap.org".into()),
            listen_addr: var_or("LISTEN_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?,
            plan_cache_ttl_secs: var_or("PLAN_CACHE_TTL_SECS", 3600)?,
            planner,
        })
    }
}

fn var_or<T: FromStr>(name: &str, default: T) -> Result<T, Error> {
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|_| config_error(name)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err.into()),
    }
}

#[test]
fn default_settings_are_valid() {
    assert!(PlannerSettings::default().validate().is_ok());
}

#[test]
fn non_positive_settings_are_rejected() {
    let settings = PlannerSettings {
        miles_per_gallon: 0.0,
        ..PlannerSettings::default()
    };
    assert!(settings.validate().is_err());

    let settings = PlannerSettings {
        segment_concurrency: 0,
        ..PlannerSettings::default()
    };
    assert!(settings.validate().is_err());
}

#[test]
fn range_below_segment_minimum_is_rejected() {
    let settings = PlannerSettings {
        max_range_miles: 0.000_001,
        ..PlannerSettings::default()
    };
    assert!(settings.validate().is_err());

    let settings = PlannerSettings {
        max_range_miles: MIN_SEGMENT_MILES,
        ..PlannerSettings::default()
    };
    assert!(settings.validate().is_ok());
}

#[test]
fn var_or_falls_back_and_parses() {
    env::remove_var("FUELROUTE_TEST_UNSET");
    assert_eq!(var_or("FUELROUTE_TEST_UNSET", 7u32).unwrap(), 7);

    env::set_var("FUELROUTE_TEST_RANGE", " 420.5 ");
    assert_eq!(var_or("FUELROUTE_TEST_RANGE", 0.0f64).unwrap(), 420.5);

    env::set_var("FUELROUTE_TEST_BAD", "lots");
    assert!(var_or("FUELROUTE_TEST_BAD", 0.0f64).is_err());
}
