use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{
    entities::Coordinates,
    error::{upstream_error, Error},
    external::LocationResolver,
};

const USER_AGENT: &str = "fuelroute/0.1";

#[derive(Clone, Debug, Serialize, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

/// Geocoder backed by a Nominatim search endpoint.
#[derive(Clone, Debug)]
pub struct Nominatim {
    client: reqwest::Client,
    api_base: String,
}

impl Nominatim {
    pub fn new(api_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
        }
    }
}

#[async_trait]
impl LocationResolver for Nominatim {
    #[tracing::instrument(skip(self))]
    async fn resolve(&self, text: &str) -> Result<Option<Coordinates>, Error> {
        let url = format!("https://{}/search", self.api_base);

        let res = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .query(&[("q", text)])
            .query(&[("format", "json"), ("limit", "1"), ("countrycodes", "us")])
            .send()
            .await?;

        if res.status() != StatusCode::OK {
            return Err(upstream_error());
        }

        let results: Vec<SearchResult> = res.json().await?;

        first_match(results)
    }
}

fn first_match(results: Vec<SearchResult>) -> Result<Option<Coordinates>, Error> {
    let result = match results.into_iter().next() {
        Some(result) => result,
        None => return Ok(None),
    };

    let longitude: f64 = result.lon.parse().map_err(|_| upstream_error())?;
    let latitude: f64 = result.lat.parse().map_err(|_| upstream_error())?;

    tracing::info!(display_name = ?result.display_name, longitude, latitude, "resolved location");

    Ok(Some(Coordinates::new(longitude, latitude)))
}

#[test]
fn first_match_parses_string_coordinates() {
    let results: Vec<SearchResult> = serde_json::from_str(
        r#"[{"lat": "39.7392364", "lon": "-104.984862", "display_name": "Denver, Colorado, United States"}]"#,
    )
    .unwrap();

    let coordinates = first_match(results).unwrap().unwrap();
    assert_eq!(coordinates, Coordinates::new(-104.984862, 39.7392364));
}

#[test]
fn no_results_is_a_miss_not_an_error() {
    assert_eq!(first_match(vec![]).unwrap(), None);
}

#[test]
fn garbled_coordinates_are_upstream_errors() {
    use crate::error::ErrorKind;

    let results = vec![SearchResult {
        lat: "north".into(),
        lon: "-104.98".into(),
        display_name: None,
    }];

    assert_eq!(first_match(results).unwrap_err().kind, ErrorKind::UpstreamError);
}
