use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    entities::{Coordinates, Route},
    error::{route_unavailable_error, upstream_error, Error},
    external::RouteProvider,
};

const PROFILE: &str = "driving-car";

#[derive(Clone, Debug, Serialize, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Feature {
    geometry: LineGeometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct LineGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Directions client for the OpenRouteService v2 API.
#[derive(Clone, Debug)]
pub struct OpenRouteService {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl OpenRouteService {
    pub fn new(api_base: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            api_key,
        }
    }
}

#[async_trait]
impl RouteProvider for OpenRouteService {
    #[tracing::instrument(skip(self))]
    async fn get_route(&self, start: Coordinates, end: Coordinates) -> Result<Route, Error> {
        let url = format!(
            "https://{}/v2/directions/{}/geojson",
            self.api_base, PROFILE
        );

        let res = self
            .client
            .post(url)
            .header("Authorization", &self.api_key)
            .json(&json!({
                "coordinates": [
                    [start.longitude, start.latitude],
                    [end.longitude, end.latitude],
                ],
            }))
            .send()
            .await?;

        let status = res.status();

        if status.is_client_error() {
            tracing::warn!(%status, "route provider rejected request");
            return Err(route_unavailable_error());
        } else if status != StatusCode::OK {
            return Err(upstream_error());
        }

        let data: FeatureCollection = res.json().await?;

        route_from_features(data)
    }
}

fn route_from_features(data: FeatureCollection) -> Result<Route, Error> {
    let feature = data
        .features
        .into_iter()
        .next()
        .ok_or_else(route_unavailable_error)?;

    let points = feature
        .geometry
        .coordinates
        .into_iter()
        .map(|[longitude, latitude]| Coordinates::new(longitude, latitude))
        .collect();

    Route::new(points)
}

#[test]
fn parses_geojson_directions() {
    let body = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"summary": {"distance": 1234.5}},
            "geometry": {
                "type": "LineString",
                "coordinates": [[-87.62, 41.87], [-88.0, 41.9], [-89.1, 42.0]]
            }
        }]
    }"#;

    let data: FeatureCollection = serde_json::from_str(body).unwrap();
    let route = route_from_features(data).unwrap();

    assert_eq!(route.points().len(), 3);
    assert_eq!(route.points()[0], Coordinates::new(-87.62, 41.87));
}

#[test]
fn empty_or_degenerate_geometry_is_unavailable() {
    use crate::error::ErrorKind;

    let data: FeatureCollection = serde_json::from_str(r#"{"features": []}"#).unwrap();
    assert_eq!(
        route_from_features(data).unwrap_err().kind,
        ErrorKind::RouteUnavailable
    );

    let data: FeatureCollection = serde_json::from_str(
        r#"{"features": [{"geometry": {"coordinates": [[-87.62, 41.87]]}}]}"#,
    )
    .unwrap();
    assert_eq!(
        route_from_features(data).unwrap_err().kind,
        ErrorKind::RouteUnavailable
    );
}
