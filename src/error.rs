use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug};

/// Failure classes surfaced by the planning API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    LocationNotFound,
    LocationOutOfBounds,
    RouteUnavailable,
    NoStationsFound,
    UpstreamError,
    InvalidInput,
    Internal,
}

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: i32,
    pub message: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match (self.code, self.kind) {
            (1..=99, ErrorKind::UpstreamError) => (StatusCode::BAD_GATEWAY, "Upstream Error"),
            (1..=99, _) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            (_, ErrorKind::RouteUnavailable | ErrorKind::NoStationsFound) => {
                (StatusCode::NOT_FOUND, self.message.as_str())
            }
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "kind": self.kind,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        kind: ErrorKind::InvalidInput,
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn location_not_found_error() -> Error {
    Error {
        kind: ErrorKind::LocationNotFound,
        code: 102,
        message: "unable to geocode start or end location".into(),
    }
}

pub fn location_out_of_bounds_error() -> Error {
    Error {
        kind: ErrorKind::LocationOutOfBounds,
        code: 103,
        message: "location is outside the supported country bounds".into(),
    }
}

pub fn route_unavailable_error() -> Error {
    Error {
        kind: ErrorKind::RouteUnavailable,
        code: 104,
        message: "no drivable route between start and end".into(),
    }
}

pub fn no_stations_found_error() -> Error {
    Error {
        kind: ErrorKind::NoStationsFound,
        code: 105,
        message: "no fuel stations found along the route".into(),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        kind: ErrorKind::Internal,
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::error!(error = ?err, "station index query failed");

    Error {
        kind: ErrorKind::UpstreamError,
        code: 2,
        message: "database error".into(),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    tracing::error!(error = %err, "upstream request failed");

    Error {
        kind: ErrorKind::UpstreamError,
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        kind: ErrorKind::UpstreamError,
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        kind: ErrorKind::Internal,
        code: 5,
        message: "unexpected error".into(),
    }
}

pub fn config_error(name: &str) -> Error {
    Error {
        kind: ErrorKind::Internal,
        code: 6,
        message: format!("invalid configuration value for {}", name),
    }
}

#[test]
fn client_errors_keep_their_message() {
    let response = location_not_found_error().into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = no_stations_found_error().into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn upstream_errors_map_to_bad_gateway() {
    let response = upstream_error().into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = config_error("MAX_RANGE_MILES").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
