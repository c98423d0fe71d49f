pub mod cache;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};

use crate::api::API;
use crate::error::{unexpected_error, Error};
use crate::server::cache::PlanCache;
use crate::server::handlers::routes;

pub use crate::api::DynAPI;
pub use handlers::routes::{FuelStopView, PlanView};

pub fn router(api: DynAPI, cache: PlanCache) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/route", post(routes::plan))
        .layer(Extension(api))
        .layer(Extension(Arc::new(cache)))
}

pub async fn serve<T: API + Sync + Send + 'static>(
    api: T,
    cache: PlanCache,
    addr: SocketAddr,
) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;
    let app = router(api, cache);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "server stopped");
            unexpected_error()
        })
}

async fn root() -> &'static str {
    "fuelroute"
}
