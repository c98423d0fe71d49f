use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::RoutePlan;
use crate::error::Error;

#[async_trait]
pub trait PlanningAPI {
    /// Resolves both locations, fetches the road route and picks fuel stops along it.
    async fn plan_route(&self, start: String, end: String) -> Result<RoutePlan, Error>;
}

pub trait API: PlanningAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
