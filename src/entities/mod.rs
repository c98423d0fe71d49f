mod corridor;
mod fuel_stop;
mod location;
mod plan;
mod route;
mod station;

pub use corridor::Corridor;
pub use fuel_stop::{round_cents, FuelStop};
pub use location::{BoundingBox, Coordinates, US_BOUNDS};
pub use plan::{map_url, RoutePlan};
pub use route::{polyline_miles, Route, RouteSegment};
pub use station::FuelStation;
