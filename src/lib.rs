//! Carbon-Wise: lifecycle CO2 ranking of vehicles
//!
//! Loads a static vehicle dataset once, classifies each row by powertrain and
//! body-style segment, and ranks vehicles by manufacturing + use-phase
//! emissions for a driving profile.
//!
//! - `classify`: powertrain / segment rule tables
//! - `data`: Polars loading into an immutable `VehicleTable`
//! - `ranking`: latest-model deduplication and top-3 ranking
//! - `comparison`: request validation and the four ranked views
//! - `api_server`: Axum HTTP surface (feature `api`)

pub mod classify;
pub mod comparison;
pub mod config;
pub mod data;
pub mod ranking;
pub mod utils;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use classify::{Powertrain, Segment};
pub use comparison::{compare, ComparisonError, ComparisonRequest, ComparisonResponse};
pub use config::ServerConfig;
pub use data::{RawVehicle, VehicleRecord, VehicleTable};
pub use ranking::{rank_top3, RankedResult};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
