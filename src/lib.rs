//! Library half of the `rackfarm-telemetry` backend service.
//!
//! Follows the Explicit Module Boundary Pattern (EMBP): sibling modules only
//! import from the crate root, never from each other's internals. The
//! binary in `main.rs` and the integration tests build the service through
//! [`routes::router`].

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod routes;
pub mod telemetry;

pub use config::Config;
pub use database::Database;
pub use error::ApiError;

// These are not used here but they are re-exported for routes/*.rs, that way
// refactoring is easier since routes/*.rs do not need to know where the
// models live, only their parent crate root.
pub use models::{
    DiagnosticReport, GrowthStatus, Message, RackCount, RackReading, TelemetrySnapshot,
};
