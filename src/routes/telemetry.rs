use axum::{
    extract::{rejection::QueryRejection, Query},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{telemetry, ApiError, Config, Database, RackCount, TelemetrySnapshot};

// ---

pub fn router() -> Router<(Database, Config)> {
    // ---
    Router::new().route("/api/telemetry", get(handler))
}

/// Query parameters for `GET /api/telemetry`
#[derive(Debug, Deserialize)]
pub struct TelemetryQuery {
    racks: Option<i64>,
}

async fn handler(
    query: Result<Query<TelemetryQuery>, QueryRejection>,
) -> Result<Json<TelemetrySnapshot>, ApiError> {
    // ---
    let Query(params) = query.map_err(|rejection| {
        debug!("GET /api/telemetry - rejected query: {}", rejection);
        ApiError::Validation {
            field: "racks",
            message: rejection.body_text(),
            input: None,
        }
    })?;

    let count = parse_rack_count(&params)?;

    let snapshot = telemetry::synthesize(count);
    info!(
        "GET /api/telemetry - returning {} racks at {}",
        snapshot.racks.len(),
        snapshot.timestamp
    );
    Ok(Json(snapshot))
}

/// Validate the requested rack count before any generation happens.
fn parse_rack_count(params: &TelemetryQuery) -> Result<RackCount, ApiError> {
    // ---
    match params.racks {
        None => Ok(RackCount::default()),
        Some(n) => RackCount::new(n).map_err(|e| ApiError::Validation {
            field: "racks",
            message: e.to_string(),
            input: Some(n.to_string()),
        }),
    }
}
