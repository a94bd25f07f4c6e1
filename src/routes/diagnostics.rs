// src/routes/diagnostics.rs
//! `GET /test` diagnostic probe.
//!
//! Reports whether the optional database integration is present and
//! reachable. The handler has no error path: every fault met while probing
//! is folded into the `database` string of a 200 response.

use axum::{extract::State, routing::get, Json, Router};
use tracing::info;

use crate::{
    database::{self, Database},
    Config, DiagnosticReport,
};

// ---

pub fn router() -> Router<(Database, Config)> {
    // ---
    Router::new().route("/test", get(handler))
}

async fn handler(State((db, config)): State<(Database, Config)>) -> Json<DiagnosticReport> {
    // ---
    let probe = database::probe(&db, config.db_probe_timeout).await;
    info!("GET /test - database: {}", probe.status);

    Json(DiagnosticReport {
        backend: "running",
        database: probe.status.to_string(),
        database_url: config.db_url.is_some(),
        database_name: config.db_name.is_some(),
        connection_status: if probe.connected {
            "connected"
        } else {
            "not connected"
        },
        collections: probe.collections,
    })
}
