// src/routes/greeting.rs
//! Static greeting endpoints.
//!
//! `GET /` and `GET /api/hello` return fixed messages and touch nothing else.
//! They are used by the frontend and by smoke checks to confirm the service
//! answers HTTP at all.

use axum::{routing::get, Json, Router};

use crate::Message;

/// Handle `GET /`.
async fn root() -> Json<Message> {
    Json(Message {
        message: "Hello from FastAPI Backend!",
    })
}

/// Handle `GET /api/hello`.
async fn hello() -> Json<Message> {
    Json(Message {
        message: "Hello from the backend API!",
    })
}

/// Create a subrouter containing the greeting routes.
///
/// Generic over the application state so it merges with the gateway router
/// regardless of the state type.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/api/hello", get(hello))
}
