use axum::Router;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{Config, Database};

mod diagnostics;
mod greeting;
mod telemetry;

// ---

pub fn router(database: Database, config: Config) -> Router {
    // ---
    Router::new()
        .merge(greeting::router())
        .merge(diagnostics::router())
        .merge(telemetry::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state((database, config))
}

/// Fully permissive CORS, credentials included.
///
/// Wildcards cannot be combined with credentials, so origin, methods and
/// headers are mirrored from the request instead.
fn cors() -> CorsLayer {
    // ---
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::sync::Arc;

    use anyhow::Result;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::database::Catalog;

    struct FixedCatalog;

    #[async_trait]
    impl Catalog for FixedCatalog {
        async fn list_collections(&self) -> Result<Vec<String>> {
            Ok(vec!["racks".to_string(), "harvests".to_string()])
        }
    }

    struct BrokenCatalog;

    #[async_trait]
    impl Catalog for BrokenCatalog {
        async fn list_collections(&self) -> Result<Vec<String>> {
            anyhow::bail!("connection refused")
        }
    }

    fn app() -> Router {
        router(Database::Missing, Config::default())
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        // ---
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_greetings() {
        // ---
        let (status, body) = get(app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Hello from FastAPI Backend!");

        let (status, body) = get(app(), "/api/hello").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Hello from the backend API!");
    }

    #[tokio::test]
    async fn test_telemetry_default_count() {
        // ---
        let (status, body) = get(app(), "/api/telemetry").await;
        assert_eq!(status, StatusCode::OK);

        let racks = body["racks"].as_array().unwrap();
        assert_eq!(racks.len(), 6);
        for (i, rack) in racks.iter().enumerate() {
            assert_eq!(rack["rack_id"], i as u64 + 1);
        }
    }

    #[tokio::test]
    async fn test_telemetry_three_racks() {
        // ---
        let (status, body) = get(app(), "/api/telemetry?racks=3").await;
        assert_eq!(status, StatusCode::OK);

        let racks = body["racks"].as_array().unwrap();
        assert_eq!(racks.len(), 3);
        for (i, rack) in racks.iter().enumerate() {
            assert_eq!(rack["rack_id"], i as u64 + 1);

            let temperature = rack["temperature_c"].as_f64().unwrap();
            let humidity = rack["humidity_pct"].as_f64().unwrap();
            let moisture = rack["moisture_pct"].as_f64().unwrap();
            assert!((17.2..=22.8).contains(&temperature));
            assert!((51.5..=78.5).contains(&humidity));
            assert!((55.0..=85.0).contains(&moisture));
            assert!(rack["light_lux"].as_u64().unwrap() >= 8000);

            let status = rack["growth_status"].as_str().unwrap();
            assert!(["Early", "Mid", "Harvest"].contains(&status));
        }
    }

    #[tokio::test]
    async fn test_telemetry_bounds_are_inclusive() {
        // ---
        let (status, body) = get(app(), "/api/telemetry?racks=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["racks"].as_array().unwrap().len(), 1);

        let (status, body) = get(app(), "/api/telemetry?racks=24").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["racks"].as_array().unwrap().len(), 24);
    }

    #[tokio::test]
    async fn test_telemetry_rejects_out_of_range() {
        // ---
        for racks in ["0", "25", "-1", "1000"] {
            let uri = format!("/api/telemetry?racks={racks}");
            let (status, body) = get(app(), &uri).await;

            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "racks={racks}");
            assert!(body.get("racks").is_none());
            assert_eq!(body["detail"][0]["loc"][1], "racks");
            assert_eq!(body["detail"][0]["input"], racks);
        }
    }

    #[tokio::test]
    async fn test_telemetry_rejects_malformed() {
        // ---
        for racks in ["abc", "2.5", "six"] {
            let uri = format!("/api/telemetry?racks={racks}");
            let (status, body) = get(app(), &uri).await;

            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "racks={racks}");
            assert_eq!(body["detail"][0]["loc"][1], "racks");
        }
    }

    #[tokio::test]
    async fn test_diagnostics_without_database() {
        // ---
        let (status, body) = get(app(), "/test").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["backend"], "running");
        assert_eq!(body["database"], "not available");
        assert_eq!(body["database_url"], false);
        assert_eq!(body["database_name"], false);
        assert_eq!(body["connection_status"], "not connected");
        assert_eq!(body["collections"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_diagnostics_uninitialized() {
        // ---
        let config = Config {
            db_url: Some("not a url".to_string()),
            ..Config::default()
        };
        let app = router(Database::Uninitialized, config);

        let (status, body) = get(app, "/test").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "available but not initialized");
        assert_eq!(body["database_url"], true);
        assert_eq!(body["connection_status"], "not connected");
    }

    #[tokio::test]
    async fn test_diagnostics_connected() {
        // ---
        let config = Config {
            db_url: Some("postgres://db/farm".to_string()),
            db_name: Some("farm".to_string()),
            ..Config::default()
        };
        let app = router(Database::Connected(Arc::new(FixedCatalog)), config);

        let (status, body) = get(app, "/test").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "connected & working");
        assert_eq!(body["database_url"], true);
        assert_eq!(body["database_name"], true);
        assert_eq!(body["connection_status"], "connected");
        assert_eq!(body["collections"], serde_json::json!(["racks", "harvests"]));
    }

    #[tokio::test]
    async fn test_diagnostics_connected_but_failing() {
        // ---
        let app = router(
            Database::Connected(Arc::new(BrokenCatalog)),
            Config::default(),
        );

        let (status, body) = get(app, "/test").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "connected but error: connection refused");
        assert_eq!(body["connection_status"], "connected");
        assert_eq!(body["collections"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_cors_mirrors_origin_with_credentials() {
        // ---
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/telemetry")
            .header(header::ORIGIN, "http://farm.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-farm-token")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let headers = response.headers();

        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://farm.example"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "x-farm-token");
    }
}
