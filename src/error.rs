//! HTTP-facing error type for request handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// ---

/// Errors a handler can return to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A query parameter failed validation.
    #[error("invalid query parameter `{field}`: {message}")]
    Validation {
        field: &'static str,
        message: String,
        input: Option<String>,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        match self {
            ApiError::Validation {
                field,
                message,
                input,
            } => {
                let body = json!({
                    "detail": [{
                        "loc": ["query", field],
                        "msg": message,
                        "input": input,
                    }]
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_validation_error_shape() {
        // ---
        let err = ApiError::Validation {
            field: "racks",
            message: "racks must be between 1 and 24, got 0".to_string(),
            input: Some("0".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "invalid query parameter `racks`: racks must be between 1 and 24, got 0"
        );

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["detail"][0]["loc"], json!(["query", "racks"]));
        assert_eq!(body["detail"][0]["input"], "0");
    }
}
