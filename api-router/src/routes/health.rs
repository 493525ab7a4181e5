use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api_state::ApiState;

/// Liveness probe: always returns 200 to indicate the process is running.
pub async fn root() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "message": "Document Q&A API is running",
            "status": "healthy"
        })),
    )
}

/// Detailed health check: reports configured model identifiers, never
/// credential values.
pub async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "llm_model": state.config.query_model,
            "embedding_model": state.config.embedding_model,
            "embedding_backend": state.config.embedding_backend,
            "api_key_configured": !state.config.openai_api_key.is_empty()
        })),
    )
}
