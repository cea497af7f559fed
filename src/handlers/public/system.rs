use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// GET / - service description
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Blog API",
            "version": version,
            "environment": state.config.environment,
            "endpoints": {
                "health": "GET /health",
                "auth": "POST /register, POST /login",
                "users": "GET /users, GET /users/:id",
                "posts": "GET|POST /posts, GET|PUT|DELETE /posts/:id",
            },
            "require_auth": state.config.security.require_auth,
            "ownership_policy": state.config.security.ownership_policy,
        }
    }))
}

/// GET /health - 503 when the store does not answer
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.querier.ping().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("database unavailable")
    })?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "database": "ok"
        }
    })))
}
