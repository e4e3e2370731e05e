use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version, whether a matching
/// endpoint is configured, and the number of live visitor sessions.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let sessions = state.sessions.len().await;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "talent-dashboard",
        "search_api_configured": state.config.search_api_url.is_some(),
        "sessions": sessions
    }))
}
