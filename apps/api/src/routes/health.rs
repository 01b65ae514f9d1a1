use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a liveness flag and the current unix timestamp.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "ok": true,
        "ts": chrono::Utc::now().timestamp()
    }))
}
