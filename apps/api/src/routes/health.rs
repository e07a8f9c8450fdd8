use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Liveness check. Does not touch storage or the model.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
