use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and the active card settings.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "quotecards",
        "overflow": state.options.overflow,
        "shuffle": state.options.shuffler.name(),
        "cut_guides": state.options.cut_guides,
    }))
}
