use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub live_sessions: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        live_sessions: state.dispatcher.engine().store().len(),
    })
}
