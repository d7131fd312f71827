mod health;
mod webhook;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::bot::Dispatcher;
use crate::config::HEALTH_PATH;

/// Header Telegram echoes back when the webhook was registered with a secret
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub secret: Option<Arc<str>>,
}

pub fn create_router(
    dispatcher: Arc<Dispatcher>,
    webhook_path: &str,
    secret: Option<String>,
) -> Router {
    let state = AppState {
        dispatcher,
        secret: secret.map(Arc::from),
    };

    Router::new()
        .route(webhook_path, post(webhook::receive_update))
        .route(HEALTH_PATH, get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
