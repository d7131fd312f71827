use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use tracing::{error, warn};

use wheelbot_telegram::Update;

use super::{AppState, SECRET_HEADER};

/// Accept one update from Telegram.
///
/// Handling errors are logged and still answered with 200 so Telegram does
/// not redeliver the same update forever.
pub async fn receive_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Some(expected) = state.secret.as_deref() {
        let given = headers
            .get(SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if given != expected {
            warn!("Rejected webhook call with a bad secret token");
            return StatusCode::UNAUTHORIZED;
        }
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Malformed update");
            return StatusCode::BAD_REQUEST;
        }
    };

    let update_id = update.update_id;
    if let Err(e) = state.dispatcher.handle_update(update).await {
        error!(update_id, error = %format!("{:#}", e), "Failed to handle update");
    }
    StatusCode::OK
}
