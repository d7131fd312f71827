use std::sync::Arc;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use secrecy::ExposeSecret;
use tracing::{info, warn};

use wheelbot_logging::{LogEvent, Logger};
use wheelbot_telegram::TelegramClient;

use crate::api;
use crate::config::Settings;
use crate::{build_dispatcher, identify_bot, shutdown_signal};

/// Concurrent webhook connections Telegram may open
pub const MAX_CONNECTIONS: u32 = 40;

/// Hide the bot token wherever it appears in `text`
pub fn redact(text: &str, token: &str) -> String {
    if token.is_empty() {
        return text.to_string();
    }
    text.replace(token, "<token>")
}

pub async fn handle_serve_command(settings: Settings, logger: Arc<Logger>) -> Result<()> {
    let token = settings.require_token()?;
    let endpoint = settings.webhook_endpoint(token.expose_secret())?;
    let shown_url = redact(&endpoint.url, token.expose_secret());

    let client = Arc::new(
        TelegramClient::new(token.clone()).with_base_url(settings.telegram.api_url.as_str()),
    );

    identify_bot(&client).await?;

    if let Err(e) = client.delete_webhook(false).await {
        warn!(error = %e, "deleteWebhook failed");
    }

    let addr = format!("0.0.0.0:{}", endpoint.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind webhook server to {}", addr))?;
    info!(port = endpoint.port, "Webhook server listening");

    let registered = client
        .set_webhook(&endpoint.url, MAX_CONNECTIONS, endpoint.secret.as_deref())
        .await
        .with_context(|| format!("Failed to register webhook {}", shown_url))?;
    if !registered {
        bail!("Telegram did not accept webhook {}", shown_url);
    }
    logger.log(&LogEvent::WebhookRegistered {
        url: shown_url.clone(),
    });

    let dispatcher = build_dispatcher(&settings, client, logger);
    let router = api::create_router(dispatcher, &endpoint.path, endpoint.secret.clone());

    eprintln!();
    eprintln!(
        "  {} {}",
        "->".bright_green(),
        format!("Receiving updates at {}", shown_url).bold()
    );
    eprintln!("  {} Press {} to stop", "->".dimmed(), "Ctrl+C".bold());
    eprintln!();

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Webhook server error")
}
