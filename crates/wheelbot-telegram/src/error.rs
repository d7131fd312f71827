use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelegramError {
    /// Network or HTTP-level failure. Never includes the request URL.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Telegram API error {code}: {description}")]
    Api { code: i32, description: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        // the URL carries the bot token
        TelegramError::RequestFailed(e.without_url().to_string())
    }
}
