//! Bot API client over HTTPS.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::error::TelegramError;
use crate::messenger::{Messenger, OutgoingFile};
use crate::types::{ApiResponse, ReplyMarkup, Update, User};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Upper bound for ordinary calls; long polls add their own wait on top.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct TelegramClient {
    token: SecretString,
    base_url: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(token: SecretString) -> Self {
        Self {
            token,
            base_url: DEFAULT_API_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Set a custom base URL (for testing or a local Bot API server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url,
            self.token.expose_secret(),
            method
        )
    }

    async fn call<B, T>(&self, method: &str, body: &B, timeout: Duration) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(method, "Bot API call");
        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn upload(
        &self,
        method: &str,
        field: &str,
        chat_id: i64,
        file: OutgoingFile,
        caption: Option<&str>,
    ) -> Result<(), TelegramError> {
        debug!(method, file = %file.file_name, bytes = file.bytes.len(), "Bot API upload");
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)
            .map_err(|e| TelegramError::RequestFailed(e.to_string()))?;

        let mut form = multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part(field.to_string(), part);
        if let Some(caption) = caption {
            form = form.text("caption", caption.to_string());
        }

        let response = self
            .client
            .post(self.method_url(method))
            .timeout(REQUEST_TIMEOUT)
            .multipart(form)
            .send()
            .await?;
        Self::decode::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TelegramError> {
        let status = response.status();
        let body = response.text().await?;

        let parsed: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                TelegramError::Decode(e.to_string())
            } else {
                TelegramError::Api {
                    code: i32::from(status.as_u16()),
                    description: body.chars().take(200).collect(),
                }
            }
        })?;

        if !parsed.ok {
            return Err(TelegramError::Api {
                code: parsed.error_code.unwrap_or(i32::from(status.as_u16())),
                description: parsed.description.unwrap_or_default(),
            });
        }
        parsed
            .result
            .ok_or_else(|| TelegramError::Decode("missing result".to_string()))
    }

    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &json!({}), REQUEST_TIMEOUT).await
    }

    /// Long-poll for updates with `update_id >= offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let mut body = json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }
        self.call(
            "getUpdates",
            &body,
            REQUEST_TIMEOUT + Duration::from_secs(timeout_secs),
        )
        .await
    }

    pub async fn set_webhook(
        &self,
        url: &str,
        max_connections: u32,
        secret_token: Option<&str>,
    ) -> Result<bool, TelegramError> {
        let mut body = json!({
            "url": url,
            "max_connections": max_connections,
            "allowed_updates": ["message"],
        });
        if let Some(secret) = secret_token {
            body["secret_token"] = json!(secret);
        }
        self.call("setWebhook", &body, REQUEST_TIMEOUT).await
    }

    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<bool, TelegramError> {
        self.call(
            "deleteWebhook",
            &json!({ "drop_pending_updates": drop_pending_updates }),
            REQUEST_TIMEOUT,
        )
        .await
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> Result<(), TelegramError> {
        let mut body = json!({ "chat_id": chat_id, "text": text });
        if let Some(markup) = markup {
            body["reply_markup"] = serde_json::to_value(markup)
                .map_err(|e| TelegramError::Decode(e.to_string()))?;
        }
        self.call::<_, serde_json::Value>("sendMessage", &body, REQUEST_TIMEOUT)
            .await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        photo: OutgoingFile,
        caption: Option<&str>,
    ) -> Result<(), TelegramError> {
        self.upload("sendPhoto", "photo", chat_id, photo, caption)
            .await
    }

    async fn send_document(
        &self,
        chat_id: i64,
        document: OutgoingFile,
        caption: Option<&str>,
    ) -> Result<(), TelegramError> {
        self.upload("sendDocument", "document", chat_id, document, caption)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TelegramClient {
        TelegramClient::new(SecretString::from("123:abc".to_string()))
    }

    #[test]
    fn test_method_url() {
        let c = client().with_base_url("http://localhost:8081/");
        assert_eq!(
            c.method_url("getMe"),
            "http://localhost:8081/bot123:abc/getMe"
        );
    }

    #[tokio::test]
    async fn test_request_failed_on_bad_url() {
        // port 1 won't be listening
        let c = client().with_base_url("http://127.0.0.1:1");
        let result = c.send_text(1, "hi", None).await;
        match result {
            Err(TelegramError::RequestFailed(msg)) => {
                assert!(!msg.contains("123:abc"), "token leaked: {}", msg);
            }
            other => panic!("Expected RequestFailed, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_request_failed_on_bad_url() {
        let c = client().with_base_url("http://127.0.0.1:1");
        let file = OutgoingFile::new("w.png", "image/png", vec![0u8; 16]);
        let result = c.send_photo(1, file, Some("cap")).await;
        assert!(matches!(result, Err(TelegramError::RequestFailed(_))));
    }
}
