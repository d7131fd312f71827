use async_trait::async_trait;

use crate::error::TelegramError;
use crate::types::ReplyMarkup;

/// A file to upload, held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl OutgoingFile {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// Outbound messaging capability
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> Result<(), TelegramError>;

    async fn send_photo(
        &self,
        chat_id: i64,
        photo: OutgoingFile,
        caption: Option<&str>,
    ) -> Result<(), TelegramError>;

    async fn send_document(
        &self,
        chat_id: i64,
        document: OutgoingFile,
        caption: Option<&str>,
    ) -> Result<(), TelegramError>;
}
