//! Test doubles shared by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use wheelbot_telegram::{
    Chat, Message, Messenger, OutgoingFile, ReplyMarkup, TelegramError, Update, User,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat: i64,
        text: String,
        markup: Option<ReplyMarkup>,
    },
    Photo {
        file: OutgoingFile,
        caption: Option<String>,
    },
    Document {
        file: OutgoingFile,
        caption: Option<String>,
    },
}

#[derive(Default)]
pub struct FakeMessenger {
    sent: Mutex<Vec<Sent>>,
    fail_photos: bool,
}

impl FakeMessenger {
    pub fn failing_photos() -> Self {
        Self {
            fail_photos: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_text(&self) -> String {
        self.texts().pop().unwrap_or_default()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<ReplyMarkup>,
    ) -> Result<(), TelegramError> {
        self.sent.lock().unwrap().push(Sent::Text {
            chat: chat_id,
            text: text.to_string(),
            markup,
        });
        Ok(())
    }

    async fn send_photo(
        &self,
        _chat_id: i64,
        photo: OutgoingFile,
        caption: Option<&str>,
    ) -> Result<(), TelegramError> {
        if self.fail_photos {
            return Err(TelegramError::RequestFailed("connection reset".into()));
        }
        self.sent.lock().unwrap().push(Sent::Photo {
            file: photo,
            caption: caption.map(str::to_string),
        });
        Ok(())
    }

    async fn send_document(
        &self,
        _chat_id: i64,
        document: OutgoingFile,
        caption: Option<&str>,
    ) -> Result<(), TelegramError> {
        self.sent.lock().unwrap().push(Sent::Document {
            file: document,
            caption: caption.map(str::to_string),
        });
        Ok(())
    }
}

pub fn text_update(user: i64, text: &str) -> Update {
    Update {
        update_id: 1,
        message: Some(Message {
            message_id: 1,
            from: Some(User {
                id: user,
                is_bot: false,
                first_name: "Test".into(),
                username: None,
            }),
            chat: Chat {
                id: user,
                kind: "private".into(),
            },
            date: 0,
            text: Some(text.into()),
        }),
    }
}
