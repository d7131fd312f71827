//! # wheelbot-telegram
//!
//! The slice of the Telegram Bot API the survey bot needs: receiving updates
//! (webhook payloads or `getUpdates`), sending text with a reply keyboard, and
//! uploading chart files.
//!
//! ## Key Types
//!
//! - [`Messenger`] - Outbound capability the dispatcher depends on
//! - [`TelegramClient`] - HTTP implementation over reqwest
//! - [`Update`] - Incoming update payload

mod client;
mod error;
mod messenger;
mod types;

pub use client::{TelegramClient, DEFAULT_API_URL};
pub use error::TelegramError;
pub use messenger::{Messenger, OutgoingFile};
pub use types::{
    ApiResponse, Chat, KeyboardButton, Message, ReplyKeyboardMarkup, ReplyKeyboardRemove,
    ReplyMarkup, Update, User,
};
