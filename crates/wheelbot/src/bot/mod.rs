//! Conversation handling: one Telegram update in, replies out.

mod commands;
mod replies;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, warn};

use wheelbot_chart::{AccentColor, ArtifactKind, ChartOptions, ChartStyle, RenderedChart, Theme};
use wheelbot_core::{
    opening_message, CompletedSurvey, Facet, PrefUpdate, SurveyEngine, TurnOutcome, UserId,
    REPROMPT,
};
use wheelbot_logging::{user_ref, LogEvent, Logger};
use wheelbot_telegram::{Messenger, OutgoingFile, ReplyMarkup, Update};

use crate::wheel::WheelRenderer;

pub use commands::Command;

/// Survey engine whose sessions carry the chart look
pub type WheelSurvey = SurveyEngine<ChartOptions>;

pub struct Dispatcher {
    engine: WheelSurvey,
    messenger: Arc<dyn Messenger>,
    renderer: Arc<dyn WheelRenderer>,
    logger: Arc<Logger>,
    /// Serialises turns of the same user
    turns: Mutex<HashMap<UserId, Arc<tokio::sync::Mutex<()>>>>,
}

impl Dispatcher {
    pub fn new(
        engine: WheelSurvey,
        messenger: Arc<dyn Messenger>,
        renderer: Arc<dyn WheelRenderer>,
        logger: Arc<Logger>,
    ) -> Self {
        Self {
            engine,
            messenger,
            renderer,
            logger,
            turns: Mutex::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &WheelSurvey {
        &self.engine
    }

    pub async fn handle_update(&self, update: Update) -> Result<()> {
        self.logger.log(&LogEvent::UpdateReceived {
            update_id: update.update_id,
            kind: update.kind().to_string(),
        });

        let Some(message) = update.message else {
            return Ok(());
        };
        if message.from.as_ref().is_some_and(|u| u.is_bot) {
            return Ok(());
        }
        let Some(text) = message.text.as_deref() else {
            return Ok(());
        };
        let chat = message.chat.id;
        let user = UserId(message.sender_id());

        let turn = self.turn_lock(user);
        let result = {
            let _guard = turn.lock().await;
            self.handle_text(chat, user, text).await
        };
        drop(turn);
        self.release_idle_turns();
        result
    }

    fn turn_lock(&self, user: UserId) -> Arc<tokio::sync::Mutex<()>> {
        let mut turns = self.turns.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(turns.entry(user).or_default())
    }

    fn release_idle_turns(&self) {
        let mut turns = self.turns.lock().unwrap_or_else(PoisonError::into_inner);
        turns.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    async fn handle_text(&self, chat: i64, user: UserId, text: &str) -> Result<()> {
        match Command::parse(text) {
            Some(command) => self.handle_command(chat, user, command).await,
            None => self.handle_answer(chat, user, text).await,
        }
    }

    async fn reply(&self, chat: i64, text: &str, markup: Option<ReplyMarkup>) -> Result<()> {
        self.messenger
            .send_text(chat, text, markup)
            .await
            .context("Failed to send reply")
    }

    async fn handle_command(&self, chat: i64, user: UserId, command: Command) -> Result<()> {
        match command {
            Command::Start => {
                let state = self.engine.start(user);
                self.logger.log(&LogEvent::SurveyStarted {
                    user: user_ref(user.0),
                    session_id: state.id.to_string(),
                });
                self.reply(
                    chat,
                    &opening_message(),
                    Some(ReplyMarkup::rating()),
                )
                .await
            }
            Command::Help | Command::Unknown(_) => self.reply(chat, replies::HELP, None).await,
            Command::Style(arg) => match arg.and_then(|a| a.parse::<ChartStyle>().ok()) {
                Some(style) => {
                    let update = self.engine.update_preferences(user, |o| o.style = style);
                    self.reply_pref(chat, update, replies::style_saved(style.as_str()))
                        .await
                }
                None => self.reply(chat, replies::STYLE_USAGE, None).await,
            },
            Command::Theme(arg) => match arg.and_then(|a| a.parse::<Theme>().ok()) {
                Some(theme) => {
                    let update = self.engine.update_preferences(user, |o| o.theme = theme);
                    self.reply_pref(chat, update, replies::theme_saved(theme.as_str()))
                        .await
                }
                None => self.reply(chat, replies::THEME_USAGE, None).await,
            },
            Command::Color(arg) => match arg.as_deref().and_then(AccentColor::parse) {
                Some(accent) => {
                    let update = self.engine.update_preferences(user, |o| o.accent = accent);
                    self.reply_pref(chat, update, replies::color_saved(&accent.to_string()))
                        .await
                }
                None => self.reply(chat, replies::COLOR_USAGE, None).await,
            },
            Command::Cancel => {
                if self.engine.cancel(user) {
                    self.logger.log(&LogEvent::SurveyCancelled {
                        user: user_ref(user.0),
                    });
                }
                self.reply(chat, replies::CANCELLED, Some(ReplyMarkup::remove()))
                    .await
            }
        }
    }

    async fn reply_pref(&self, chat: i64, update: PrefUpdate, saved: String) -> Result<()> {
        match update {
            PrefUpdate::Saved => self.reply(chat, &saved, Some(ReplyMarkup::rating())).await,
            PrefUpdate::NoSession => self.reply(chat, replies::NEEDS_SESSION, None).await,
        }
    }

    async fn handle_answer(&self, chat: i64, user: UserId, text: &str) -> Result<()> {
        let outcome = self
            .engine
            .answer(user, text)
            .context("Survey state is inconsistent")?;

        match outcome {
            TurnOutcome::NoSession => self.reply(chat, replies::NOT_STARTED, None).await,
            TurnOutcome::Rejected { facet } => {
                self.logger.log(&LogEvent::AnswerRejected {
                    user: user_ref(user.0),
                    question: facet.index(),
                });
                self.reply(chat, REPROMPT, Some(ReplyMarkup::rating())).await
            }
            TurnOutcome::Next {
                answered,
                value,
                next,
            } => {
                self.logger.log(&LogEvent::AnswerRecorded {
                    user: user_ref(user.0),
                    question: answered.index(),
                    value,
                });
                self.reply(chat, next.question(), Some(ReplyMarkup::rating()))
                    .await
            }
            TurnOutcome::Completed(done) => {
                let last = Facet::Confidence;
                self.logger.log(&LogEvent::AnswerRecorded {
                    user: user_ref(user.0),
                    question: last.index(),
                    value: done.responses.get(last),
                });
                self.finish(chat, user, done).await
            }
        }
    }

    /// Summary text first, then the chart files. A broken chart never
    /// suppresses the summary.
    async fn finish(&self, chat: i64, user: UserId, done: CompletedSurvey<ChartOptions>) -> Result<()> {
        let who = user_ref(user.0);
        self.logger.log(&LogEvent::SurveyCompleted {
            user: who.clone(),
            session_id: done.session_id.to_string(),
            average: done.summary.average,
            band: done.summary.band.label().to_string(),
        });

        let text = format!(
            "{}\n\n{}",
            done.summary.to_text(),
            replies::chart_trailer(&done.preferences, self.renderer.vector())
        );
        self.reply(chat, &text, Some(ReplyMarkup::remove())).await?;

        let started = Instant::now();
        let renderer = Arc::clone(&self.renderer);
        let values = done.responses.values().to_vec();
        let options = done.preferences;
        let rendered = tokio::task::spawn_blocking(move || renderer.render(&values, &options))
            .await
            .map_err(|e| e.to_string())
            .and_then(|r| r.map_err(|e| e.to_string()));

        let chart = match rendered {
            Ok(chart) => chart,
            Err(reason) => {
                error!(user = %who, error = %reason, "Chart rendering failed");
                self.logger.log(&LogEvent::ChartFailed {
                    user: who,
                    error: reason.clone(),
                });
                return self
                    .reply(chat, &replies::render_failed(&reason), None)
                    .await;
            }
        };
        self.logger.log(&LogEvent::ChartRendered {
            style: options.style.to_string(),
            theme: options.theme.to_string(),
            files: chart.artifacts().count(),
            duration_ms: started.elapsed().as_millis() as u64,
        });

        let errors = self.deliver(chat, &who, &chart).await;
        drop(chart);

        if errors.is_empty() {
            Ok(())
        } else {
            self.reply(chat, &replies::delivery_failed(&errors), None)
                .await
        }
    }

    /// Send every artifact, collecting failures instead of stopping at the first.
    async fn deliver(&self, chat: i64, who: &str, chart: &RenderedChart) -> Vec<String> {
        let mut errors = Vec::new();
        for artifact in chart.artifacts() {
            let kind = artifact.kind();
            let label = kind.extension().to_uppercase();

            let sent = match artifact.read_bytes() {
                Ok(bytes) => {
                    let file = OutgoingFile::new(
                        format!("{}.{}", replies::FILE_STEM, kind.extension()),
                        kind.mime_type(),
                        bytes,
                    );
                    match kind {
                        ArtifactKind::Png => {
                            self.messenger
                                .send_photo(chat, file, Some(replies::PHOTO_CAPTION))
                                .await
                        }
                        ArtifactKind::Svg => {
                            self.messenger
                                .send_document(chat, file, Some(replies::DOCUMENT_CAPTION))
                                .await
                        }
                    }
                    .map_err(|e| e.to_string())
                }
                Err(e) => Err(e.to_string()),
            };

            if let Err(reason) = sent {
                warn!(user = %who, artifact = %label, error = %reason, "Delivery failed");
                self.logger.log(&LogEvent::DeliveryFailed {
                    user: who.to_string(),
                    artifact: label.clone(),
                    error: reason.clone(),
                });
                errors.push(format!("{}: {}", label, reason));
            }
        }
        errors
    }
}
