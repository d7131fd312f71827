use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use wheelbot_chart::{
    ChartError, ChartOptions, ChartRenderer, ChartStyle, RenderSettings, RenderedChart, Theme,
};
use wheelbot_core::{
    opening_message, InMemorySessionStore, SessionStore, SurveyEngine, UserId, REPROMPT,
};
use wheelbot_logging::{LogFormat, Logger};
use wheelbot_telegram::{ReplyMarkup, Update};

use super::{replies, Dispatcher};
use crate::testing::{text_update, FakeMessenger, Sent};
use crate::wheel::WheelRenderer;

/// Small real renderer that remembers where it wrote
struct RecordingRenderer {
    inner: ChartRenderer,
    paths: Mutex<Vec<PathBuf>>,
}

impl RecordingRenderer {
    fn new() -> Self {
        Self {
            inner: ChartRenderer::new(RenderSettings {
                size_px: 240,
                vector: true,
                font_path: None,
            }),
            paths: Mutex::new(Vec::new()),
        }
    }
}

impl WheelRenderer for RecordingRenderer {
    fn render(&self, values: &[u8], options: &ChartOptions) -> Result<RenderedChart, ChartError> {
        let chart = WheelRenderer::render(&self.inner, values, options)?;
        self.paths
            .lock()
            .unwrap()
            .extend(chart.artifacts().map(|a| a.path().to_path_buf()));
        Ok(chart)
    }

    fn vector(&self) -> bool {
        true
    }
}

struct BrokenRenderer;

impl WheelRenderer for BrokenRenderer {
    fn render(&self, _: &[u8], _: &ChartOptions) -> Result<RenderedChart, ChartError> {
        Err(ChartError::Draw("backend exploded".into()))
    }

    fn vector(&self) -> bool {
        true
    }
}

struct Harness {
    dispatcher: Dispatcher,
    messenger: Arc<FakeMessenger>,
    store: Arc<InMemorySessionStore<ChartOptions>>,
}

fn harness_with(messenger: FakeMessenger, renderer: Arc<dyn WheelRenderer>) -> Harness {
    let messenger = Arc::new(messenger);
    let store = Arc::new(InMemorySessionStore::<ChartOptions>::new());
    let engine = SurveyEngine::new(store.clone(), ChartOptions::default());
    let dispatcher = Dispatcher::new(
        engine,
        messenger.clone(),
        renderer,
        Arc::new(Logger::new(LogFormat::Compact)),
    );
    Harness {
        dispatcher,
        messenger,
        store,
    }
}

fn harness() -> Harness {
    harness_with(FakeMessenger::default(), Arc::new(RecordingRenderer::new()))
}

impl Harness {
    async fn say(&self, user: i64, text: &str) {
        self.dispatcher
            .handle_update(text_update(user, text))
            .await
            .unwrap();
    }

    async fn answer_all(&self, user: i64, answers: &[u8]) {
        for a in answers {
            self.say(user, &a.to_string()).await;
        }
    }
}

const MIXED: [u8; 8] = [1, 4, 2, 5, 3, 0, 5, 4];

// ============================================================
// Survey flow
// ============================================================

#[tokio::test]
async fn test_start_sends_greeting_with_keyboard() {
    let h = harness();
    h.say(7, "/start").await;

    let sent = h.messenger.sent();
    assert_eq!(sent.len(), 1);
    let Sent::Text { chat, text, markup } = &sent[0] else {
        panic!("expected text, got {:?}", sent[0]);
    };
    assert_eq!(*chat, 7);
    assert_eq!(text, &opening_message());
    assert!(text.contains("1) "));
    assert_eq!(markup.as_ref(), Some(&ReplyMarkup::rating()));
    assert_eq!(h.store.len(), 1);
}

#[tokio::test]
async fn test_invalid_answer_reprompts() {
    let h = harness();
    h.say(7, "/start").await;
    h.say(7, "2").await;
    h.messenger.clear();

    h.say(7, "seven").await;
    h.say(7, "6").await;

    assert_eq!(h.messenger.texts(), vec![REPROMPT, REPROMPT]);
    assert_eq!(h.store.get(UserId(7)).unwrap().answers, vec![2]);
}

#[tokio::test]
async fn test_each_answer_asks_next_question() {
    let h = harness();
    h.say(7, "/start").await;
    h.messenger.clear();

    h.say(7, "3").await;
    let texts = h.messenger.texts();
    assert!(texts[0].starts_with("2) "), "{}", texts[0]);
}

#[tokio::test]
async fn test_completion_sends_summary_then_files() {
    let h = harness();
    h.say(7, "/start").await;
    h.messenger.clear();
    h.answer_all(7, &MIXED).await;

    let sent = h.messenger.sent();
    let summary_at = sent
        .iter()
        .position(|s| matches!(s, Sent::Text { text, .. } if text.starts_with("Done!")))
        .expect("summary sent");
    let Sent::Text { text, markup, .. } = &sent[summary_at] else {
        unreachable!()
    };
    assert!(text.contains("Average score: 3.00 / 5"));
    assert!(text.contains("- Debts → 0"));
    assert!(text.ends_with("Style: radar, theme: light. Sending PNG + SVG now."));
    assert_eq!(markup.as_ref(), Some(&ReplyMarkup::remove()));

    let Sent::Photo { file, caption } = &sent[summary_at + 1] else {
        panic!("expected photo, got {:?}", sent[summary_at + 1]);
    };
    assert_eq!(file.file_name, "finance_wheel.png");
    assert_eq!(file.mime, "image/png");
    assert_eq!(&file.bytes[1..4], b"PNG");
    assert_eq!(caption.as_deref(), Some(replies::PHOTO_CAPTION));

    let Sent::Document { file, caption } = &sent[summary_at + 2] else {
        panic!("expected document, got {:?}", sent[summary_at + 2]);
    };
    assert_eq!(file.file_name, "finance_wheel.svg");
    assert_eq!(file.mime, "image/svg+xml");
    assert_eq!(caption.as_deref(), Some(replies::DOCUMENT_CAPTION));

    assert_eq!(sent.len(), summary_at + 3);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_temp_files_removed_after_delivery() {
    let renderer = Arc::new(RecordingRenderer::new());
    let h = harness_with(FakeMessenger::default(), renderer.clone());
    h.say(7, "/start").await;
    h.answer_all(7, &MIXED).await;

    let paths = renderer.paths.lock().unwrap().clone();
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|p| !p.exists()));
}

#[tokio::test]
async fn test_render_failure_still_sends_summary() {
    let h = harness_with(FakeMessenger::default(), Arc::new(BrokenRenderer));
    h.say(7, "/start").await;
    h.messenger.clear();
    h.answer_all(7, &MIXED).await;

    let texts = h.messenger.texts();
    let last_two = &texts[texts.len() - 2..];
    assert!(last_two[0].starts_with("Done!"));
    assert_eq!(
        last_two[1],
        replies::render_failed("Drawing failed: backend exploded")
    );
    assert!(!h
        .messenger
        .sent()
        .iter()
        .any(|s| matches!(s, Sent::Photo { .. } | Sent::Document { .. })));
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_delivery_errors_are_collected() {
    let h = harness_with(
        FakeMessenger::failing_photos(),
        Arc::new(RecordingRenderer::new()),
    );
    h.say(7, "/start").await;
    h.answer_all(7, &MIXED).await;

    let sent = h.messenger.sent();
    assert!(sent.iter().any(|s| matches!(s, Sent::Document { .. })));
    assert_eq!(
        h.messenger.last_text(),
        "Could not send files:\n• PNG: Request failed: connection reset"
    );
}

// ============================================================
// Commands
// ============================================================

#[tokio::test]
async fn test_text_without_session() {
    let h = harness();
    h.say(7, "4").await;
    assert_eq!(h.messenger.last_text(), replies::NOT_STARTED);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn test_help_and_unknown_commands() {
    let h = harness();
    h.say(7, "/help").await;
    h.say(7, "/stats").await;
    assert_eq!(h.messenger.texts(), vec![replies::HELP, replies::HELP]);
}

#[tokio::test]
async fn test_preferences_need_session() {
    let h = harness();
    h.say(7, "/style neon").await;
    assert_eq!(h.messenger.last_text(), replies::NEEDS_SESSION);
}

#[tokio::test]
async fn test_preferences_apply_to_final_chart() {
    let h = harness();
    h.say(7, "/start").await;
    h.say(7, "/style@WheelBot rose").await;
    assert_eq!(h.messenger.last_text(), replies::style_saved("rose"));
    h.say(7, "/theme dark").await;
    assert_eq!(h.messenger.last_text(), replies::theme_saved("dark"));
    h.say(7, "/color #0a8").await;
    assert_eq!(h.messenger.last_text(), replies::color_saved("#00AA88"));

    let options = h.store.get(UserId(7)).unwrap().preferences;
    assert_eq!(options.style, ChartStyle::Rose);
    assert_eq!(options.theme, Theme::Dark);

    h.answer_all(7, &MIXED).await;
    assert!(h
        .messenger
        .texts()
        .iter()
        .any(|t| t.ends_with("Style: rose, theme: dark. Sending PNG + SVG now.")));
}

#[tokio::test]
async fn test_bad_preference_values_show_usage() {
    let h = harness();
    h.say(7, "/start").await;
    h.say(7, "/style pie").await;
    assert_eq!(h.messenger.last_text(), replies::STYLE_USAGE);
    h.say(7, "/theme").await;
    assert_eq!(h.messenger.last_text(), replies::THEME_USAGE);
    h.say(7, "/color red").await;
    assert_eq!(h.messenger.last_text(), replies::COLOR_USAGE);
    assert_eq!(
        h.store.get(UserId(7)).unwrap().preferences,
        ChartOptions::default()
    );
}

#[tokio::test]
async fn test_cancel_clears_session() {
    let h = harness();
    h.say(7, "/start").await;
    h.say(7, "3").await;
    h.say(7, "/cancel").await;

    assert_eq!(h.messenger.last_text(), replies::CANCELLED);
    assert!(h.store.is_empty());
    h.say(7, "3").await;
    assert_eq!(h.messenger.last_text(), replies::NOT_STARTED);
}

#[tokio::test]
async fn test_restart_discards_progress() {
    let h = harness();
    h.say(7, "/start").await;
    h.answer_all(7, &[1, 2, 3]).await;
    h.say(7, "/start").await;
    assert!(h.store.get(UserId(7)).unwrap().answers.is_empty());
}

// ============================================================
// Isolation
// ============================================================

#[tokio::test]
async fn test_users_do_not_share_sessions() {
    let h = harness();
    h.say(1, "/start").await;
    h.say(2, "/start").await;

    for (a, b) in [(1u8, 5u8), (2, 4), (3, 3)] {
        let (ra, rb) = tokio::join!(
            h.dispatcher.handle_update(text_update(1, &a.to_string())),
            h.dispatcher.handle_update(text_update(2, &b.to_string())),
        );
        ra.unwrap();
        rb.unwrap();
    }

    assert_eq!(h.store.get(UserId(1)).unwrap().answers, vec![1, 2, 3]);
    assert_eq!(h.store.get(UserId(2)).unwrap().answers, vec![5, 4, 3]);
}

#[tokio::test]
async fn test_non_text_updates_are_ignored() {
    let h = harness();
    let update = Update {
        update_id: 9,
        message: None,
    };
    h.dispatcher.handle_update(update).await.unwrap();
    assert!(h.messenger.sent().is_empty());
}
