use colored::Colorize;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Stable, non-reversible reference for a transport user id.
///
/// First 12 hex chars of sha256 over the decimal id.
pub fn user_ref(user_id: i64) -> String {
    let digest = Sha256::digest(user_id.to_string().as_bytes());
    hex::encode(digest)[..12].to_string()
}

/// Structured log events for the survey service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    SurveyStarted {
        user: String,
        session_id: String,
    },
    AnswerRecorded {
        user: String,
        question: usize,
        value: u8,
    },
    AnswerRejected {
        user: String,
        question: usize,
    },
    SurveyCompleted {
        user: String,
        session_id: String,
        average: f64,
        band: String,
    },
    SurveyCancelled {
        user: String,
    },
    ChartRendered {
        style: String,
        theme: String,
        files: usize,
        duration_ms: u64,
    },
    ChartFailed {
        user: String,
        error: String,
    },
    DeliveryFailed {
        user: String,
        artifact: String,
        error: String,
    },
    WebhookRegistered {
        url: String,
    },
    UpdateReceived {
        update_id: i64,
        kind: String,
    },
}

impl LogEvent {
    /// JSON form for the event file, stamped with the write time (UTC)
    fn stamped(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Coloured lines for a terminal
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
    /// Short lines; update receipts are skipped
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Writes survey events to stderr, and to a JSONL file when one is given.
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
        }
    }

    /// Like [`Logger::new`], also appending every event to `log_path`
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
        })
    }

    pub fn log(&self, event: &LogEvent) {
        // the file sink ignores `format`
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.stamped();
                let _ = writeln!(file, "{}", json);
            }
        }

        match self.format {
            LogFormat::Json => self.log_json(event),
            LogFormat::Pretty => self.log_pretty(event),
            LogFormat::Compact => self.log_compact(event),
        }
    }

    fn log_json(&self, event: &LogEvent) {
        if let Ok(json) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{}", json);
        }
    }

    fn log_pretty(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        let line = match event {
            LogEvent::SurveyStarted { user, session_id } => format!(
                "{} {} {} {}",
                "▶".bright_cyan(),
                "survey started".bright_cyan().bold(),
                user.dimmed(),
                short_id(session_id).dimmed()
            ),
            LogEvent::AnswerRecorded {
                user,
                question,
                value,
            } => format!(
                "  {} Q{} = {} {}",
                "·".dimmed(),
                question + 1,
                value.to_string().bright_white(),
                user.dimmed()
            ),
            LogEvent::AnswerRejected { user, question } => format!(
                "  {} Q{} rejected {}",
                "?".yellow(),
                question + 1,
                user.dimmed()
            ),
            LogEvent::SurveyCompleted {
                user,
                average,
                band,
                ..
            } => format!(
                "{} {} {:.2} / 5 ({}) {}",
                "✓".bright_green(),
                "survey completed".bright_green().bold(),
                average,
                band,
                user.dimmed()
            ),
            LogEvent::SurveyCancelled { user } => {
                format!("{} survey cancelled {}", "■".yellow(), user.dimmed())
            }
            LogEvent::ChartRendered {
                style,
                theme,
                files,
                duration_ms,
            } => format!(
                "  {} chart {}/{} {} file(s) ({}ms)",
                "◆".bright_magenta(),
                style,
                theme,
                files,
                duration_ms
            ),
            LogEvent::ChartFailed { user, error } => format!(
                "{} {} {} {}",
                "✗".bright_red(),
                "chart failed:".bright_red().bold(),
                error.red(),
                user.dimmed()
            ),
            LogEvent::DeliveryFailed {
                user,
                artifact,
                error,
            } => format!(
                "{} {} {}: {} {}",
                "✗".bright_red(),
                "delivery failed".bright_red().bold(),
                artifact,
                error.red(),
                user.dimmed()
            ),
            LogEvent::WebhookRegistered { url } => format!(
                "{} {} {}",
                "⚑".bright_blue(),
                "webhook registered".bright_blue().bold(),
                url
            ),
            LogEvent::UpdateReceived { update_id, kind } => format!(
                "  {} update {} ({})",
                "←".dimmed(),
                update_id,
                kind.dimmed()
            ),
        };
        let _ = writeln!(stderr, "{}", line);
    }

    fn log_compact(&self, event: &LogEvent) {
        let mut stderr = std::io::stderr();
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        let msg = match event {
            LogEvent::SurveyStarted { user, .. } => {
                format!("[{}] survey:start {}", timestamp, user)
            }
            LogEvent::AnswerRecorded {
                user,
                question,
                value,
            } => format!("[{}] answer:{} {}={}", timestamp, user, question + 1, value),
            LogEvent::AnswerRejected { user, question } => {
                format!("[{}] reject:{} q{}", timestamp, user, question + 1)
            }
            LogEvent::SurveyCompleted {
                user,
                average,
                band,
                ..
            } => format!(
                "[{}] survey:done {} avg={:.2} {}",
                timestamp, user, average, band
            ),
            LogEvent::SurveyCancelled { user } => {
                format!("[{}] survey:cancel {}", timestamp, user)
            }
            LogEvent::ChartRendered {
                style,
                theme,
                files,
                duration_ms,
            } => format!(
                "[{}] chart:{}/{} {}f {}ms",
                timestamp, style, theme, files, duration_ms
            ),
            LogEvent::ChartFailed { user, error } => {
                format!("[{}] chart:error {} {}", timestamp, user, error)
            }
            LogEvent::DeliveryFailed {
                user,
                artifact,
                error,
            } => format!(
                "[{}] send:error {} {} {}",
                timestamp, user, artifact, error
            ),
            LogEvent::WebhookRegistered { url } => format!("[{}] webhook {}", timestamp, url),
            LogEvent::UpdateReceived { .. } => return, // too chatty for compact
        };
        let _ = writeln!(stderr, "{}", msg);
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_ref_is_stable_and_opaque() {
        let a = user_ref(123456789);
        assert_eq!(a.len(), 12);
        assert_eq!(a, user_ref(123456789));
        assert_ne!(a, user_ref(123456780));
        assert!(!a.contains("123456789"));
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = LogEvent::AnswerRejected {
            user: "abc".into(),
            question: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "answer_rejected");
        assert_eq!(json["question"], 2);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_file_sink_appends_timestamped_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("events.jsonl");
        let logger = Logger::with_file(LogFormat::Compact, &path).unwrap();

        logger.log(&LogEvent::SurveyCancelled { user: "u1".into() });
        logger.log(&LogEvent::WebhookRegistered {
            url: "https://example.org/hook".into(),
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "survey_cancelled");
        assert!(lines[1]["timestamp"].is_string());
    }
}
