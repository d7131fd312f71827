mod api;
mod bot;
mod config;
mod poll;
mod render;
mod serve;
mod survey;
mod wheel;

#[cfg(test)]
mod testing;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use wheelbot_chart::{ChartOptions, ChartRenderer, ChartStyle, Theme};
use wheelbot_core::{InMemorySessionStore, SurveyEngine};
use wheelbot_logging::{init_tracing, init_tracing_with_file, LogFormat, Logger};
use wheelbot_telegram::{Messenger, TelegramClient, User};

use bot::Dispatcher;
use config::{CliOverrides, FileConfig, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "wheelbot",
    about = "Financial balance wheel survey bot",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ./wheelbot.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Chart style for new surveys
    #[arg(long, value_enum, global = true)]
    style: Option<StyleChoice>,

    /// Chart theme for new surveys
    #[arg(long, value_enum, global = true)]
    theme: Option<ThemeChoice>,

    /// Accent colour, #RGB or #RRGGBB
    #[arg(long, global = true)]
    color: Option<String>,

    /// TTF font for PNG text
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Skip the SVG file
    #[arg(long, global = true)]
    no_svg: bool,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormatChoice>,

    /// Log level or filter directive (RUST_LOG wins when set)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the bot behind a Telegram webhook
    Serve {
        /// Public HTTPS origin (env WEBHOOK_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Webhook route (env WEBHOOK_PATH, default /<token>)
        #[arg(long)]
        path: Option<String>,

        /// Listen port (env PORT, default 10000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run the bot with long polling
    Poll {
        /// Seconds each getUpdates call may wait
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Take the survey in this terminal
    Survey {
        /// Directory for the chart files
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Render a wheel for eight scores
    Render {
        /// Comma-separated scores, e.g. 1,4,2,5,3,0,5,4
        #[arg(long, value_delimiter = ',', required = true)]
        scores: Vec<u8>,

        /// Directory for the chart files
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleChoice {
    Radar,
    Donut,
    Rose,
    Neon,
}

impl From<StyleChoice> for ChartStyle {
    fn from(choice: StyleChoice) -> Self {
        match choice {
            StyleChoice::Radar => ChartStyle::Radar,
            StyleChoice::Donut => ChartStyle::Donut,
            StyleChoice::Rose => ChartStyle::Rose,
            StyleChoice::Neon => ChartStyle::Neon,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeChoice {
    Light,
    Dark,
}

impl From<ThemeChoice> for Theme {
    fn from(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Light => Theme::Light,
            ThemeChoice::Dark => Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides {
            style: self.style.map(Into::into),
            theme: self.theme.map(Into::into),
            color: self.color.clone(),
            font: self.font.clone(),
            no_vector: self.no_svg,
            log_level: self.log_level.clone(),
            log_format: self.log_format.map(Into::into),
            ..Default::default()
        };
        match &self.command {
            Commands::Serve { host, path, port } => {
                overrides.host = host.clone();
                overrides.path = path.clone();
                overrides.port = *port;
            }
            Commands::Poll { timeout } => overrides.poll_timeout_secs = *timeout,
            Commands::Survey { .. } | Commands::Render { .. } => {}
        }
        overrides
    }
}

/// Wire the survey engine, chart renderer and a messenger together.
pub(crate) fn build_dispatcher(
    settings: &Settings,
    messenger: Arc<dyn Messenger>,
    logger: Arc<Logger>,
) -> Arc<Dispatcher> {
    let store = Arc::new(InMemorySessionStore::<ChartOptions>::new());
    let engine = SurveyEngine::new(store, settings.chart);
    let renderer = Arc::new(ChartRenderer::new(settings.render.clone()));
    Arc::new(Dispatcher::new(engine, messenger, renderer, logger))
}

/// Check the token with getMe before taking any traffic.
pub(crate) async fn identify_bot(client: &TelegramClient) -> Result<User> {
    let me = client
        .get_me()
        .await
        .context("Telegram rejected the bot token (getMe)")?;
    info!(
        bot = me.username.as_deref().unwrap_or(&me.first_name),
        "Bot identified"
    );
    Ok(me)
}

pub(crate) async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    eprintln!("\nShutting down...");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let file = FileConfig::load(cli.config.as_deref(), &working_dir)?.unwrap_or_default();
    let settings = Settings::resolve(file, |key| std::env::var(key).ok(), &cli.overrides())?;

    let logging = settings.logging.clone();
    let _log_guard = match &logging.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            Some(init_tracing_with_file(&logging.level, logging.format, dir))
        }
        None => {
            init_tracing(&logging.level, logging.format);
            None
        }
    };
    let logger = Arc::new(match &logging.dir {
        Some(dir) => Logger::with_file(logging.format, &dir.join("events.jsonl"))
            .context("Failed to open event log")?,
        None => Logger::new(logging.format),
    });

    match cli.command {
        Commands::Serve { .. } => serve::handle_serve_command(settings, logger).await,
        Commands::Poll { .. } => poll::handle_poll_command(settings, logger).await,
        Commands::Survey { output } => {
            tokio::task::spawn_blocking(move || {
                survey::handle_survey_command(&settings, &output, &logger)
            })
            .await
            .context("Survey task failed")?
        }
        Commands::Render {
            scores,
            output,
            json,
        } => render::handle_render_command(&settings, &scores, &output, json),
    }
}
