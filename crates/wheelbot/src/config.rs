//! Configuration for wheelbot.
//!
//! Values come from `wheelbot.toml` (or `--config`), then environment variables,
//! then command-line flags, each layer overriding the previous one.

use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use wheelbot_chart::{AccentColor, ChartOptions, ChartStyle, RenderSettings, Theme, DEFAULT_SIZE_PX};
use wheelbot_logging::LogFormat;
use wheelbot_telegram::DEFAULT_API_URL;

/// The config file name
pub const CONFIG_FILE_NAME: &str = "wheelbot.toml";

/// Directory under the user config dir holding the fallback file
pub const GLOBAL_CONFIG_DIR: &str = "wheelbot";

pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
pub const HEALTH_PATH: &str = "/health";

/// Contents of `wheelbot.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub chart: ChartSection,
    #[serde(default)]
    pub telegram: TelegramSection,
    #[serde(default)]
    pub webhook: WebhookSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ChartSection {
    /// radar, donut, rose or neon
    pub style: Option<String>,
    /// light or dark
    pub theme: Option<String>,
    /// Accent as `#RGB` or `#RRGGBB`
    pub color: Option<String>,
    pub size_px: Option<u32>,
    /// Also send the SVG twin
    pub vector: Option<bool>,
    /// TTF used for raster text
    pub font: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TelegramSection {
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub poll_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Public HTTPS origin, e.g. `https://wheel.example.com`
    pub host: Option<String>,
    pub path: Option<String>,
    pub secret: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
    /// Directory for the rolling trace log and `events.jsonl`
    pub dir: Option<PathBuf>,
}

impl FileConfig {
    /// Load configuration.
    ///
    /// Lookup order: `explicit`, then `wheelbot.toml` in `working_dir`, then
    /// `wheelbot/wheelbot.toml` under the user config directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if a file exists and parses successfully
    /// - `Ok(None)` if no path was given and no file exists
    /// - `Err(...)` if an explicit path is missing or any file fails to parse
    pub fn load(explicit: Option<&Path>, working_dir: &Path) -> Result<Option<Self>> {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::discover(working_dir, dirs::config_dir().as_deref()) {
                Some(path) => path,
                None => return Ok(None),
            },
        };

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    fn discover(working_dir: &Path, user_config_dir: Option<&Path>) -> Option<PathBuf> {
        let local = working_dir.join(CONFIG_FILE_NAME);
        if local.exists() {
            return Some(local);
        }
        let global = user_config_dir?.join(GLOBAL_CONFIG_DIR).join(CONFIG_FILE_NAME);
        global.exists().then_some(global)
    }
}

/// Values given on the command line
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub style: Option<ChartStyle>,
    pub theme: Option<Theme>,
    pub color: Option<String>,
    pub font: Option<PathBuf>,
    pub no_vector: bool,
    pub host: Option<String>,
    pub path: Option<String>,
    pub port: Option<u16>,
    pub poll_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Debug)]
pub struct TelegramSettings {
    pub token: Option<SecretString>,
    pub api_url: String,
    pub poll_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct WebhookSettings {
    pub host: Option<String>,
    pub path: Option<String>,
    pub secret: Option<String>,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
    pub dir: Option<PathBuf>,
}

/// Fully resolved settings
#[derive(Debug)]
pub struct Settings {
    /// Look given to each new survey
    pub chart: ChartOptions,
    pub render: RenderSettings,
    pub telegram: TelegramSettings,
    pub webhook: WebhookSettings,
    pub logging: LoggingSettings,
}

/// Where the bot listens and what it registers with Telegram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEndpoint {
    pub url: String,
    pub path: String,
    pub port: u16,
    pub secret: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `PORT` is honoured only when it is all digits
fn parse_port(raw: &str) -> Option<u16> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

impl Settings {
    /// Merge file, environment and CLI layers.
    pub fn resolve<E>(file: FileConfig, env: E, cli: &CliOverrides) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| non_empty(env(key));

        let style = match cli.style {
            Some(style) => style,
            None => match env("WHEEL_STYLE").or(non_empty(file.chart.style)) {
                Some(raw) => raw
                    .parse::<ChartStyle>()
                    .map_err(anyhow::Error::msg)
                    .context("Invalid chart style")?,
                None => ChartStyle::default(),
            },
        };
        let theme = match cli.theme {
            Some(theme) => theme,
            None => match env("WHEEL_THEME").or(non_empty(file.chart.theme)) {
                Some(raw) => raw
                    .parse::<Theme>()
                    .map_err(anyhow::Error::msg)
                    .context("Invalid chart theme")?,
                None => Theme::default(),
            },
        };
        // a bad colour is not an error, it falls back to the default accent
        let accent = cli
            .color
            .clone()
            .or_else(|| env("WHEEL_COLOR"))
            .or(non_empty(file.chart.color))
            .map(|raw| AccentColor::parse_or_default(&raw))
            .unwrap_or_default();

        let size_px = file.chart.size_px.unwrap_or(DEFAULT_SIZE_PX);
        if !(200..=4096).contains(&size_px) {
            bail!("chart.size_px must be between 200 and 4096, got {}", size_px);
        }
        let render = RenderSettings {
            size_px,
            vector: !cli.no_vector && file.chart.vector.unwrap_or(true),
            font_path: cli
                .font
                .clone()
                .or_else(|| env("WHEEL_FONT").map(PathBuf::from))
                .or(file.chart.font),
        };

        let telegram = TelegramSettings {
            token: env("TG_BOT_TOKEN")
                .or(non_empty(file.telegram.token))
                .map(SecretString::from),
            api_url: non_empty(file.telegram.api_url).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            poll_timeout_secs: cli
                .poll_timeout_secs
                .or(file.telegram.poll_timeout_secs)
                .unwrap_or(DEFAULT_POLL_TIMEOUT_SECS),
        };

        let webhook = WebhookSettings {
            host: non_empty(cli.host.clone())
                .or_else(|| env("WEBHOOK_HOST"))
                .or(non_empty(file.webhook.host)),
            path: non_empty(cli.path.clone())
                .or_else(|| env("WEBHOOK_PATH"))
                .or(non_empty(file.webhook.path)),
            secret: env("WEBHOOK_SECRET").or(non_empty(file.webhook.secret)),
            port: cli
                .port
                .or_else(|| env("PORT").as_deref().and_then(parse_port))
                .or(file.webhook.port)
                .unwrap_or(DEFAULT_PORT),
        };

        let logging = LoggingSettings {
            level: cli
                .log_level
                .clone()
                .or(non_empty(file.logging.level))
                .unwrap_or_else(|| "info".to_string()),
            format: cli.log_format.or(file.logging.format).unwrap_or_default(),
            dir: file.logging.dir,
        };

        Ok(Self {
            chart: ChartOptions {
                style,
                theme,
                accent,
            },
            render,
            telegram,
            webhook,
            logging,
        })
    }

    /// Bot token, required by the Telegram modes
    pub fn require_token(&self) -> Result<SecretString> {
        match &self.telegram.token {
            Some(token) => Ok(token.clone()),
            None => bail!("TG_BOT_TOKEN is not set (env TG_BOT_TOKEN or [telegram].token)"),
        }
    }

    /// Resolve the public webhook URL and local route.
    ///
    /// The host loses any trailing `/`, the path gains a leading `/` and
    /// defaults to `/{token}`.
    pub fn webhook_endpoint(&self, token: &str) -> Result<WebhookEndpoint> {
        let Some(host) = &self.webhook.host else {
            bail!("WEBHOOK_HOST is not set (e.g. https://wheel.example.com)");
        };
        let host = host.trim().trim_end_matches('/');

        let mut path = self
            .webhook
            .path
            .clone()
            .unwrap_or_else(|| format!("/{}", token));
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        if path == HEALTH_PATH || path == "/" {
            bail!("Webhook path {} collides with a built-in route", path);
        }

        Ok(WebhookEndpoint {
            url: format!("{}{}", host, path),
            path,
            port: self.webhook.port,
            secret: self.webhook.secret.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn no_env() -> impl Fn(&str) -> Option<String> {
        |_| None
    }

    #[test]
    fn test_defaults() {
        let settings =
            Settings::resolve(FileConfig::default(), no_env(), &CliOverrides::default()).unwrap();
        assert_eq!(settings.chart, ChartOptions::default());
        assert_eq!(settings.render.size_px, DEFAULT_SIZE_PX);
        assert!(settings.render.vector);
        assert_eq!(settings.webhook.port, DEFAULT_PORT);
        assert_eq!(settings.logging.level, "info");
        assert!(settings.require_token().is_err());
    }

    #[test]
    fn test_discover_prefers_local_file() {
        let work = tempfile::tempdir().unwrap();
        let user = tempfile::tempdir().unwrap();
        assert!(FileConfig::discover(work.path(), Some(user.path())).is_none());

        let global_dir = user.path().join(GLOBAL_CONFIG_DIR);
        std::fs::create_dir_all(&global_dir).unwrap();
        std::fs::write(global_dir.join(CONFIG_FILE_NAME), "").unwrap();
        assert_eq!(
            FileConfig::discover(work.path(), Some(user.path())),
            Some(global_dir.join(CONFIG_FILE_NAME))
        );

        std::fs::write(work.path().join(CONFIG_FILE_NAME), "").unwrap();
        assert_eq!(
            FileConfig::discover(work.path(), Some(user.path())),
            Some(work.path().join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn test_load_missing_explicit_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(FileConfig::load(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn test_load_parses_sections() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r##"
[chart]
style = "rose"
theme = "dark"
color = "#00AA88"
vector = false

[webhook]
host = "https://wheel.example.com/"
port = 8443

[logging]
format = "json"
"##,
        )
        .unwrap();

        let file = FileConfig::load(None, dir.path()).unwrap().unwrap();
        let settings = Settings::resolve(file, no_env(), &CliOverrides::default()).unwrap();
        assert_eq!(settings.chart.style, ChartStyle::Rose);
        assert_eq!(settings.chart.theme, Theme::Dark);
        assert_eq!(settings.chart.accent.to_string(), "#00AA88");
        assert!(!settings.render.vector);
        assert_eq!(settings.webhook.port, 8443);
        assert_eq!(settings.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[chart]\nstlye = \"rose\"\n",
        )
        .unwrap();
        assert!(FileConfig::load(None, dir.path()).is_err());
    }

    #[test]
    fn test_precedence_cli_env_file() {
        let file = FileConfig {
            chart: ChartSection {
                style: Some("donut".into()),
                theme: Some("dark".into()),
                color: Some("#111111".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = env_of(&[("WHEEL_STYLE", "rose"), ("WHEEL_COLOR", "#222222")]);
        let cli = CliOverrides {
            style: Some(ChartStyle::Neon),
            ..Default::default()
        };

        let settings = Settings::resolve(file, env, &cli).unwrap();
        assert_eq!(settings.chart.style, ChartStyle::Neon);
        assert_eq!(settings.chart.theme, Theme::Dark);
        assert_eq!(settings.chart.accent.to_string(), "#222222");
    }

    #[test]
    fn test_bad_color_falls_back() {
        let env = env_of(&[("WHEEL_COLOR", "purple")]);
        let settings = Settings::resolve(FileConfig::default(), env, &CliOverrides::default())
            .unwrap();
        assert_eq!(settings.chart.accent, AccentColor::default());
    }

    #[test]
    fn test_bad_style_is_error() {
        let env = env_of(&[("WHEEL_STYLE", "pie")]);
        assert!(Settings::resolve(FileConfig::default(), env, &CliOverrides::default()).is_err());
    }

    #[test]
    fn test_port_requires_digits() {
        for (raw, expected) in [
            ("8080", 8080),
            (" 9000 ", 9000),
            ("80a", DEFAULT_PORT),
            ("-1", DEFAULT_PORT),
            ("", DEFAULT_PORT),
            ("99999", DEFAULT_PORT),
        ] {
            let env = env_of(&[("PORT", raw)]);
            let settings =
                Settings::resolve(FileConfig::default(), env, &CliOverrides::default()).unwrap();
            assert_eq!(settings.webhook.port, expected, "PORT={:?}", raw);
        }
    }

    #[test]
    fn test_webhook_endpoint_normalisation() {
        let env = env_of(&[
            ("TG_BOT_TOKEN", "123:abc"),
            ("WEBHOOK_HOST", "https://wheel.example.com/"),
        ]);
        let settings =
            Settings::resolve(FileConfig::default(), env, &CliOverrides::default()).unwrap();
        let token = settings.require_token().unwrap();
        assert_eq!(token.expose_secret(), "123:abc");

        let endpoint = settings.webhook_endpoint(token.expose_secret()).unwrap();
        assert_eq!(endpoint.path, "/123:abc");
        assert_eq!(endpoint.url, "https://wheel.example.com/123:abc");
        assert_eq!(endpoint.port, DEFAULT_PORT);

        let env = env_of(&[
            ("WEBHOOK_HOST", "https://wheel.example.com"),
            ("WEBHOOK_PATH", "hook"),
            ("WEBHOOK_SECRET", "s3cret"),
        ]);
        let settings =
            Settings::resolve(FileConfig::default(), env, &CliOverrides::default()).unwrap();
        let endpoint = settings.webhook_endpoint("t").unwrap();
        assert_eq!(endpoint.url, "https://wheel.example.com/hook");
        assert_eq!(endpoint.secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_webhook_requires_host() {
        let settings =
            Settings::resolve(FileConfig::default(), no_env(), &CliOverrides::default()).unwrap();
        assert!(settings.webhook_endpoint("t").is_err());
    }

    #[test]
    fn test_webhook_path_cannot_shadow_health() {
        let env = env_of(&[("WEBHOOK_HOST", "https://h"), ("WEBHOOK_PATH", "health")]);
        let settings =
            Settings::resolve(FileConfig::default(), env, &CliOverrides::default()).unwrap();
        assert!(settings.webhook_endpoint("t").is_err());
    }
}
