//! User-facing texts.

use wheelbot_chart::ChartOptions;

pub const HELP: &str = "How it works:\n\
• 8 questions (score 0–5)\n\
• At the end: a summary plus your wheel as PNG and SVG\n\n\
Commands:\n\
/start — start over\n\
/style radar|donut|rose|neon — chart style\n\
/theme light|dark — theme\n\
/color #HEX — accent color\n\
/cancel — cancel";

pub const NOT_STARTED: &str = "Send /start to begin the survey.";

pub const NEEDS_SESSION: &str = "Start a survey with /start first, then pick the look.";

pub const CANCELLED: &str = "Survey cancelled. To start again, send /start.";

pub const STYLE_USAGE: &str = "Usage: /style radar|donut|rose|neon";

pub const THEME_USAGE: &str = "Usage: /theme light or /theme dark";

pub const COLOR_USAGE: &str = "Use HEX, for example: /color #7C4DFF";

pub const PHOTO_CAPTION: &str = "Your wheel (PNG)";

pub const DOCUMENT_CAPTION: &str = "Your wheel (SVG)";

pub const FILE_STEM: &str = "finance_wheel";

pub fn style_saved(style: &str) -> String {
    format!("Style saved: {}. Let's continue!", style)
}

pub fn theme_saved(theme: &str) -> String {
    format!("Theme saved: {}.", theme)
}

pub fn color_saved(color: &str) -> String {
    format!("Color saved: {}", color)
}

/// Trailer appended to the final summary
pub fn chart_trailer(options: &ChartOptions, vector: bool) -> String {
    let files = if vector { "PNG + SVG" } else { "PNG" };
    format!(
        "Style: {}, theme: {}. Sending {} now.",
        options.style, options.theme, files
    )
}

pub fn render_failed(error: &str) -> String {
    format!("Could not draw the chart: {}", error)
}

pub fn delivery_failed(errors: &[String]) -> String {
    let lines: Vec<String> = errors.iter().map(|e| format!("• {}", e)).collect();
    format!("Could not send files:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wheelbot_chart::{ChartStyle, Theme};

    #[test]
    fn test_help_lists_every_command() {
        for cmd in ["/start", "/style", "/theme", "/color", "/cancel"] {
            assert!(HELP.contains(cmd), "{}", cmd);
        }
    }

    #[test]
    fn test_chart_trailer() {
        let options = ChartOptions {
            style: ChartStyle::Rose,
            theme: Theme::Dark,
            ..Default::default()
        };
        assert_eq!(
            chart_trailer(&options, true),
            "Style: rose, theme: dark. Sending PNG + SVG now."
        );
        assert!(chart_trailer(&options, false).ends_with("Sending PNG now."));
    }

    #[test]
    fn test_delivery_failed() {
        let text = delivery_failed(&["PNG: timeout".into(), "SVG: too big".into()]);
        assert_eq!(text, "Could not send files:\n• PNG: timeout\n• SVG: too big");
    }
}
