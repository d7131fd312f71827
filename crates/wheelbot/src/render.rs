use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use wheelbot_chart::{ChartRenderer, RenderedChart};
use wheelbot_core::{ResponseSet, Summary};

use crate::config::Settings;
use crate::wheel::WheelRenderer;

/// Base name for saved chart files
pub const OUTPUT_STEM: &str = "finance_wheel";

#[derive(Debug, Serialize)]
struct RenderReport<'a> {
    scores: &'a [u8],
    summary: &'a Summary,
    files: &'a [PathBuf],
}

/// Copy every artifact into `dir` before the temporary files go away.
pub fn save_chart(chart: &RenderedChart, dir: &Path) -> Result<Vec<PathBuf>> {
    chart
        .artifacts()
        .map(|artifact| {
            artifact
                .persist_to(dir, OUTPUT_STEM)
                .with_context(|| format!("Failed to write chart into {}", dir.display()))
        })
        .collect()
}

pub fn print_summary(summary: &Summary) {
    println!("{}", summary.to_text());
}

pub fn print_saved(files: &[PathBuf]) {
    for file in files {
        eprintln!("  {} {}", "✓".bright_green(), file.display());
    }
}

pub fn handle_render_command(
    settings: &Settings,
    scores: &[u8],
    output: &Path,
    json: bool,
) -> Result<()> {
    let responses =
        ResponseSet::from_slice(scores).context("Expected eight scores between 0 and 5")?;
    let summary = Summary::build(&responses);

    let renderer = ChartRenderer::new(settings.render.clone());
    let chart = WheelRenderer::render(&renderer, responses.values(), &settings.chart)
        .context("Failed to render chart")?;
    let files = save_chart(&chart, output)?;

    if json {
        let report = RenderReport {
            scores: responses.values(),
            summary: &summary,
            files: &files,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&summary);
        eprintln!();
        print_saved(&files);
    }
    Ok(())
}
