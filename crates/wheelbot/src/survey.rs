//! The survey in a terminal, for trying the bot without Telegram.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use dialoguer::Select;

use wheelbot_chart::{ChartOptions, ChartRenderer};
use wheelbot_core::{Facet, InMemorySessionStore, SurveyEngine, TurnOutcome, UserId, GREETING};
use wheelbot_logging::{LogEvent, Logger};

use crate::config::Settings;
use crate::render::{print_saved, print_summary, save_chart};
use crate::wheel::WheelRenderer;

const LOCAL_USER: UserId = UserId(0);

pub fn handle_survey_command(settings: &Settings, output: &Path, logger: &Logger) -> Result<()> {
    let store = Arc::new(InMemorySessionStore::<ChartOptions>::new());
    let engine = SurveyEngine::new(store, settings.chart);
    let state = engine.start(LOCAL_USER);
    logger.log(&LogEvent::SurveyStarted {
        user: "local".to_string(),
        session_id: state.id.to_string(),
    });

    eprintln!("{}", GREETING.bold());
    eprintln!();

    let choices: Vec<String> = (0..=5).map(|n| n.to_string()).collect();
    let mut question = Facet::MidTermGoals.question();
    let done = loop {
        let picked = Select::new()
            .with_prompt(question)
            .items(&choices)
            .default(0)
            .interact()
            .context("Survey aborted")?;

        match engine.answer(LOCAL_USER, &choices[picked])? {
            TurnOutcome::Next { next, .. } => question = next.question(),
            TurnOutcome::Completed(done) => break done,
            TurnOutcome::Rejected { facet } => question = facet.question(),
            TurnOutcome::NoSession => bail!("Survey session disappeared"),
        }
    };
    logger.log(&LogEvent::SurveyCompleted {
        user: "local".to_string(),
        session_id: done.session_id.to_string(),
        average: done.summary.average,
        band: done.summary.band.label().to_string(),
    });

    eprintln!();
    print_summary(&done.summary);
    eprintln!();

    let renderer = ChartRenderer::new(settings.render.clone());
    match WheelRenderer::render(&renderer, done.responses.values(), &done.preferences) {
        Ok(chart) => {
            let files = save_chart(&chart, output)?;
            print_saved(&files);
        }
        Err(e) => {
            logger.log(&LogEvent::ChartFailed {
                user: "local".to_string(),
                error: e.to_string(),
            });
            eprintln!("{} Could not draw the chart: {}", "✗".bright_red(), e);
        }
    }
    Ok(())
}
