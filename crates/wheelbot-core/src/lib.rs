//! # wheelbot-core
//!
//! The financial balance survey: eight facets scored 0..=5, the scoring
//! engine that interprets a completed response set, and the turn-by-turn
//! survey engine that collects answers per user.
//!
//! ## Key Types
//!
//! - [`ResponseSet`] - Validated set of eight scores
//! - [`Summary`] - Average, band, weakest facets, advice and checklist
//! - [`SessionStore`] - Keyed store for in-progress surveys
//! - [`SurveyEngine`] - Applies one user turn at a time

mod advice;
mod error;
mod facets;
mod scoring;
mod session;
mod summary;
mod survey;

pub use advice::{advisory, checklist, tips, AdviceRule, ADVICE_RULES, CLOSING_REMINDER, MAX_TIPS};
pub use error::{ScoreError, SurveyError};
pub use facets::{chart_labels, Facet, FACET_COUNT, MAX_SCORE};
pub use scoring::{average, band, weakest, Band, ResponseSet};
pub use session::{InMemorySessionStore, SessionState, SessionStore, UserId};
pub use summary::Summary;
pub use survey::{
    opening_message, parse_rating, CompletedSurvey, PrefUpdate, SurveyEngine, TurnOutcome,
    GREETING, REPROMPT,
};
