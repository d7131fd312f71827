//! Turn handling: one user message in, one outcome out.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::SurveyError;
use crate::facets::{Facet, MAX_SCORE};
use crate::scoring::ResponseSet;
use crate::session::{SessionState, SessionStore, UserId};
use crate::summary::Summary;

pub const GREETING: &str =
    "Hi! In a couple of minutes we'll rate your finances across 8 areas. Ready to start?";

pub const REPROMPT: &str = "Pick a number 0–5 on the keyboard below.";

/// Parse one answer: an integer in `0..=5`, surrounding whitespace allowed.
pub fn parse_rating(text: &str) -> Option<u8> {
    let value: i64 = text.trim().parse().ok()?;
    u8::try_from(value).ok().filter(|v| *v <= MAX_SCORE)
}

/// Greeting plus the first question
pub fn opening_message() -> String {
    format!("{}\n\n{}", GREETING, Facet::MidTermGoals.question())
}

/// A finished survey, already removed from the store
#[derive(Debug, Clone)]
pub struct CompletedSurvey<P> {
    pub session_id: Uuid,
    pub responses: ResponseSet,
    pub preferences: P,
    pub summary: Summary,
}

#[derive(Debug, Clone)]
pub enum TurnOutcome<P> {
    /// The user has no survey in progress
    NoSession,
    /// Not a rating; ask the same question again
    Rejected { facet: Facet },
    /// Answer stored, ask the next question
    Next {
        answered: Facet,
        value: u8,
        next: Facet,
    },
    Completed(CompletedSurvey<P>),
}

/// Result of changing a session preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefUpdate {
    Saved,
    NoSession,
}

/// Drives surveys through a [`SessionStore`]. Every new session starts
/// with a copy of `defaults` as its preferences.
pub struct SurveyEngine<P> {
    store: Arc<dyn SessionStore<P>>,
    defaults: P,
}

impl<P: Clone> SurveyEngine<P> {
    pub fn new(store: Arc<dyn SessionStore<P>>, defaults: P) -> Self {
        Self { store, defaults }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore<P>> {
        &self.store
    }

    /// Begin a new survey, discarding any live one.
    pub fn start(&self, user: UserId) -> SessionState<P> {
        let state = SessionState::new(self.defaults.clone());
        self.store.create(user, state.clone());
        debug!(%user, session = %state.id, "Survey started");
        state
    }

    pub fn answer(&self, user: UserId, text: &str) -> Result<TurnOutcome<P>, SurveyError> {
        let Some(mut state) = self.store.get(user) else {
            return Ok(TurnOutcome::NoSession);
        };
        let Some(facet) = state.current_facet() else {
            return self.complete(user, state);
        };
        let Some(value) = parse_rating(text) else {
            return Ok(TurnOutcome::Rejected { facet });
        };

        state.record(value);
        match state.current_facet() {
            Some(next) => {
                self.store.update(user, state);
                Ok(TurnOutcome::Next {
                    answered: facet,
                    value,
                    next,
                })
            }
            None => self.complete(user, state),
        }
    }

    fn complete(&self, user: UserId, state: SessionState<P>) -> Result<TurnOutcome<P>, SurveyError> {
        self.store.delete(user);
        let responses = ResponseSet::from_slice(&state.answers)?;
        debug!(%user, session = %state.id, "Survey completed");
        Ok(TurnOutcome::Completed(CompletedSurvey {
            session_id: state.id,
            summary: Summary::build(&responses),
            responses,
            preferences: state.preferences,
        }))
    }

    /// Drop the live survey. Returns whether there was one.
    pub fn cancel(&self, user: UserId) -> bool {
        self.store.delete(user).is_some()
    }

    /// Change the live session's preferences in place.
    pub fn update_preferences(&self, user: UserId, apply: impl FnOnce(&mut P)) -> PrefUpdate {
        let Some(mut state) = self.store.get(user) else {
            return PrefUpdate::NoSession;
        };
        apply(&mut state.preferences);
        state.touch();
        if self.store.update(user, state) {
            PrefUpdate::Saved
        } else {
            PrefUpdate::NoSession
        }
    }
}
