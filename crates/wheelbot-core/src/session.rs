//! Per-user survey state and the store that keeps it between turns.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::facets::{Facet, FACET_COUNT};

/// Transport-level user identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A survey in progress, carrying caller-defined preferences `P`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState<P> {
    /// Unique session identifier
    pub id: Uuid,
    /// Scores collected so far, in facet order
    pub answers: Vec<u8>,
    /// Per-session preferences, opaque to the survey
    pub preferences: P,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<P> SessionState<P> {
    pub fn new(preferences: P) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            answers: Vec::with_capacity(FACET_COUNT),
            preferences,
            created_at: now,
            updated_at: now,
        }
    }

    /// Zero-based index of the question awaiting an answer
    pub fn question_index(&self) -> usize {
        self.answers.len()
    }

    /// Facet awaiting an answer, `None` once all eight are in
    pub fn current_facet(&self) -> Option<Facet> {
        Facet::from_index(self.question_index())
    }

    pub fn record(&mut self, value: u8) {
        self.answers.push(value);
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() >= FACET_COUNT
    }
}

/// Keyed, lifecycle-scoped storage for sessions. One live session per user.
pub trait SessionStore<P>: Send + Sync {
    /// Insert a fresh session, replacing any live one for the user
    fn create(&self, user: UserId, state: SessionState<P>);

    fn get(&self, user: UserId) -> Option<SessionState<P>>;

    /// Overwrite the live session. Returns false if the user has none.
    fn update(&self, user: UserId, state: SessionState<P>) -> bool;

    fn delete(&self, user: UserId) -> Option<SessionState<P>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-memory store
#[derive(Debug)]
pub struct InMemorySessionStore<P> {
    sessions: Mutex<HashMap<UserId, SessionState<P>>>,
}

impl<P> Default for InMemorySessionStore<P> {
    fn default() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl<P> InMemorySessionStore<P> {
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> std::sync::MutexGuard<'_, HashMap<UserId, SessionState<P>>> {
        // every write is a single insert/remove, so a poisoned map is still consistent
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: Clone + Send> SessionStore<P> for InMemorySessionStore<P> {
    fn create(&self, user: UserId, state: SessionState<P>) {
        self.sessions().insert(user, state);
    }

    fn get(&self, user: UserId) -> Option<SessionState<P>> {
        self.sessions().get(&user).cloned()
    }

    fn update(&self, user: UserId, state: SessionState<P>) -> bool {
        match self.sessions().get_mut(&user) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }

    fn delete(&self, user: UserId) -> Option<SessionState<P>> {
        self.sessions().remove(&user)
    }

    fn len(&self) -> usize {
        self.sessions().len()
    }
}
