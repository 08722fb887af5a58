//! Session store for boundary layers that host many games at once.
//!
//! Each session owns one [`Engine`] behind its own mutex, so calls against a
//! session are serialized while independent sessions proceed in parallel.
//! The store is an ordinary value; whoever creates it owns its lifetime.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use sim_core::{validate_decisions, validate_parameters, Decisions, FirmState, Parameters};
use sim_core::{QuarterResult, ValidationError};
use thiserror::Error;
use tracing::info;

use crate::engine::Engine;
use crate::ledger::{Export, LedgerError, Summary};

/// Identifier chosen by the client for a game.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Errors returned by [`SessionStore`] operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session exists under the id.
    #[error("session not found: {0}")]
    NotFound(SessionId),
    /// Parameters or decisions failed validation; the session is unchanged.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
    /// The session's ledger could not be aggregated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// A thread panicked while holding a store or session lock.
    #[error("session lock poisoned")]
    Poisoned,
}

/// Result of a simulate call: the quarter and the state it left behind.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulateOutcome {
    /// Snapshot of the simulated quarter.
    pub result: QuarterResult,
    /// Firm state after the quarter.
    pub state: FirmState,
}

type Shared = Arc<Mutex<Engine>>;

/// Games keyed by [`SessionId`], each behind its own lock.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<BTreeMap<SessionId, Shared>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a game, replacing any existing session under the same id.
    pub fn start(&self, id: SessionId, params: Parameters) -> Result<FirmState, SessionError> {
        validate_parameters(&params)?;
        let engine = Engine::new(params);
        let state = engine.state().clone();
        let mut guard = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
        let replaced = guard
            .insert(id.clone(), Arc::new(Mutex::new(engine)))
            .is_some();
        info!(session = %id, replaced, "session started");
        Ok(state)
    }

    /// Validate `decisions` and advance the session by one quarter.
    pub fn simulate(
        &self,
        id: &SessionId,
        decisions: &Decisions,
    ) -> Result<SimulateOutcome, SessionError> {
        validate_decisions(decisions)?;
        self.with_engine(id, |engine| {
            let result = engine.simulate_quarter(decisions);
            Ok(SimulateOutcome {
                result,
                state: engine.state().clone(),
            })
        })
    }

    /// Summary of the session's ledger.
    pub fn summary(&self, id: &SessionId) -> Result<Summary, SessionError> {
        self.with_engine(id, |engine| engine.summary().map_err(SessionError::from))
    }

    /// Export of the session without ending it.
    pub fn export(&self, id: &SessionId) -> Result<Export, SessionError> {
        self.with_engine(id, |engine| Ok(engine.export()))
    }

    /// Discard a session and return its final export.
    pub fn end(&self, id: &SessionId) -> Result<Export, SessionError> {
        let shared = {
            let mut guard = self.sessions.write().map_err(|_| SessionError::Poisoned)?;
            guard
                .remove(id)
                .ok_or_else(|| SessionError::NotFound(id.clone()))?
        };
        let engine = shared.lock().map_err(|_| SessionError::Poisoned)?;
        info!(session = %id, quarters = engine.ledger().len(), "session ended");
        Ok(engine.export())
    }

    /// Whether a session exists under `id`.
    pub fn contains(&self, id: &SessionId) -> Result<bool, SessionError> {
        let guard = self.sessions.read().map_err(|_| SessionError::Poisoned)?;
        Ok(guard.contains_key(id))
    }

    /// Number of live sessions.
    pub fn len(&self) -> Result<usize, SessionError> {
        let guard = self.sessions.read().map_err(|_| SessionError::Poisoned)?;
        Ok(guard.len())
    }

    pub fn is_empty(&self) -> Result<bool, SessionError> {
        Ok(self.len()? == 0)
    }

    fn with_engine<T>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&mut Engine) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        // Clone the handle so the map lock is not held while the engine runs.
        let shared = {
            let guard = self.sessions.read().map_err(|_| SessionError::Poisoned)?;
            guard
                .get(id)
                .cloned()
                .ok_or_else(|| SessionError::NotFound(id.clone()))?
        };
        let mut engine = shared.lock().map_err(|_| SessionError::Poisoned)?;
        f(&mut *engine)
    }
}
