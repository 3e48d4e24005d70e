//! Generation sessions and their state machine.
//!
//! A session moves forward through the phases in declaration order and
//! ends in one terminal state. The registry entry is removed when the
//! [`SessionHandle`] drops, whatever the outcome.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use weft_core::BuildStatus;

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Created,
    Analyzing,
    Planning,
    Synthesizing,
    Adapting,
    Assessing,
    Optimizing,
    Assembling,
    Success,
    Warning,
    Error,
    Failed,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Analyzing => "analyzing",
            Self::Planning => "planning",
            Self::Synthesizing => "synthesizing",
            Self::Adapting => "adapting",
            Self::Assessing => "assessing",
            Self::Optimizing => "optimizing",
            Self::Assembling => "assembling",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Warning | Self::Error | Self::Failed)
    }

    /// Whether `next` is a legal successor.
    ///
    /// Working phases only move forward; any non-terminal phase may fail.
    pub fn can_advance_to(&self, next: SessionPhase) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Failed => true,
            Self::Success | Self::Warning | Self::Error => *self == Self::Assembling,
            working => working > *self,
        }
    }

    /// Terminal phase matching a build status.
    pub fn from_build_status(status: BuildStatus) -> Self {
        match status {
            BuildStatus::Success => Self::Success,
            BuildStatus::Warning => Self::Warning,
            BuildStatus::Error => Self::Error,
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry of in-flight sessions and their current phases.
#[derive(Debug, Clone, Default)]
pub struct ActiveSessions {
    inner: Arc<RwLock<HashMap<String, SessionPhase>>>,
}

impl ActiveSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session with a fresh unique ID.
    pub fn open(&self) -> SessionHandle {
        let mut sessions = self.inner.write();
        let mut id = new_session_id();
        while sessions.contains_key(&id) {
            id = new_session_id();
        }
        sessions.insert(id.clone(), SessionPhase::Created);
        drop(sessions);

        debug!(session = %id, "session opened");
        SessionHandle {
            id,
            started: Instant::now(),
            phase: SessionPhase::Created,
            registry: self.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn phase_of(&self, id: &str) -> Option<SessionPhase> {
        self.inner.read().get(id).copied()
    }

    /// Snapshot of every active session.
    pub fn snapshot(&self) -> Vec<(String, SessionPhase)> {
        let mut sessions: Vec<_> = self
            .inner
            .read()
            .iter()
            .map(|(id, phase)| (id.clone(), *phase))
            .collect();
        sessions.sort();
        sessions
    }

    fn update(&self, id: &str, phase: SessionPhase) {
        if let Some(entry) = self.inner.write().get_mut(id) {
            *entry = phase;
        }
    }

    fn remove(&self, id: &str) {
        self.inner.write().remove(id);
    }
}

/// One in-flight session. Dropping it removes the registry entry.
#[derive(Debug)]
pub struct SessionHandle {
    id: String,
    started: Instant,
    phase: SessionPhase,
    registry: ActiveSessions,
}

impl SessionHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Move to `next`. Illegal transitions are ignored and return `false`.
    pub fn advance(&mut self, next: SessionPhase) -> bool {
        if !self.phase.can_advance_to(next) {
            debug!(session = %self.id, from = %self.phase, to = %next, "transition rejected");
            return false;
        }
        self.phase = next;
        self.registry.update(&self.id, next);
        true
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
        debug!(session = %self.id, phase = %self.phase, "session closed");
    }
}

fn new_session_id() -> String {
    format!("gen_{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_only() {
        let sessions = ActiveSessions::new();
        let mut s = sessions.open();
        assert!(s.id().starts_with("gen_"));
        assert!(s.advance(SessionPhase::Analyzing));
        assert!(s.advance(SessionPhase::Synthesizing));
        assert!(!s.advance(SessionPhase::Planning));
        assert!(!s.advance(SessionPhase::Success));
        assert_eq!(sessions.phase_of(s.id()), Some(SessionPhase::Synthesizing));
    }

    #[test]
    fn test_terminal_is_final() {
        let sessions = ActiveSessions::new();
        let mut s = sessions.open();
        assert!(s.advance(SessionPhase::Assembling));
        assert!(s.advance(SessionPhase::Warning));
        assert!(!s.advance(SessionPhase::Failed));
        assert_eq!(s.phase(), SessionPhase::Warning);
    }

    #[test]
    fn test_drop_removes_entry() {
        let sessions = ActiveSessions::new();
        let a = sessions.open();
        let mut b = sessions.open();
        assert_ne!(a.id(), b.id());
        assert_eq!(sessions.len(), 2);

        b.advance(SessionPhase::Failed);
        drop(b);
        assert_eq!(sessions.len(), 1);
        drop(a);
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_from_build_status() {
        assert_eq!(
            SessionPhase::from_build_status(BuildStatus::Warning),
            SessionPhase::Warning
        );
    }
}
