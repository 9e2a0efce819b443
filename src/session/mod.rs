//! Per-user selection state.
//!
//! A [`SelectionSession`] tracks what the user is building (pending names
//! and draft input) separately from what is actually rendered (the batch
//! frozen at generate time). Keeping the two apart means the UI only
//! re-renders on an explicit generate, never on a keystroke.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::SessionError;

/// The selection state machine for one user session.
///
/// `generated_batch` is only ever set by [`generate`](Self::generate) and
/// cleared by [`remove`](Self::remove) or [`clear_all`](Self::clear_all);
/// it is never recomputed implicitly from `pending_names`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionSession {
    /// Unique session identifier.
    pub id: String,
    /// Names added but not yet generated, in insertion order, no duplicates.
    pub pending_names: Vec<String>,
    /// Current free-text input; cleared on each successful add.
    pub draft_text: String,
    /// Names frozen at the last generate, independent of later edits.
    pub generated_batch: Vec<String>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session last changed.
    pub updated_at: DateTime<Utc>,
}

impl SelectionSession {
    /// Create an empty session with a fresh id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// Create an empty session with the given id.
    pub fn with_id(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            pending_names: Vec::new(),
            draft_text: String::new(),
            generated_batch: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the draft text. Pending names and the generated batch are
    /// untouched.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft_text = text.into();
        self.touch();
    }

    /// Add a name to the pending selection and clear the draft.
    ///
    /// Idempotent: an empty name or one already pending is a no-op. Unknown
    /// names are accepted here on purpose; resolution happens at generate
    /// time, which surfaces a per-name "not found" instead.
    pub fn add(&mut self, name: impl Into<String>) {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() || self.pending_names.iter().any(|n| n == trimmed) {
            return;
        }
        self.pending_names.push(trimmed.to_string());
        self.draft_text.clear();
        self.touch();
    }

    /// Remove a name from the pending selection.
    ///
    /// Also clears the generated batch entirely: a deselected stock must not
    /// keep showing a stale report.
    pub fn remove(&mut self, name: &str) {
        let before = self.pending_names.len();
        self.pending_names.retain(|n| n != name);
        if self.pending_names.len() != before {
            self.generated_batch.clear();
            self.touch();
        }
    }

    /// Freeze the pending selection into the generated batch.
    ///
    /// With nothing pending this reports a recoverable "nothing selected"
    /// signal and leaves all state, including any previous batch, unchanged.
    pub fn generate(&mut self) -> Result<Vec<String>, SessionError> {
        if self.pending_names.is_empty() {
            return Err(SessionError::NothingSelected);
        }
        self.generated_batch = self.pending_names.clone();
        self.touch();
        Ok(self.generated_batch.clone())
    }

    /// Reset pending names, draft text, and the generated batch.
    pub fn clear_all(&mut self) {
        self.pending_names.clear();
        self.draft_text.clear();
        self.generated_batch.clear();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for SelectionSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of live sessions, keyed by session id.
///
/// Sessions are isolated: concurrent clients each get their own selection
/// state, created lazily on first use.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: HashMap<String, SelectionSession>,
}

impl SessionManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the session with the given id, creating it (or a fresh one when
    /// no id is supplied) as needed.
    pub fn get_or_create(&mut self, id: Option<&str>) -> &mut SelectionSession {
        let id = match id {
            Some(id) => id.to_string(),
            None => Uuid::new_v4().to_string(),
        };
        self.sessions
            .entry(id.clone())
            .or_insert_with(|| SelectionSession::with_id(id))
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions exist yet.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
