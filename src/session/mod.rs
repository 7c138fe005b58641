//! Classification session manager.
//!
//! One [`SessionManager`] per interactive session. It owns the session's
//! [`SessionHistory`], validates submissions, asks the injected
//! [`Classifier`] for a label and appends the resulting record.
//!
//! ### Ordering
//!
//! Submissions are serialised by `submit_gate`: the classifier call and the
//! append for one submission complete before the next submission starts
//! classifying. History order is therefore the order in which labels were
//! obtained. The history itself sits behind an `RwLock` so readers are never
//! blocked by a slow classifier, and a reader never sees a record without
//! its counter increment.

pub mod history;
pub mod record;

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use chrono::Local;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::config::{DEFAULT_PREVIEW_LEN, SessionConfig};

pub use history::{SessionHistory, SessionStats};
pub use record::ClassificationRecord;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The message is empty or whitespace only.
    #[error("message is empty")]
    EmptyMessage,
    /// The classifier could not produce a label.
    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),
}

// ── Settings / state ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Preview truncation length in characters.
    pub preview_len: usize,
    /// Store `analysis_duration_ms` on each record.
    pub track_duration: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { preview_len: DEFAULT_PREVIEW_LEN, track_duration: true }
    }
}

impl From<&SessionConfig> for SessionSettings {
    fn from(config: &SessionConfig) -> Self {
        Self { preview_len: config.preview_len, track_duration: config.track_duration }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    HasHistory,
}

// ── Manager ───────────────────────────────────────────────────────────────────

pub struct SessionManager {
    session_id: Uuid,
    classifier: Arc<dyn Classifier>,
    settings: SessionSettings,
    submit_gate: Mutex<()>,
    history: RwLock<SessionHistory>,
}

impl SessionManager {
    /// Start a session over `history` (normally [`SessionHistory::new`]).
    pub fn new(
        classifier: Arc<dyn Classifier>,
        history: SessionHistory,
        settings: SessionSettings,
    ) -> Self {
        let session_id = Uuid::new_v4();
        info!(
            %session_id,
            classifier = classifier.name(),
            preview_len = settings.preview_len,
            "session started"
        );
        Self {
            session_id,
            classifier,
            settings,
            submit_gate: Mutex::new(()),
            history: RwLock::new(history),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Classify `raw_message` and record it.
    ///
    /// The untrimmed message goes to the classifier; trimming only decides
    /// whether the message is empty. Failures leave the history untouched.
    pub fn submit(&self, raw_message: &str) -> Result<ClassificationRecord, SubmissionError> {
        if raw_message.trim().is_empty() {
            debug!(session_id = %self.session_id, "rejected empty message");
            return Err(SubmissionError::EmptyMessage);
        }

        let _gate = self.submit_gate.lock().unwrap_or_else(PoisonError::into_inner);

        let started = Instant::now();
        let label = self.classifier.predict(raw_message).map_err(|e| {
            warn!(session_id = %self.session_id, classifier = self.classifier.name(), "classification failed: {e}");
            SubmissionError::ClassifierUnavailable(e.to_string())
        })?;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let record = ClassificationRecord::new(
            raw_message,
            self.settings.preview_len,
            label,
            Local::now(),
            self.settings.track_duration.then_some(elapsed_ms),
        );

        let total = {
            let mut history = self.write_history();
            history.push(record.clone());
            history.len()
        };

        info!(
            session_id = %self.session_id,
            %label,
            duration_ms = elapsed_ms,
            total,
            "message classified"
        );
        Ok(record)
    }

    /// Up to `limit` most recent records, newest first.
    pub fn recent_history(&self, limit: usize) -> Vec<ClassificationRecord> {
        self.read_history().recent(limit)
    }

    /// Clear history and counters. Waits for an in-flight submission.
    pub fn reset(&self) {
        let _gate = self.submit_gate.lock().unwrap_or_else(PoisonError::into_inner);
        let cleared = {
            let mut history = self.write_history();
            let n = history.len();
            history.clear();
            n
        };
        info!(session_id = %self.session_id, cleared, "session reset");
    }

    pub fn stats(&self) -> SessionStats {
        self.read_history().stats()
    }

    pub fn state(&self) -> SessionState {
        if self.read_history().is_empty() {
            SessionState::Empty
        } else {
            SessionState::HasHistory
        }
    }

    // History mutations are single `push`/`clear` calls that cannot leave it
    // half-updated, so a poisoned lock still guards consistent data.
    fn read_history(&self) -> std::sync::RwLockReadGuard<'_, SessionHistory> {
        self.history.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_history(&self) -> std::sync::RwLockWriteGuard<'_, SessionHistory> {
        self.history.write().unwrap_or_else(PoisonError::into_inner)
    }
}
