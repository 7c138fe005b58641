//! Classifier capability.
//!
//! The session layer only sees [`Classifier`]: one blocking `predict` call
//! that yields a [`Label`] or fails. How a backend obtains its model (file,
//! constant, anything else) stays behind the trait.
//!
//! Backends live in `providers/`; [`providers::build`] picks one from config.

pub mod providers;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Label ─────────────────────────────────────────────────────────────────────

/// Binary classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Spam,
    NotSpam,
}

impl Label {
    pub fn is_spam(self) -> bool {
        matches!(self, Label::Spam)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Spam => write!(f, "spam"),
            Label::NotSpam => write!(f, "not spam"),
        }
    }
}

impl FromStr for Label {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spam" => Ok(Label::Spam),
            "not_spam" | "not spam" | "not-spam" | "ham" => Ok(Label::NotSpam),
            other => Err(ClassifierError::InvalidLabel(other.to_string())),
        }
    }
}

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("unknown classifier backend: {0}")]
    UnknownBackend(String),
    #[error("model artifact not found: {}", .0.display())]
    ArtifactMissing(PathBuf),
    #[error("model artifact invalid: {0}")]
    ArtifactInvalid(String),
    #[error("invalid label: {0}")]
    InvalidLabel(String),
    #[error("prediction failed: {0}")]
    Predict(String),
}

// ── Capability ────────────────────────────────────────────────────────────────

/// A spam / not-spam predictor.
///
/// Implementations are shared across threads behind an `Arc` and may block
/// (file I/O on first use, CPU-bound scoring).
pub trait Classifier: Send + Sync {
    /// Backend name for logs (e.g. `"lexicon"`).
    fn name(&self) -> &str;

    /// Classify `text` exactly as given.
    fn predict(&self, text: &str) -> Result<Label, ClassifierError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_parses_aliases() {
        assert_eq!("spam".parse::<Label>().unwrap(), Label::Spam);
        assert_eq!(" SPAM ".parse::<Label>().unwrap(), Label::Spam);
        assert_eq!("not_spam".parse::<Label>().unwrap(), Label::NotSpam);
        assert_eq!("Not Spam".parse::<Label>().unwrap(), Label::NotSpam);
        assert_eq!("ham".parse::<Label>().unwrap(), Label::NotSpam);
    }

    #[test]
    fn label_rejects_unknown() {
        let err = "eggs".parse::<Label>().unwrap_err();
        assert!(err.to_string().contains("eggs"));
    }

    #[test]
    fn label_serde_names() {
        assert_eq!(serde_json::to_string(&Label::Spam).unwrap(), "\"spam\"");
        assert_eq!(serde_json::to_string(&Label::NotSpam).unwrap(), "\"not_spam\"");
        let back: Label = serde_json::from_str("\"not_spam\"").unwrap();
        assert_eq!(back, Label::NotSpam);
    }

    #[test]
    fn label_display() {
        assert_eq!(Label::Spam.to_string(), "spam");
        assert_eq!(Label::NotSpam.to_string(), "not spam");
        assert!(Label::Spam.is_spam());
        assert!(!Label::NotSpam.is_spam());
    }

    #[test]
    fn missing_artifact_message_has_path() {
        let e = ClassifierError::ArtifactMissing(PathBuf::from("/nope/model.json"));
        assert!(e.to_string().contains("/nope/model.json"));
    }
}
