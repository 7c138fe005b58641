//! Lexicon classifier: a linear token-weight model read from a JSON artifact.
//!
//! Artifact shape:
//! ```json
//! { "bias": -1.5, "weights": { "free": 1.2, "winner": 2.0 } }
//! ```
//!
//! Text is lowercased and split on non-alphanumeric characters. Each token
//! occurrence adds its weight to `bias`; a positive score means spam.
//!
//! The artifact is read on the first `predict` and cached afterwards. A
//! failed load is not cached, so the next call tries the file again.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::classifier::{Classifier, ClassifierError, Label};

/// Parsed model artifact.
#[derive(Debug, Deserialize)]
pub struct LexiconModel {
    #[serde(default)]
    pub bias: f64,
    pub weights: HashMap<String, f64>,
}

impl LexiconModel {
    /// Raw score for `text`; `> 0.0` classifies as spam.
    pub fn score(&self, text: &str) -> f64 {
        tokens(text)
            .filter_map(|t| self.weights.get(t.as_str()))
            .fold(self.bias, |acc, w| acc + w)
    }
}

pub struct LexiconClassifier {
    model_path: PathBuf,
    model: Mutex<Option<Arc<LexiconModel>>>,
}

impl LexiconClassifier {
    pub fn new(model_path: PathBuf) -> Self {
        Self { model_path, model: Mutex::new(None) }
    }

    fn model(&self) -> Result<Arc<LexiconModel>, ClassifierError> {
        let mut slot = self
            .model
            .lock()
            .map_err(|_| ClassifierError::Predict("lexicon model lock poisoned".into()))?;
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }
        let model = Arc::new(load_model(&self.model_path).inspect_err(|e| {
            warn!(path = %self.model_path.display(), "lexicon model load failed: {e}");
        })?);
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }
}

impl Classifier for LexiconClassifier {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn predict(&self, text: &str) -> Result<Label, ClassifierError> {
        let model = self.model()?;
        let score = model.score(text);
        debug!(score, "lexicon score");
        if !score.is_finite() {
            return Err(ClassifierError::Predict(format!("non-finite score {score}")));
        }
        Ok(if score > 0.0 { Label::Spam } else { Label::NotSpam })
    }
}

/// Read and parse the artifact at `path`.
pub fn load_model(path: &Path) -> Result<LexiconModel, ClassifierError> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ClassifierError::ArtifactMissing(path.to_path_buf()),
        _ => ClassifierError::ArtifactInvalid(format!("cannot read {}: {e}", path.display())),
    })?;
    let model: LexiconModel = serde_json::from_slice(&bytes)
        .map_err(|e| ClassifierError::ArtifactInvalid(format!("{}: {e}", path.display())))?;
    info!(
        path = %path.display(),
        fingerprint = %fingerprint(&bytes),
        tokens = model.weights.len(),
        "lexicon model loaded"
    );
    Ok(model)
}

/// First 8 hex chars of `SHA256(bytes)`.
pub fn fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(digest)[..8].to_string()
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}
