//! Classifier backends.
//!
//! `build(config)` is the factory, called once per process at startup.
//! Adding a backend = new module + new match arm.

pub mod fixed;
#[cfg(feature = "classifier-lexicon")]
pub mod lexicon;

use std::sync::Arc;

use crate::classifier::{Classifier, ClassifierError};
use crate::config::ClassifierConfig;

/// Construct the configured classifier.
///
/// Construction never touches the model artifact; backends that need one
/// load it on first `predict`, so a missing file surfaces per submission
/// instead of aborting startup.
pub fn build(config: &ClassifierConfig) -> Result<Arc<dyn Classifier>, ClassifierError> {
    match config.backend.as_str() {
        "fixed" => Ok(Arc::new(fixed::FixedClassifier::new(config.fixed.label))),
        #[cfg(feature = "classifier-lexicon")]
        "lexicon" => Ok(Arc::new(lexicon::LexiconClassifier::new(
            config.lexicon.model_path.clone(),
        ))),
        other => Err(ClassifierError::UnknownBackend(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Label;
    use crate::config::{FixedConfig, LexiconConfig};
    use std::path::PathBuf;

    fn config(backend: &str) -> ClassifierConfig {
        ClassifierConfig {
            backend: backend.into(),
            lexicon: LexiconConfig { model_path: PathBuf::from("/nonexistent/lexicon.json") },
            fixed: FixedConfig { label: Label::Spam },
        }
    }

    #[test]
    fn builds_fixed() {
        let c = build(&config("fixed")).unwrap();
        assert_eq!(c.name(), "fixed");
        assert_eq!(c.predict("anything").unwrap(), Label::Spam);
    }

    #[cfg(feature = "classifier-lexicon")]
    #[test]
    fn lexicon_builds_without_artifact() {
        let c = build(&config("lexicon")).unwrap();
        assert_eq!(c.name(), "lexicon");
        assert!(matches!(c.predict("hi"), Err(ClassifierError::ArtifactMissing(_))));
    }

    #[test]
    fn unknown_backend_errors() {
        let err = build(&config("pickle")).err().unwrap();
        assert!(matches!(err, ClassifierError::UnknownBackend(ref b) if b == "pickle"));
    }
}
