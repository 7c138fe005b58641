//! Fixed classifier: returns the same label for every message.
//! Used for smoke-testing the console without a model artifact.

use crate::classifier::{Classifier, ClassifierError, Label};

#[derive(Debug, Clone)]
pub struct FixedClassifier {
    label: Label,
}

impl FixedClassifier {
    pub fn new(label: Label) -> Self {
        Self { label }
    }
}

impl Classifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    fn predict(&self, _text: &str) -> Result<Label, ClassifierError> {
        Ok(self.label)
    }
}
