//! Artifact loading
//!
//! Both artifacts load exactly once at process startup. Any failure here is
//! fatal: serving traffic with a missing or corrupt model is worse than
//! refusing to start, so the caller is expected to propagate the error out
//! of `main`.

use crate::classifier::LinearClassifier;
use crate::preprocessor::Preprocessor;
use lendscore_core::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::info;

/// The two loaded model artifacts, cross-checked against each other
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub preprocessor: Preprocessor,
    pub classifier: LinearClassifier,
}

impl ModelArtifacts {
    /// Load and validate both artifacts from disk
    ///
    /// Fails if either file is absent, unreadable, or malformed, or if the
    /// classifier's coefficient count disagrees with the preprocessor's
    /// output width. The width check catches a mismatched artifact pair at
    /// boot instead of on the first scoring request.
    pub fn load(
        preprocessor_path: impl AsRef<Path>,
        classifier_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let preprocessor: Preprocessor = read_artifact(preprocessor_path.as_ref(), "preprocessor")?;
        preprocessor.validate()?;

        let classifier: LinearClassifier = read_artifact(classifier_path.as_ref(), "classifier")?;
        classifier.validate()?;

        if classifier.n_features() != preprocessor.output_width() {
            return Err(Error::artifact(format!(
                "artifact mismatch: preprocessor produces {} features but classifier expects {}",
                preprocessor.output_width(),
                classifier.n_features()
            )));
        }

        info!(
            version = %classifier.version,
            columns = preprocessor.required_columns().len(),
            width = preprocessor.output_width(),
            "model artifacts loaded"
        );

        Ok(Self {
            preprocessor,
            classifier,
        })
    }

    /// Version tag of the deployed model
    pub fn version(&self) -> &str {
        &self.classifier.version
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        Error::artifact(format!("cannot read {what} artifact {}: {e}", path.display()))
    })?;

    serde_json::from_str(&raw).map_err(|e| {
        Error::artifact(format!(
            "cannot deserialize {what} artifact {}: {e}",
            path.display()
        ))
    })
}
