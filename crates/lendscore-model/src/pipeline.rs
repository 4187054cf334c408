//! The two-stage scoring pipeline
//!
//! transform, then predict. No branching, no retries: both stages are pure,
//! deterministic, in-memory transforms, so a failure would recur identically
//! on retry. Transform failures are the caller's fault (data incompatible
//! with the trained schema); predict failures are ours (broken artifacts).

use crate::artifacts::ModelArtifacts;
use crate::preprocessor::SchemaReport;
use lendscore_core::{InferenceRequest, Prediction, Result};
use std::sync::Arc;
use tracing::debug;

/// Stateless scoring pipeline over the loaded artifacts
///
/// Cheap to clone; all request handlers share one loaded copy.
#[derive(Debug, Clone)]
pub struct ScoringPipeline {
    artifacts: Arc<ModelArtifacts>,
}

impl ScoringPipeline {
    pub fn new(artifacts: ModelArtifacts) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
        }
    }

    /// Score one request: transform, predict, band
    pub fn score(&self, request: &InferenceRequest) -> Result<Prediction> {
        let vector = self.artifacts.preprocessor.transform(request)?;
        let pd = self.artifacts.classifier.predict_proba(&vector)?;

        debug!(pd, width = vector.len(), "request scored");

        Ok(Prediction::from_pd(
            pd,
            &self.artifacts.classifier.labels.negative,
            &self.artifacts.classifier.labels.positive,
        ))
    }

    /// Dry-run schema report without scoring
    pub fn schema_report(&self, request: &InferenceRequest) -> SchemaReport {
        self.artifacts.preprocessor.schema_report(request)
    }

    /// Every column the trained schema requires
    pub fn required_columns(&self) -> Vec<&str> {
        self.artifacts.preprocessor.required_columns()
    }

    /// Version tag of the deployed model
    pub fn model_version(&self) -> &str {
        self.artifacts.version()
    }
}
