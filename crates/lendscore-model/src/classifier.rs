//! Binary classifier over preprocessed feature vectors
//!
//! The classifier artifact is a logistic-regression scorer: a coefficient
//! per feature-vector slot plus an intercept. A failure here on a
//! well-formed vector means the deployed artifacts do not match each other,
//! which is a server fault, never the caller's.

use lendscore_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// The label pair the classifier scores between
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelPair {
    /// Label for the negative class (probability `1 - pd`)
    pub negative: String,

    /// Label for the positive class (probability `pd`)
    pub positive: String,
}

/// The deserialized classifier artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    /// Version tag stamped by the training run
    pub version: String,

    /// Class labels; the positive class is the default/loss event
    pub labels: LabelPair,

    /// One coefficient per preprocessor output slot
    pub coefficients: Vec<f64>,

    /// Bias term
    pub intercept: f64,
}

impl LinearClassifier {
    /// Sanity-check the deserialized artifact before serving with it
    pub fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(Error::artifact("classifier has no coefficients"));
        }
        if self.coefficients.iter().any(|c| !c.is_finite()) || !self.intercept.is_finite() {
            return Err(Error::artifact("classifier weights contain non-finite values"));
        }
        if self.labels.negative == self.labels.positive {
            return Err(Error::artifact("classifier labels must be distinct"));
        }
        Ok(())
    }

    /// Number of feature-vector slots this classifier expects
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Probability of the positive class for one feature vector
    pub fn predict_proba(&self, vector: &[f64]) -> Result<f64> {
        if vector.len() != self.coefficients.len() {
            return Err(Error::inference(format!(
                "feature vector has {} values but classifier expects {}",
                vector.len(),
                self.coefficients.len()
            )));
        }

        let logit: f64 = self
            .coefficients
            .iter()
            .zip(vector)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;

        let pd = 1.0 / (1.0 + (-logit).exp());
        if !pd.is_finite() {
            return Err(Error::inference("classifier produced a non-finite score"));
        }

        Ok(pd)
    }
}
