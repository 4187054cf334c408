//! Core types for Lendscore

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single scalar feature value from the wire
///
/// Payloads are untrusted JSON, so only scalars are representable here;
/// nested arrays and objects are rejected during [`InferenceRequest::parse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Numeric feature (or boolean, encoded as 0.0/1.0)
    Number(f64),
    /// Categorical feature
    Text(String),
}

impl FeatureValue {
    /// Interpret this value as a float
    ///
    /// Numeric strings are accepted ("52000" scores the same as 52000),
    /// matching how lenient clients submit form data.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    /// Interpret this value as a categorical label
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            Self::Number(_) => None,
        }
    }
}

/// A validated inference request: a non-empty mapping of feature name to scalar
///
/// Parsing performs structural validation only. Whether the named features
/// actually cover the trained schema is the preprocessor's concern; only the
/// artifact knows its expected columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InferenceRequest {
    features: BTreeMap<String, FeatureValue>,
}

impl InferenceRequest {
    /// Parse a raw JSON payload into a request
    ///
    /// Rejects anything that is not an object, an empty object, or an object
    /// with a null/array/object field value.
    pub fn parse(payload: &serde_json::Value) -> Result<Self> {
        let map = payload
            .as_object()
            .ok_or_else(|| Error::input("payload must be a JSON object"))?;

        if map.is_empty() {
            return Err(Error::input("payload must contain at least one feature"));
        }

        let mut features = BTreeMap::new();
        for (name, value) in map {
            let scalar = match value {
                serde_json::Value::Number(n) => {
                    let f = n
                        .as_f64()
                        .ok_or_else(|| Error::input(format!("field '{name}' is out of range")))?;
                    FeatureValue::Number(f)
                }
                serde_json::Value::String(s) => FeatureValue::Text(s.clone()),
                serde_json::Value::Bool(b) => FeatureValue::Number(if *b { 1.0 } else { 0.0 }),
                serde_json::Value::Null => {
                    return Err(Error::input(format!("field '{name}' must not be null")))
                }
                serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                    return Err(Error::input(format!(
                        "field '{name}' must be a scalar, not a nested structure"
                    )))
                }
            };
            features.insert(name.clone(), scalar);
        }

        Ok(Self { features })
    }

    /// Look up a feature by name
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }

    /// Whether the request carries the named feature
    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// Number of features in the request
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the request is empty (cannot happen after `parse`)
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Replace a feature value, returning the updated request
    ///
    /// Used by sanity checks that re-score perturbed copies of a payload.
    pub fn with_feature(mut self, name: impl Into<String>, value: FeatureValue) -> Self {
        self.features.insert(name.into(), value);
        self
    }
}

/// Risk band derived from the probability of default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// Band thresholds: pd < 0.15 is low, pd < 0.30 is medium, else high
    pub fn from_pd(pd: f64) -> Self {
        if pd < 0.15 {
            Self::Low
        } else if pd < 0.30 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Human-readable risk category
    pub fn category(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }

    /// Underwriting decision for this band
    pub fn decision(&self) -> &'static str {
        match self {
            Self::Low => "APPROVE",
            Self::Medium => "MANUAL_REVIEW",
            Self::High => "REJECT",
        }
    }
}

/// Result of scoring one request against the loaded artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Underwriting decision label
    pub label: String,

    /// Probability of each classifier label
    pub probabilities: BTreeMap<String, f64>,

    /// Probability of default (the positive-class score)
    pub pd: f64,

    /// Risk band the pd falls into
    pub risk_band: RiskBand,
}

impl Prediction {
    /// Build a prediction from a pd score and the classifier's label pair
    pub fn from_pd(pd: f64, negative_label: &str, positive_label: &str) -> Self {
        let band = RiskBand::from_pd(pd);
        let mut probabilities = BTreeMap::new();
        probabilities.insert(negative_label.to_string(), 1.0 - pd);
        probabilities.insert(positive_label.to_string(), pd);

        Self {
            label: band.decision().to_string(),
            probabilities,
            pd,
            risk_band: band,
        }
    }
}
