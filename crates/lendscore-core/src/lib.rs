//! Lendscore Core
//!
//! Core types and error handling shared across Lendscore components.
//!
//! This crate provides:
//! - The error taxonomy used by the scoring pipeline and HTTP layer
//! - Wire-level request parsing (structural validation of feature payloads)
//! - Prediction and risk-band types returned by the classifier

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{FeatureValue, InferenceRequest, Prediction, RiskBand};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{FeatureValue, InferenceRequest, Prediction, RiskBand};
}
