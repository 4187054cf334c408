//! Lendscore Model
//!
//! Loads the two pre-trained artifacts (preprocessor and classifier) and
//! exposes the scoring pipeline that turns a validated feature payload into
//! a risk prediction.
//!
//! Both artifacts are deserialized once at startup and never mutated; the
//! pipeline is a pure function of the request and the loaded state, so it
//! can be shared across request handlers without locking.

pub mod artifacts;
pub mod classifier;
pub mod pipeline;
pub mod preprocessor;

pub use artifacts::ModelArtifacts;
pub use classifier::LinearClassifier;
pub use pipeline::ScoringPipeline;
pub use preprocessor::{Preprocessor, SchemaReport};
