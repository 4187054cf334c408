//! Error types for Lendscore

/// Result type alias using Lendscore's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Lendscore operations
///
/// The taxonomy distinguishes caller mistakes (`Input`, `Schema`) from
/// deployment faults (`Artifact`, `Inference`) so the HTTP layer can map
/// them to 4xx and 5xx without inspecting message strings.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Payload fails structural validation (not an object, empty, nested values)
    #[error("invalid input: {0}")]
    Input(String),

    /// Payload is structurally valid but incompatible with the trained schema
    #[error("schema error in field '{field}': {reason}")]
    Schema {
        /// The offending feature name
        field: String,
        /// Why the preprocessor rejected it
        reason: String,
    },

    /// Artifact failed to load or deserialize at startup
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Classifier failed on a well-formed feature vector (corrupt or mismatched artifact)
    #[error("inference error: {0}")]
    Inference(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Scoring exceeded the per-request deadline
    #[error("operation timed out")]
    Timeout,

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new input-validation error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a new schema error naming the offending field
    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error is the caller's fault (maps to a 4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Input(_) | Self::Schema { .. })
    }
}
