//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Server configuration, loaded from YAML with CLI overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the serialized preprocessor artifact
    #[serde(default = "default_preprocessor_path")]
    pub preprocessor_path: String,

    /// Path to the serialized classifier artifact
    #[serde(default = "default_classifier_path")]
    pub classifier_path: String,

    /// Wall-clock ceiling for one scoring request
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    ///
    /// A missing config file is not an error; defaults apply and CLI flags
    /// still win.
    pub fn load(config_path: &str, cli: &crate::Cli) -> anyhow::Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }
        if let Some(port) = cli.port {
            config.port = port;
        }
        if let Some(preprocessor) = &cli.preprocessor {
            config.preprocessor_path = preprocessor.clone();
        }
        if let Some(classifier) = &cli.classifier {
            config.classifier_path = classifier.clone();
        }

        Ok(config)
    }

    /// Per-request scoring deadline
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            preprocessor_path: default_preprocessor_path(),
            classifier_path: default_classifier_path(),
            request_timeout_ms: default_request_timeout_ms(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_preprocessor_path() -> String {
    "artifacts/preprocessor.json".to_string()
}

fn default_classifier_path() -> String {
    "artifacts/classifier.json".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}
