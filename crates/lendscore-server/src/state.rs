//! Shared application state
//!
//! Everything here is immutable after startup. Handlers clone the state
//! freely; the artifacts behind the pipeline are shared through `Arc`, so
//! concurrent requests need no coordination.

use crate::config::ServerConfig;
use lendscore_model::ScoringPipeline;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub pipeline: ScoringPipeline,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(config: ServerConfig, pipeline: ScoringPipeline, metrics: PrometheusHandle) -> Self {
        Self {
            config: Arc::new(config),
            pipeline,
            metrics,
        }
    }
}
