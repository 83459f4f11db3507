//! Shared application state for the exporter.
//!
//! Owned by the process and cloned into both the poll loop and the HTTP
//! handlers.

use std::sync::Arc;

use crate::config::ExporterConfig;
use crate::obs::metrics::ExporterMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ExporterConfig,
    metrics: ExporterMetrics,
}

impl AppState {
    pub fn new(cfg: ExporterConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics: ExporterMetrics::default(),
            }),
        }
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &ExporterMetrics {
        &self.inner.metrics
    }

    /// Ready once the first poll has been published.
    pub fn is_ready(&self) -> bool {
        self.inner.metrics.has_succeeded()
    }
}
