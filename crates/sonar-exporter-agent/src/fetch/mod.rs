//! Fetcher: pulls the two upstream documents.
//!
//! `SonarApi` is the seam the poll loop depends on; `SonarClient` is the
//! reqwest-backed implementation.

pub mod client;

use async_trait::async_trait;
use serde_json::Value;

use sonar_exporter_core::error::Result;

pub use client::SonarClient;

/// Parsed bodies of one poll cycle.
#[derive(Debug, Clone)]
pub struct SonarResponses {
    pub license_usage: Value,
    pub system_info: Value,
}

#[async_trait]
pub trait SonarApi: Send + Sync {
    /// Fetch both documents. Fails as a whole if either call fails.
    async fn fetch(&self) -> Result<SonarResponses>;
}
