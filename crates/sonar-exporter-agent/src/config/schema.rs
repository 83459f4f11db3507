use std::fmt;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub sonar: SonarSection,

    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl ExporterConfig {
    /// Config with default listen address and interval.
    pub fn from_sonar(sonar: SonarSection) -> Self {
        Self {
            sonar,
            listen: default_listen(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SonarSection {
    pub base_url: String,
    pub token: String,
}

// keep the token out of logs
impl fmt::Debug for SonarSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SonarSection")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}
fn default_poll_interval_secs() -> u64 {
    30
}
