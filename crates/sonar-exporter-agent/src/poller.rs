//! Poll loop: fetch, transform, publish, sleep.
//!
//! One task runs cycles back to back with a fixed sleep in between, so a slow
//! fetch delays the next cycle instead of overlapping it. A failed cycle
//! publishes nothing and the previous Gauge Set stays in place.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tracing::Instrument;

use sonar_exporter_core::error::Result;
use sonar_exporter_core::sonar::{LicenseUsage, SystemInfo};
use sonar_exporter_core::GaugeSnapshot;

use crate::app_state::AppState;
use crate::fetch::SonarApi;
use crate::obs::metrics::OUTCOME_OK;

pub struct Poller<A> {
    api: A,
    state: AppState,
    interval: Duration,
}

impl<A: SonarApi> Poller<A> {
    pub fn new(api: A, state: AppState) -> Self {
        let interval = state.cfg().poll_interval();
        Self { api, state, interval }
    }

    /// Run one cycle and record its outcome in the self-metrics.
    pub async fn poll_once(&self) -> Result<()> {
        let started = Instant::now();
        let res = self.cycle().await;

        let metrics = self.state.metrics();
        match &res {
            Ok(()) => {
                metrics.polls.inc(&[("outcome", OUTCOME_OK)]);
                metrics.poll_duration.observe(&[("outcome", OUTCOME_OK)], started.elapsed());
            }
            Err(e) => {
                metrics.polls.inc(&[("outcome", "error"), ("code", e.code().as_str())]);
                metrics.poll_duration.observe(&[("outcome", "error")], started.elapsed());
            }
        }
        res
    }

    async fn cycle(&self) -> Result<()> {
        let resp = self.api.fetch().await?;

        let license = LicenseUsage::from_json(&resp.license_usage);
        let system = SystemInfo::from_json(&resp.system_info);
        let snapshot = GaugeSnapshot::from_responses(&license, &system);

        let metrics = self.state.metrics();
        let first = !metrics.has_succeeded();
        metrics.publish(snapshot);
        metrics.mark_success(unix_now());

        if first {
            tracing::info!(
                projects = license.projects.len(),
                health = %system.health,
                "first poll published"
            );
        } else {
            tracing::debug!(projects = license.projects.len(), health = %system.health, "poll published");
        }
        Ok(())
    }

    /// Poll forever. Errors are logged and the loop continues.
    pub async fn run(self) {
        let interval_secs = self.interval.as_secs();
        async move {
            loop {
                if let Err(e) = self.poll_once().await {
                    tracing::warn!(code = e.code().as_str(), error = %e, "poll failed");
                }
                tokio::time::sleep(self.interval).await;
            }
        }
        .instrument(tracing::info_span!("poller", interval_secs))
        .await
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
