//! Metrics registry for the exporter.
//!
//! The SonarQube gauges live in one `GaugeSnapshot` behind a `RwLock`; each
//! poll swaps in a complete snapshot, so a concurrent scrape renders either
//! the previous poll or the new one, never a mix.
//!
//! Self-metrics (poll counters and durations) use dynamic labels backed by
//! `DashMap`. Labels are flattened into sorted key vectors and series are
//! rendered in sorted order. Histogram buckets are fixed in microseconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use sonar_exporter_core::gauges::{GaugeSnapshot, LABEL_BRANCH, LABEL_PROJECT, LOC_BY_PROJECT};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &[(String, String)]) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// `{a="b"}` or nothing for an empty label set.
fn braced(labels: &str) -> String {
    if labels.is_empty() {
        String::new()
    } else {
        format!("{{{labels}}}")
    }
}

/// Prometheus float formatting (`+Inf`, `-Inf`, `NaN`).
fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf".into() } else { "-Inf".into() }
    } else {
        v.to_string()
    }
}

fn header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} {kind}");
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for one label set.
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "counter");
        let mut rows: Vec<(LabelKey, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (key, val) in rows {
            let _ = writeln!(out, "{}{} {}", name, braced(&label_str(&key)), val);
        }
    }
}

// Fixed Buckets in Microseconds (µs)
// 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s, 5s, 10s
const BUCKETS_MICROS: [u64; 9] = [
    1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000, 5_000_000, 10_000_000,
];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 9],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration and increment cumulative buckets (microsecond scale).
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self.map.entry(label_key(labels)).or_insert_with(AtomicHistogram::default);
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(micros, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Render in Prometheus text exposition format (unit: microseconds).
    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "histogram");
        let mut keys: Vec<LabelKey> = self.map.iter().map(|r| r.key().clone()).collect();
        keys.sort();
        for key in keys {
            let Some(hist) = self.map.get(&key) else { continue };
            let labels = label_str(&key);
            let prefix = if labels.is_empty() { String::new() } else { format!("{labels},") };

            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{name}_bucket{{{prefix}le=\"{le}\"}} {count}");
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}_bucket{{{prefix}le=\"+Inf\"}} {count}");

            let sum = hist.sum.load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}_sum{} {sum}", braced(&labels));
            let _ = writeln!(out, "{name}_count{} {count}", braced(&labels));
        }
    }
}

/// Poll outcome label value for a successful cycle.
pub const OUTCOME_OK: &str = "ok";

#[derive(Default)]
pub struct ExporterMetrics {
    gauges: RwLock<GaugeSnapshot>,
    pub polls: CounterVec,
    pub poll_duration: HistogramVec, // In Microseconds
    last_success_unix: AtomicU64,
    published: AtomicBool,
}

impl ExporterMetrics {
    /// Replace the whole Gauge Set.
    pub fn publish(&self, snapshot: GaugeSnapshot) {
        let mut g = self.gauges.write().unwrap_or_else(PoisonError::into_inner);
        *g = snapshot;
    }

    /// Copy of the current Gauge Set.
    pub fn snapshot(&self) -> GaugeSnapshot {
        self.gauges.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn mark_success(&self, unix_secs: u64) {
        self.last_success_unix.store(unix_secs, Ordering::Relaxed);
        self.published.store(true, Ordering::Release);
    }

    /// Whether at least one poll has been published.
    pub fn has_succeeded(&self) -> bool {
        self.published.load(Ordering::Acquire)
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        {
            // Render under one read guard so every series comes from the same poll.
            let g = self.gauges.read().unwrap_or_else(PoisonError::into_inner);
            for (name, help, value) in g.scalars() {
                header(&mut out, name, help, "gauge");
                let _ = writeln!(out, "{name} {}", fmt_value(value));
            }

            header(&mut out, LOC_BY_PROJECT, "Lines of code by project", "gauge");
            for ((project, branch), loc) in &g.loc_by_project {
                let _ = writeln!(
                    out,
                    "{LOC_BY_PROJECT}{{{LABEL_PROJECT}=\"{}\",{LABEL_BRANCH}=\"{}\"}} {}",
                    escape_label(project),
                    escape_label(branch),
                    fmt_value(*loc)
                );
            }
        }

        self.polls.render("sonar_exporter_polls_total", "Poll cycles by outcome", &mut out);
        self.poll_duration.render(
            "sonar_exporter_poll_duration_micros",
            "Poll cycle duration in microseconds",
            &mut out,
        );
        header(
            &mut out,
            "sonar_exporter_last_success_timestamp_seconds",
            "Unix time of the last successful poll",
            "gauge",
        );
        let _ = writeln!(
            out,
            "sonar_exporter_last_success_timestamp_seconds {}",
            self.last_success_unix.load(Ordering::Relaxed)
        );
        out
    }
}
