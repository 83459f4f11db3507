//! In-process metrics.
//!
//! Holds the exported SonarQube Gauge Set and the exporter's own poll
//! counters, rendered in Prometheus text format by the `/metrics` handler.

pub mod metrics;
