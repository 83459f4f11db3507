//! sonar-exporter agent library entry.
//!
//! Wires the configuration, the SonarQube fetcher, the poll loop, and the
//! metrics registry into a runnable exporter. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod fetch;
pub mod obs;
pub mod ops;
pub mod poller;
pub mod router;
