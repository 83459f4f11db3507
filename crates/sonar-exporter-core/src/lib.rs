//! sonar-exporter core: upstream response models, the get-or-default field
//! accessors, and the response-to-gauge transform.
//!
//! This crate carries no transport or runtime dependencies so the mapping from
//! SonarQube JSON to gauge values can be tested without any HTTP layer.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. A missing or
//! mistyped upstream field resolves to its default, and every other fallible
//! path surfaces as `ExporterError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod gauges;
pub mod sonar;

/// Shared result type.
pub use error::{Result, ExporterError};
pub use gauges::GaugeSnapshot;
