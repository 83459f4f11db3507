//! Top-level facade crate for sonar-exporter.
//!
//! Re-exports core types and the agent library so users can depend on a single crate.

pub mod core {
    pub use sonar_exporter_core::*;
}

pub mod agent {
    pub use sonar_exporter_agent::*;
}
