//! SonarQube upstream responses.
//!
//! Two endpoints are read:
//! - `/api/projects/license_usage`: per-project lines of code.
//! - `/api/system/info`: health plus compute-engine task and JVM state.
//!
//! Both are decoded from an already-parsed `serde_json::Value` through the
//! accessors in [`fields`], so a missing or mistyped field resolves to its
//! default instead of failing the whole document.

pub mod fields;
pub mod license;
pub mod system;

pub use license::{LicenseUsage, Project};
pub use system::{ComputeEngineJvm, ComputeEngineTasks, SystemInfo};

/// Path of the license usage endpoint, relative to the server base URL.
pub const LICENSE_USAGE_PATH: &str = "/api/projects/license_usage";
/// Path of the system info endpoint, relative to the server base URL.
pub const SYSTEM_INFO_PATH: &str = "/api/system/info";
