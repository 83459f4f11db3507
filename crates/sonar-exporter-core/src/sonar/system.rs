//! System info response (`/api/system/info`).
//!
//! Health is read from one of the shapes seen across SonarQube versions:
//! a nested `health.status`, a top-level `Health`, or a top-level string
//! `health`. The first one present wins.

use serde_json::Value;

use super::fields::{lookup, num_or};

/// Status literal reported by a healthy server.
pub const HEALTH_GREEN: &str = "GREEN";
/// Status used when no health field is present.
pub const HEALTH_UNKNOWN: &str = "UNKNOWN";

const TASKS: &str = "Compute Engine Tasks";
const JVM: &str = "Compute Engine JVM State";

/// Compute-engine task counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputeEngineTasks {
    pub processed_with_error: f64,
    pub processed_with_success: f64,
    pub processing_time_ms: f64,
}

impl ComputeEngineTasks {
    fn from_json(v: &Value) -> Self {
        Self {
            processed_with_error: num_or(v, &[TASKS, "Processed With Error"], 0.0),
            processed_with_success: num_or(v, &[TASKS, "Processed With Success"], 0.0),
            processing_time_ms: num_or(v, &[TASKS, "Processing Time (ms)"], 0.0),
        }
    }
}

/// Compute-engine JVM memory and thread statistics (MB unless noted).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputeEngineJvm {
    pub max_memory_mb: f64,
    pub free_memory_mb: f64,
    pub heap_committed_mb: f64,
    pub heap_init_mb: f64,
    pub heap_max_mb: f64,
    pub heap_used_mb: f64,
    pub non_heap_committed_mb: f64,
    pub non_heap_init_mb: f64,
    pub non_heap_used_mb: f64,
    pub threads: f64,
}

impl ComputeEngineJvm {
    fn from_json(v: &Value) -> Self {
        let n = |key: &str| num_or(v, &[JVM, key], 0.0);
        Self {
            max_memory_mb: n("Max Memory (MB)"),
            free_memory_mb: n("Free Memory (MB)"),
            heap_committed_mb: n("Heap Committed (MB)"),
            heap_init_mb: n("Heap Init (MB)"),
            heap_max_mb: n("Heap Max (MB)"),
            heap_used_mb: n("Heap Used (MB)"),
            non_heap_committed_mb: n("Non Heap Committed (MB)"),
            non_heap_init_mb: n("Non Heap Init (MB)"),
            non_heap_used_mb: n("Non Heap Used (MB)"),
            threads: n("Threads"),
        }
    }
}

/// Decoded system info document.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemInfo {
    pub health: String,
    pub tasks: ComputeEngineTasks,
    pub jvm: ComputeEngineJvm,
    pub users: f64,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            health: HEALTH_UNKNOWN.to_string(),
            tasks: ComputeEngineTasks::default(),
            jvm: ComputeEngineJvm::default(),
            users: 0.0,
        }
    }
}

impl SystemInfo {
    pub fn from_json(v: &Value) -> Self {
        Self {
            health: health_status(v),
            tasks: ComputeEngineTasks::from_json(v),
            jvm: ComputeEngineJvm::from_json(v),
            users: num_or(v, &["users", "count"], 0.0),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.health == HEALTH_GREEN
    }
}

fn health_status(v: &Value) -> String {
    [&["health", "status"][..], &["Health"][..], &["health"][..]]
        .iter()
        .find_map(|path| lookup(v, path).and_then(Value::as_str))
        .unwrap_or(HEALTH_UNKNOWN)
        .to_string()
}
