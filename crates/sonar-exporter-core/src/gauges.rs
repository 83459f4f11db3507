//! Response-to-gauge transform.
//!
//! `GaugeSnapshot::from_responses` is a stateless mapping from the two
//! upstream documents to the complete exported Gauge Set. The agent swaps a
//! whole snapshot in at once, so a scrape always sees one poll's values.

use std::collections::BTreeMap;

use crate::sonar::{LicenseUsage, SystemInfo};

/// Name of the per-project labeled gauge.
pub const LOC_BY_PROJECT: &str = "sonarqube_loc_by_project";

/// Label key for the project name on [`LOC_BY_PROJECT`].
pub const LABEL_PROJECT: &str = "project_name";
/// Label key for the branch on [`LOC_BY_PROJECT`].
pub const LABEL_BRANCH: &str = "branch";

/// (project name, branch) key of the labeled lines-of-code gauge.
pub type ProjectKey = (String, String);

/// Full exported state for one poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GaugeSnapshot {
    pub health: f64,
    pub total_projects: f64,
    pub total_loc: f64,
    pub total_users: f64,

    pub ce_processed_with_error: f64,
    pub ce_processed_with_success: f64,
    pub ce_processing_time_ms: f64,

    pub jvm_max_memory_mb: f64,
    pub jvm_free_memory_mb: f64,
    pub jvm_heap_committed_mb: f64,
    pub jvm_heap_init_mb: f64,
    pub jvm_heap_max_mb: f64,
    pub jvm_heap_used_mb: f64,
    pub jvm_non_heap_committed_mb: f64,
    pub jvm_non_heap_init_mb: f64,
    pub jvm_non_heap_used_mb: f64,
    pub jvm_threads: f64,

    /// Sorted by (project, branch) so rendering is deterministic.
    pub loc_by_project: BTreeMap<ProjectKey, f64>,
}

/// One unlabeled gauge: name, help text, value.
pub type Scalar = (&'static str, &'static str, f64);

impl GaugeSnapshot {
    pub fn from_responses(license: &LicenseUsage, system: &SystemInfo) -> Self {
        let mut loc_by_project = BTreeMap::new();
        // Later entries overwrite earlier ones with the same key.
        for p in &license.projects {
            loc_by_project.insert((p.name.clone(), p.branch.clone()), p.lines_of_code);
        }

        let tasks = &system.tasks;
        let jvm = &system.jvm;

        Self {
            health: if system.is_healthy() { 1.0 } else { 0.0 },
            total_projects: license.projects.len() as f64,
            total_loc: license.total_lines_of_code(),
            total_users: system.users,

            ce_processed_with_error: tasks.processed_with_error,
            ce_processed_with_success: tasks.processed_with_success,
            ce_processing_time_ms: tasks.processing_time_ms,

            jvm_max_memory_mb: jvm.max_memory_mb,
            jvm_free_memory_mb: jvm.free_memory_mb,
            jvm_heap_committed_mb: jvm.heap_committed_mb,
            jvm_heap_init_mb: jvm.heap_init_mb,
            jvm_heap_max_mb: jvm.heap_max_mb,
            jvm_heap_used_mb: jvm.heap_used_mb,
            jvm_non_heap_committed_mb: jvm.non_heap_committed_mb,
            jvm_non_heap_init_mb: jvm.non_heap_init_mb,
            jvm_non_heap_used_mb: jvm.non_heap_used_mb,
            jvm_threads: jvm.threads,

            loc_by_project,
        }
    }

    /// Unlabeled gauges in exposition order.
    pub fn scalars(&self) -> [Scalar; 17] {
        [
            ("sonarqube_health_check", "Health check status of SonarQube", self.health),
            (
                "sonarqube_total_projects",
                "Total number of projects in SonarQube",
                self.total_projects,
            ),
            ("sonarqube_total_lines_of_code", "Total lines of code in SonarQube", self.total_loc),
            ("sonarqube_total_users", "Total number of users in SonarQube", self.total_users),
            (
                "sonarqube_ce_tasks_processed_with_error",
                "Compute engine tasks processed with error",
                self.ce_processed_with_error,
            ),
            (
                "sonarqube_ce_tasks_processed_with_success",
                "Compute engine tasks processed with success",
                self.ce_processed_with_success,
            ),
            (
                "sonarqube_ce_tasks_processing_time_ms",
                "Compute engine task processing time in milliseconds",
                self.ce_processing_time_ms,
            ),
            (
                "sonarqube_ce_jvm_max_memory_mb",
                "Compute engine JVM max memory (MB)",
                self.jvm_max_memory_mb,
            ),
            (
                "sonarqube_ce_jvm_free_memory_mb",
                "Compute engine JVM free memory (MB)",
                self.jvm_free_memory_mb,
            ),
            (
                "sonarqube_ce_jvm_heap_committed_mb",
                "Compute engine JVM heap committed (MB)",
                self.jvm_heap_committed_mb,
            ),
            (
                "sonarqube_ce_jvm_heap_init_mb",
                "Compute engine JVM heap init (MB)",
                self.jvm_heap_init_mb,
            ),
            (
                "sonarqube_ce_jvm_heap_max_mb",
                "Compute engine JVM heap max (MB)",
                self.jvm_heap_max_mb,
            ),
            (
                "sonarqube_ce_jvm_heap_used_mb",
                "Compute engine JVM heap used (MB)",
                self.jvm_heap_used_mb,
            ),
            (
                "sonarqube_ce_jvm_non_heap_committed_mb",
                "Compute engine JVM non-heap committed (MB)",
                self.jvm_non_heap_committed_mb,
            ),
            (
                "sonarqube_ce_jvm_non_heap_init_mb",
                "Compute engine JVM non-heap init (MB)",
                self.jvm_non_heap_init_mb,
            ),
            (
                "sonarqube_ce_jvm_non_heap_used_mb",
                "Compute engine JVM non-heap used (MB)",
                self.jvm_non_heap_used_mb,
            ),
            ("sonarqube_ce_jvm_threads", "Compute engine JVM thread count", self.jvm_threads),
        ]
    }

    /// Look up a scalar gauge by metric name.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.scalars().iter().find(|(n, _, _)| *n == name).map(|(_, _, v)| *v)
    }

    /// Lines of code for one (project, branch) series.
    pub fn loc_for(&self, project: &str, branch: &str) -> Option<f64> {
        self.loc_by_project
            .get(&(project.to_string(), branch.to_string()))
            .copied()
    }
}
