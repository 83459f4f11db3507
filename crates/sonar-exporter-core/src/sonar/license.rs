//! License usage response (`/api/projects/license_usage`).

use serde_json::Value;

use super::fields::{array_or_empty, num_or, str_or};

/// Placeholder used when a project entry has no `projectName`.
pub const UNKNOWN_PROJECT: &str = "unknown_project";
/// Placeholder used when a project entry has no `branch`.
pub const UNKNOWN_BRANCH: &str = "unknown_branch";

/// One entry of the `projects` list.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub branch: String,
    pub lines_of_code: f64,
}

impl Project {
    pub fn from_json(v: &Value) -> Self {
        Self {
            name: str_or(v, &["projectName"], UNKNOWN_PROJECT),
            branch: str_or(v, &["branch"], UNKNOWN_BRANCH),
            lines_of_code: num_or(v, &["linesOfCode"], 0.0),
        }
    }
}

/// Decoded license usage document, in upstream order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LicenseUsage {
    pub projects: Vec<Project>,
}

impl LicenseUsage {
    pub fn from_json(v: &Value) -> Self {
        if v.get("projects").is_none() {
            tracing::debug!("license usage response has no projects field");
        }
        Self {
            projects: array_or_empty(v, &["projects"])
                .iter()
                .map(Project::from_json)
                .collect(),
        }
    }

    /// Sum of lines of code over all entries.
    pub fn total_lines_of_code(&self) -> f64 {
        self.projects.iter().map(|p| p.lines_of_code).sum()
    }
}
