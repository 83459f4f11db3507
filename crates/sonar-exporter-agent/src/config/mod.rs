//! Exporter config loader.
//!
//! Two sources, checked in order:
//! - a YAML file named by `SONAR_EXPORTER_CONFIG` (strict parsing)
//! - `SONARQUBE_URL` / `SONARQUBE_TOKEN` environment variables, with a `.env`
//!   file (if present) filling in whatever the process environment lacks

pub mod schema;

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use sonar_exporter_core::error::{ExporterError, Result};

pub use schema::{ExporterConfig, SonarSection};

/// Env var naming a YAML config file.
pub const CONFIG_PATH_ENV: &str = "SONAR_EXPORTER_CONFIG";
/// Env var holding the SonarQube base URL.
pub const URL_ENV: &str = "SONARQUBE_URL";
/// Env var holding the bearer token.
pub const TOKEN_ENV: &str = "SONARQUBE_TOKEN";

pub fn load() -> Result<ExporterConfig> {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        return load_from_file(&path);
    }
    // dotenvy never overrides variables already set in the process.
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded env file"),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(ExporterError::Config(format!("invalid env file: {e}"))),
    }
    load_from_env()
}

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ExporterError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    serde_yaml::from_str(s).map_err(|e| ExporterError::Config(format!("invalid yaml: {e}")))
}

pub fn load_from_env() -> Result<ExporterConfig> {
    load_from_vars(|key| env::var(key).ok())
}

/// Read `SONARQUBE_URL` / `SONARQUBE_TOKEN` from one env file only,
/// without touching the process environment.
pub fn load_from_env_file(path: &Path) -> Result<ExporterConfig> {
    let invalid = |e: dotenvy::Error| {
        ExporterError::Config(format!("invalid env file ({}): {e}", path.display()))
    };
    let mut vars = HashMap::new();
    for item in dotenvy::from_path_iter(path).map_err(invalid)? {
        let (key, value) = item.map_err(invalid)?;
        vars.insert(key, value);
    }
    load_from_vars(|key| vars.get(key).cloned())
}

/// Build a config from an arbitrary key lookup (env in production, a map in tests).
pub fn load_from_vars(get: impl Fn(&str) -> Option<String>) -> Result<ExporterConfig> {
    let required = |key: &str| {
        get(key).ok_or_else(|| ExporterError::Config(format!("{key} is not set")))
    };
    Ok(ExporterConfig::from_sonar(SonarSection {
        base_url: required(URL_ENV)?,
        token: required(TOKEN_ENV)?,
    }))
}
