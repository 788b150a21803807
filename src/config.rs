// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Run configuration. Everything has a default that reproduces the plain
/// script invocation; a `config.yaml` next to the binary or CLI flags can
/// override individual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Newline-delimited URL list, one job posting per line.
    pub input_path: PathBuf,
    /// Report destination. The extension picks the format (`.csv` or `.xlsx`).
    pub output_path: PathBuf,
    /// Hosts that block headless sessions get a visible browser instead.
    /// Matched as a substring of the URL.
    pub headful_hosts: Vec<String>,
    /// Stamp each row with the run date in an "Applied Date" column.
    pub applied_date: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("job_links.txt"),
            output_path: PathBuf::from("extracted_jobs.xlsx"),
            headful_hosts: vec!["workday".to_string()],
            applied_date: true,
        }
    }
}

impl AppConfig {
    /// Load configuration. An explicitly given path must exist and parse;
    /// otherwise `config.yaml` is used when present, and built-in defaults
    /// when not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::load_from_file(path)
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    info!("Loading configuration from {}", default_path.display());
                    Self::load_from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}
