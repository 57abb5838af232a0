//! Project configuration file support for greenroom.
//!
//! Loads configuration from `greenroom.toml` in the working directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Project-level configuration loaded from `greenroom.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Default oracle backend (claude, opencode, scripted)
    pub oracle: Option<String>,
    /// Default model (if the oracle supports it)
    pub model: Option<String>,
    /// Default number of questions per interview
    pub question_limit: Option<usize>,
    /// Timeout per oracle call, in seconds
    pub timeout_secs: Option<u64>,
    /// Where to write evaluation reports (defaults to the platform data dir)
    pub reports_dir: Option<PathBuf>,
    /// Append events as JSON lines to this file, in addition to the console
    pub log_file: Option<PathBuf>,
}

/// The config file name
pub const CONFIG_FILE_NAME: &str = "greenroom.toml";

impl ProjectConfig {
    /// Load configuration from the working directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        let config_path = working_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: ProjectConfig = toml::from_str(
            r#"
oracle = "scripted"
model = "sonnet"
question_limit = 4
timeout_secs = 60
reports_dir = "/tmp/reports"
log_file = "/tmp/greenroom.jsonl"
"#,
        )
        .unwrap();
        assert_eq!(config.oracle.as_deref(), Some("scripted"));
        assert_eq!(config.question_limit, Some(4));
        assert_eq!(config.timeout_secs, Some(60));
        assert!(config.log_file.is_some());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<ProjectConfig, _> = toml::from_str("questions = 4");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(ProjectConfig::load(dir.path()).unwrap().is_none());
    }
}
