//! `loadgrid.toml` discovery and loading

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use loadgrid_core::Settings;

/// File looked up in the working directory when `--config` is not given
pub const CONFIG_FILE: &str = "loadgrid.toml";

/// Load settings.
///
/// Searches in order:
/// 1. Explicit config path (must exist)
/// 2. ./loadgrid.toml
///
/// Falls back to defaults when neither is present.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    if let Some(path) = config_path {
        if !path.exists() {
            bail!("Config file {} does not exist", path.display());
        }
        return parse_settings_file(path);
    }

    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return parse_settings_file(&local);
    }

    tracing::debug!("No {CONFIG_FILE} found, using defaults");
    Ok(Settings::default())
}

fn parse_settings_file(path: &Path) -> Result<Settings> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let settings = parse_settings(&content).with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Parse and validate a settings document
pub fn parse_settings(content: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(content).context("Failed to parse TOML")?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(parse_settings("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let settings = parse_settings(
            r#"
            [workload]
            available_capacity = 55.0

            [timeline]
            start = "2025-03"
            "#,
        )
        .unwrap();
        assert_eq!(settings.workload.available_capacity, 55.0);
        assert_eq!(settings.workload.full_time_effort, 4.0);
        assert_eq!(settings.start().to_string(), "2025-03");
        assert_eq!(settings.timeline.capacity_months, 6);
    }

    #[test]
    fn rejects_non_positive_thresholds() {
        let err = parse_settings("[workload]\nfull_time_effort = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("full_time_effort"), "{err}");
    }

    #[test]
    fn rejects_bad_start_month() {
        assert!(parse_settings("[timeline]\nstart = \"2025-13\"\n").is_err());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_settings(Some(Path::new("/nonexistent/loadgrid.toml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
