use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const APP_NAME: &str = "salon";
const CONFIG_FILE: &str = "config.json";
const SNAPSHOT_FILE: &str = "services.json";

/// What happens to an entity that fails field validation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionPolicy {
    /// The entity is created and linked but left out of its extent.
    #[default]
    KeepUnadmitted,
    /// The operation fails with `ValidationFailed` before anything is linked.
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SalonConfig {
    /// Years of experience a master needs before it may train others.
    pub top_master_min_experience: u32,
    pub admission: AdmissionPolicy,
    /// Where `salon export` writes the service extent. Defaults to the
    /// platform data directory.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for SalonConfig {
    fn default() -> Self {
        Self {
            top_master_min_experience: 5,
            admission: AdmissionPolicy::KeepUnadmitted,
            snapshot_path: None,
        }
    }
}

impl SalonConfig {
    /// Load configuration from the user's config directory.
    /// Returns default config if file doesn't exist or fails to parse.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save the current configuration to disk.
    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// The configured snapshot file, or `services.json` in the data directory.
    pub fn snapshot_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.snapshot_path {
            return Ok(path.clone());
        }
        let dirs = directories::ProjectDirs::from("", "", APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join(SNAPSHOT_FILE))
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: SalonConfig =
            serde_json::from_str(r#"{ "admission": "reject" }"#).unwrap();
        assert_eq!(config.admission, AdmissionPolicy::Reject);
        assert_eq!(config.top_master_min_experience, 5);
        assert!(config.snapshot_path.is_none());
    }

    #[test]
    fn test_explicit_snapshot_path_wins() {
        let config = SalonConfig {
            snapshot_path: Some(PathBuf::from("/tmp/salon/services.json")),
            ..SalonConfig::default()
        };
        assert_eq!(
            config.snapshot_path().unwrap(),
            PathBuf::from("/tmp/salon/services.json")
        );
    }
}
