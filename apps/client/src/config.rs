//! Client configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/scrimsync/client.toml`
//! - Windows: `%APPDATA%/scrimsync/client.toml`

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use scrimsync_protocol::types::UploadMode;

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Whether finished captures upload automatically or wait for an
    /// explicit user action.
    #[serde(default)]
    pub mode: UploadMode,

    /// Upload rate limit in KiB/s, forwarded to the transfer engine
    /// unchanged. 0 means unlimited.
    #[serde(default)]
    pub bandwidth_cap: u32,

    /// Path of the in-flight upload state file. Defaults next to the
    /// config file.
    #[serde(default)]
    pub state_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            mode: UploadMode::Automatic,
            bandwidth_cap: 0,
            state_file: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: ClientConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = ClientConfig::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Resolved state file path.
    pub fn state_file_path(&self) -> anyhow::Result<PathBuf> {
        match &self.state_file {
            Some(p) => Ok(p.clone()),
            None => {
                let mut path = config_path()?;
                path.set_file_name("upload-state.json");
                Ok(path)
            }
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("scrimsync")
            .join("client.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("scrimsync").join("client.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/scrimsync/client.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.mode, UploadMode::Automatic);
        assert_eq!(config.bandwidth_cap, 0);
        assert!(config.state_file.is_none());
    }

    #[test]
    fn toml_roundtrip() {
        let config = ClientConfig {
            mode: UploadMode::Manual,
            bandwidth_cap: 512,
            state_file: Some(PathBuf::from("/tmp/state.json")),
        };
        let content = toml::to_string_pretty(&config).unwrap();
        let parsed: ClientConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed.mode, UploadMode::Manual);
        assert_eq!(parsed.bandwidth_cap, 512);
        assert_eq!(parsed.state_file, Some(PathBuf::from("/tmp/state.json")));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let parsed: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.mode, UploadMode::Automatic);
        assert_eq!(parsed.bandwidth_cap, 0);
    }

    #[test]
    fn explicit_state_file_wins() {
        let config = ClientConfig {
            state_file: Some(PathBuf::from("/var/lib/scrimsync/state.json")),
            ..ClientConfig::default()
        };
        assert_eq!(
            config.state_file_path().unwrap(),
            PathBuf::from("/var/lib/scrimsync/state.json")
        );
    }
}
