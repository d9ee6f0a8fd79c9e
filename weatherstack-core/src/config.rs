use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    request::Units,
    transport::http::{HTTP_BASE_URL, HTTPS_BASE_URL},
};

/// Settings stored on disk.
///
/// Example TOML:
/// ```toml
/// access_key = "..."
/// https = true
/// units = "m"
/// language = "en"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub access_key: Option<String>,

    /// Paid plans only.
    #[serde(default)]
    pub https: bool,

    /// Overrides the weatherstack host, e.g. for a proxy.
    pub base_url: Option<String>,

    /// Defaults used when a request leaves them unset.
    pub units: Option<Units>,
    pub language: Option<String>,
}

impl Config {
    /// Returns the access key, or an error telling the user how to set one.
    pub fn access_key(&self) -> Result<&str> {
        self.access_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No weatherstack access key configured.\n\
                 Hint: run `weatherstack configure` and enter your access key."
            )
        })
    }

    pub fn set_access_key(&mut self, access_key: String) {
        self.access_key = Some(access_key.trim().to_string());
    }

    pub fn is_configured(&self) -> bool {
        self.access_key().is_ok()
    }

    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None if self.https => HTTPS_BASE_URL.to_string(),
            None => HTTP_BASE_URL.to_string(),
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "weatherstack", "weatherstack-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
