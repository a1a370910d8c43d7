//! Typed settings persisted in `.gitr/config.json`.
//!
//! The recognized keys form the closed enum [`ConfigKey`]; string keys coming
//! from the command line are converted once through `FromStr`, which is the
//! only place an unknown key is rejected.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::workspace::persist::{read_json_object, write_json};

/// File name of the config record inside the marker directory.
pub const CONFIG_FILE: &str = "config.json";

/// Environment override for `api.url` (interpreter only, never persisted).
pub const API_URL_ENV: &str = "GITR_API_URL";

/// Environment override for `api.key` (interpreter only, never persisted).
pub const API_KEY_ENV: &str = "GITR_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ApiUrl,
    ApiKey,
    RemoteUrl,
    RemoteRepoId,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::ApiUrl,
        ConfigKey::ApiKey,
        ConfigKey::RemoteUrl,
        ConfigKey::RemoteRepoId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::ApiUrl => "api.url",
            ConfigKey::ApiKey => "api.key",
            ConfigKey::RemoteUrl => "remote.url",
            ConfigKey::RemoteRepoId => "remote.repo_id",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownKey(s.to_string()))
    }
}

/// Command interpreter endpoint settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub url: String,
    pub key: String,
}

/// Remote sync service settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub url: String,
    pub repo_id: String,
}

impl RemoteSettings {
    /// Repository id, required by push and pull but not by repository creation.
    pub fn require_repo_id(&self) -> Result<&str> {
        if self.repo_id.is_empty() {
            return Err(Error::RemoteNotConfigured {
                key: ConfigKey::RemoteRepoId,
            });
        }
        Ok(&self.repo_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiSettings,
    pub remote: RemoteSettings,
}

impl Config {
    pub fn get(&self, key: ConfigKey) -> &str {
        match key {
            ConfigKey::ApiUrl => &self.api.url,
            ConfigKey::ApiKey => &self.api.key,
            ConfigKey::RemoteUrl => &self.remote.url,
            ConfigKey::RemoteRepoId => &self.remote.repo_id,
        }
    }

    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) {
        let slot = match key {
            ConfigKey::ApiUrl => &mut self.api.url,
            ConfigKey::ApiKey => &mut self.api.key,
            ConfigKey::RemoteUrl => &mut self.remote.url,
            ConfigKey::RemoteRepoId => &mut self.remote.repo_id,
        };
        *slot = value.into();
    }

    /// Check that the command interpreter credentials are present.
    pub fn validate(&self) -> Result<()> {
        for key in [ConfigKey::ApiUrl, ConfigKey::ApiKey] {
            if self.get(key).is_empty() {
                return Err(Error::ConfigIncomplete { key });
            }
        }
        Ok(())
    }

    /// Copy with `GITR_API_URL` / `GITR_API_KEY` applied on top.
    pub fn with_env_overrides(&self) -> Config {
        let mut effective = self.clone();
        for (key, var) in [
            (ConfigKey::ApiUrl, API_URL_ENV),
            (ConfigKey::ApiKey, API_KEY_ENV),
        ] {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    debug!("Using {} from {}", key, var);
                    effective.set(key, value);
                }
            }
        }
        effective
    }
}

/// Load/save access to `config.json` under a workspace marker directory.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(marker_dir: &Path) -> Self {
        Self {
            path: marker_dir.join(CONFIG_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, returning defaults when the file does not exist yet.
    pub fn load(&self) -> Result<Config> {
        read_json_object(&self.path)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        write_json(&self.path, config)
    }

    /// Load-modify-save; last writer wins.
    pub fn set(&self, key: ConfigKey, value: &str) -> Result<()> {
        let mut config = self.load()?;
        config.set(key, value);
        self.save(&config)?;
        debug!("Set {} in {}", key, self.path().display());
        Ok(())
    }

    pub fn get(&self, key: ConfigKey) -> Result<String> {
        Ok(self.load()?.get(key).to_string())
    }

    /// Effective interpreter settings: the stored config with environment
    /// overrides applied, checked for `api.url` and `api.key`.
    pub fn validate(&self) -> Result<Config> {
        let effective = self.load()?.with_env_overrides();
        effective.validate()?;
        Ok(effective)
    }
}
