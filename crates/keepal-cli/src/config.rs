//! Configuration handling.
//!
//! Settings come from command-line flags and the environment first, then
//! from `~/.config/keepal/keepal.toml`. Everything is resolved once into a
//! [`Config`] before any database work starts.

use anyhow::{Context, Result};
use keepal_core::{Credential, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the database path.
pub const ENV_DATABASE: &str = "keepassxc_db_path";
/// Environment variable holding the key-file path.
pub const ENV_KEYFILE: &str = "keepassxc_keyfile_path";
/// Environment variable holding the master password.
pub const ENV_PASSWORD: &str = "keepassxc_master_password";

/// Contents of the optional configuration file.
///
/// The master password is deliberately not a file setting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Path to the KeePass database file.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// Path to a key file used together with, or instead of, the password.
    #[serde(default)]
    pub keyfile_path: Option<PathBuf>,
}

impl FileConfig {
    /// Load the configuration file.
    ///
    /// If `custom_path` is provided it must exist. Otherwise the default
    /// location is used, and a missing file just means no file settings.
    pub fn load(custom_path: Option<&Path>) -> Result<Self> {
        let config_path = match custom_path {
            Some(path) => path.to_path_buf(),
            None => match Self::config_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !config_path.exists() {
            if custom_path.is_some() {
                anyhow::bail!("Config file not found: {}", config_path.display());
            }
            tracing::debug!("No config file at {}", config_path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: FileConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        tracing::debug!("Loaded config from {}: {:?}", config_path.display(), config);
        Ok(config)
    }

    /// Get the path to the default config file.
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("keepal").join("keepal.toml"))
    }
}

/// Values taken from flags or the environment; they win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database_path: Option<PathBuf>,
    pub keyfile_path: Option<PathBuf>,
    pub master_password: Option<String>,
}

/// Fully resolved settings for one invocation.
#[derive(Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub keyfile_path: Option<PathBuf>,
    master_password: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("keyfile_path", &self.keyfile_path)
            .field("master_password", &(!self.master_password.is_empty()).then_some("<set>"))
            .finish()
    }
}

fn non_empty_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

impl Config {
    /// Merge overrides with file settings. A database path is required.
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Result<Self, Error> {
        let database_path = non_empty_path(overrides.database_path)
            .or_else(|| non_empty_path(file.database_path))
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "no database configured (set {ENV_DATABASE}, pass --database or add database_path to the config file)"
                ))
            })?;

        let keyfile_path =
            non_empty_path(overrides.keyfile_path).or_else(|| non_empty_path(file.keyfile_path));

        let master_password = overrides
            .master_password
            .map(|p| p.trim().to_string())
            .unwrap_or_default();

        Ok(Self {
            database_path,
            keyfile_path,
            master_password,
        })
    }

    /// Build the unlock credential from the password and key file.
    pub fn credential(&self) -> Result<Credential, Error> {
        let keyfile = self
            .keyfile_path
            .as_deref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        Credential::resolve(&self.master_password, &keyfile)
    }
}
