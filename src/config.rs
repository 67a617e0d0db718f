//! Configuration file handling.
//!
//! The configuration file is stored at `$POCKETBOOK_HOME/config.json` and holds the base
//! URL of the REST backend. The home directory also holds `storage.json`, the durable
//! key-value store.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "pocketbook";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const STORAGE_JSON: &str = "storage.json";

/// The `Config` object represents the configuration of the app. You instantiate it by
/// providing the path to `$POCKETBOOK_HOME` and from there it loads
/// `$POCKETBOOK_HOME/config.json`. It provides the paths to the other files expected in the
/// home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    storage_path: PathBuf,
    config_file: ConfigFile,
    api_base_url: Url,
}

impl Config {
    /// Creates the home directory and an initial `config.json` pointing at `api_base_url`.
    ///
    /// # Errors
    /// - Returns an error if `api_base_url` is not a valid absolute URL.
    /// - Returns an error if any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>, api_base_url: &str) -> Result<Self> {
        let api_base_url = parse_base_url(api_base_url)?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the pocketbook home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_base_url: api_base_url.to_string(),
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            storage_path: root.join(STORAGE_JSON),
            root,
            config_path,
            config_file,
            api_base_url,
        })
    }

    /// Validates that the home directory and config file exist, then loads the config.
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Pocketbook home is missing, run 'pocketbook init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let api_base_url = parse_base_url(&config_file.api_base_url)?;

        Ok(Self {
            storage_path: root.join(STORAGE_JSON),
            root,
            config_path,
            config_file,
            api_base_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Path of the durable key-value store file.
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "pocketbook",
///   "config_version": 1,
///   "api_base_url": "http://localhost:8000"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "pocketbook"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the REST backend, e.g. http://localhost:8000
    api_base_url: String,
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it was written by a
    /// different application.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

/// Parses and sanity-checks the backend base URL.
fn parse_base_url(s: &str) -> Result<Url> {
    let url = Url::parse(s).with_context(|| format!("Invalid API base URL '{s}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Invalid API base URL '{s}': expected an http or https URL");
    }
    Ok(url)
}
