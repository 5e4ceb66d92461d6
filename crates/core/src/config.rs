//! Application configuration.
//!
//! Values are layered: built-in defaults, then an optional JSON file under the
//! user's config directory, then `FLEET_RENTAL__*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{builder::DefaultState, ConfigBuilder, Environment, File, FileFormat};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::fleet::DEFAULT_CAPACITY;

/// Directory under the platform config dir holding `config.json`.
pub const CONFIG_DIR: &str = "fleet-rental";
/// Prefix for environment overrides, e.g. `FLEET_RENTAL__ADMIN__PASSWORD`.
pub const ENV_PREFIX: &str = "FLEET_RENTAL";

/// Surcharge added to a bill when a vehicle is returned damaged.
pub const DEFAULT_DAMAGE_SURCHARGE: i64 = 5000;

/// Runtime settings for the rental system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the fleet and receipts files.
    pub data_dir: PathBuf,
    /// Fleet file name, relative to `data_dir`.
    pub fleet_file: PathBuf,
    /// Receipts log name, relative to `data_dir`.
    pub receipts_file: PathBuf,
    /// Maximum number of vehicles in the fleet.
    pub fleet_capacity: usize,
    /// Surcharge applied to damaged returns.
    pub damage_surcharge: Decimal,
    /// Administrator login.
    pub admin: AdminCredentials,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            fleet_file: PathBuf::from("fleet.txt"),
            receipts_file: PathBuf::from("receipts.txt"),
            fleet_capacity: DEFAULT_CAPACITY,
            damage_surcharge: Decimal::from(DEFAULT_DAMAGE_SURCHARGE),
            admin: AdminCredentials::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file and the environment.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let config = builder(&path)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to build configuration from {}", path.display()))?
            .try_deserialize()
            .context("failed to deserialize configuration")?;
        Ok(config)
    }

    /// Load configuration from `path` only, ignoring the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = builder(path)
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("failed to deserialize configuration {}", path.display()))?;
        Ok(config)
    }

    /// Settings rooted at `data_dir`, everything else default.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Full path of the fleet file.
    pub fn fleet_path(&self) -> PathBuf {
        self.data_dir.join(&self.fleet_file)
    }

    /// Full path of the receipts log.
    pub fn receipts_path(&self) -> PathBuf {
        self.data_dir.join(&self.receipts_file)
    }
}

/// Administrator username and password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AdminCredentials {
    /// Login name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "password".to_string(),
        }
    }
}

impl AdminCredentials {
    /// Whether the supplied login matches.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

fn builder(path: &Path) -> ConfigBuilder<DefaultState> {
    config::Config::builder().add_source(File::from(path).format(FileFormat::Json).required(false))
}

/// Default location of the configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.json")
}

/// Write the default configuration to [`config_path`] if no file exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    ensure_default_config_at(&path)?;
    Ok(path)
}

/// Write the default configuration to `path` if no file exists there.
pub fn ensure_default_config_at(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let serialized = serde_json::to_string_pretty(&AppConfig::default())
        .context("failed to serialize default configuration")?;
    fs::write(path, serialized)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    info!("wrote default configuration to {}", path.display());
    Ok(())
}
