//! # Application Configuration
//!
//! Settings live in `nownext.yaml` at the root of the data directory:
//!
//! ```yaml
//! storage_key: allboards
//! storage_backend: sqlite
//! session:
//!   slots: [Activity]
//!   autosave: true
//!   exit_confirmation: prompt
//! week_length: 7
//! logging:
//!   level: info
//! ```
//!
//! Every field is optional. A missing file means all defaults.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use shared::Slot;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::navigation_guard::ExitConfirmation;
use crate::domain::session::SessionOptions;
use crate::domain::week_overview::DEFAULT_WEEK_LENGTH;
use crate::storage::DEFAULT_STORAGE_KEY;

pub const CONFIG_FILE: &str = "nownext.yaml";

/// Folder name under the user's documents directory
const DATA_DIRECTORY_NAME: &str = "Now Next";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    File,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub slots: Vec<Slot>,
    pub autosave: bool,
    pub exit_confirmation: ExitConfirmation,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let options = SessionOptions::default();
        Self {
            slots: options.slots,
            autosave: options.autosave,
            exit_confirmation: ExitConfirmation::default(),
        }
    }
}

impl SessionConfig {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            slots: self.slots.clone(),
            autosave: self.autosave,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the config, the board database and imported photos live. Taken
    /// from the location the file was loaded from, never written to it.
    #[serde(skip)]
    pub data_directory: PathBuf,
    pub storage_key: String,
    pub storage_backend: StorageBackend,
    pub session: SessionConfig,
    pub week_length: u32,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_backend: StorageBackend::default(),
            session: SessionConfig::default(),
            week_length: DEFAULT_WEEK_LENGTH,
            logging: LoggingConfig::default(),
        }
    }
}

/// `~/Documents/Now Next`, or under the home directory when there is no
/// documents folder
pub fn default_data_directory() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(DATA_DIRECTORY_NAME)
}

impl AppConfig {
    /// Defaults rooted at `data_directory`
    pub fn with_data_directory(data_directory: impl Into<PathBuf>) -> Self {
        Self {
            data_directory: data_directory.into(),
            ..Self::default()
        }
    }

    /// Load from the default data directory
    pub fn load() -> Result<Self> {
        Self::load_from_directory(&default_data_directory())
    }

    pub fn load_from_directory(data_directory: &Path) -> Result<Self> {
        let config_path = data_directory.join(CONFIG_FILE);
        if !config_path.exists() {
            debug!("No config at {:?}, using defaults", config_path);
            return Ok(Self::with_data_directory(data_directory));
        }

        let yaml_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {:?}", config_path))?;
        let mut config: AppConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse {:?}", config_path))?;
        config.data_directory = data_directory.to_path_buf();
        config.validate()?;

        debug!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Write to `<data_directory>/nownext.yaml` via a temp file
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        if !self.data_directory.exists() {
            fs::create_dir_all(&self.data_directory)?;
            info!("Created data directory: {:?}", self.data_directory);
        }

        let config_path = self.config_path();
        let yaml_content = serde_yaml::to_string(self)?;
        let temp_path = config_path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &config_path)?;

        debug!("Saved config to {:?}", config_path);
        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_directory.join(CONFIG_FILE)
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            bail!("storage_key must not be empty");
        }
        if !self.session.slots.contains(&Slot::Activity) {
            bail!("session.slots must include the Activity slot");
        }
        let mut seen = Vec::with_capacity(self.session.slots.len());
        for slot in &self.session.slots {
            if seen.contains(slot) {
                bail!("session.slots lists {} twice", slot);
            }
            seen.push(*slot);
        }
        if self.week_length == 0 {
            bail!("week_length must be at least 1");
        }
        Ok(())
    }
}
