//! Persistent user preferences and their disk representation.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    core::errors::{FinanceError, Result},
    utils::{app_data_dir, ensure_dir, tmp_path, write_atomic},
};

const CONFIG_FILE: &str = "config.json";
const BOOKS_DIR: &str = "books";
const BACKUPS_DIR: &str = "backups";

/// User-facing preferences persisted between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_book: Option<String>,
    /// Optional custom root for book and backup storage. Defaults to the
    /// application data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_root: Option<PathBuf>,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            currency: "BRL".into(),
            default_book: None,
            data_root: None,
            backup_retention: Self::default_backup_retention(),
        }
    }
}

impl Config {
    fn default_backup_retention() -> usize {
        5
    }

    pub fn resolve_data_root(&self) -> PathBuf {
        self.data_root.clone().unwrap_or_else(app_data_dir)
    }

    pub fn books_dir(&self) -> PathBuf {
        self.resolve_data_root().join(BOOKS_DIR)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.resolve_data_root().join(BACKUPS_DIR)
    }
}

/// Loads and saves [`Config`] as JSON with atomic replacement.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// A missing file loads as defaults; a corrupt one is a config error.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| FinanceError::Config(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| FinanceError::Config(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
