//! Application configuration read from an optional TOML file.
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the snapshot blob shared between devices.
pub const DEFAULT_REMOTE_FILE_NAME: &str = "kian_app_data.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Local SQLite database.
    pub database_path: PathBuf,
    /// Directory holding the remote snapshot (e.g. a cloud-synced folder).
    pub remote_dir: PathBuf,
    pub remote_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("study_companion.sqlite3"),
            remote_dir: PathBuf::from("sync"),
            remote_file_name: DEFAULT_REMOTE_FILE_NAME.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn remote_path(&self) -> PathBuf {
        self.remote_dir.join(&self.remote_file_name)
    }
}
