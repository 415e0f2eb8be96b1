//! Viewer configuration
//!
//! Precedence, highest first: explicit CLI values, `DW_DATA_DIR`, the JSON
//! config file, built-in defaults.

use crate::error::{ReportError, Result};
use crate::extract::ExtractKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "DW_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Directory holding the view exports.
    pub data_dir: PathBuf,

    /// File-name overrides per logical extract name.
    pub files: BTreeMap<ExtractKind, String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            files: BTreeMap::new(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ReportError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Build the effective configuration from the optional file, environment
    /// and an optional CLI data directory.
    pub fn resolve(config_file: Option<&Path>, cli_data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir.trim());
            }
        }

        if let Some(dir) = cli_data_dir {
            config.data_dir = dir;
        }

        Ok(config)
    }

    pub fn file_name(&self, kind: ExtractKind) -> &str {
        self.files
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_file_name())
    }
}
