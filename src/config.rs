//! Startup configuration: page settings and the dataset source mode.

use crate::data::DatasetLocator;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "qualsteam_viewer.toml";

/// Where trial files come from. Exactly one mode per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Local {
        #[serde(default = "default_data_dir")]
        dir: PathBuf,
    },
    Remote {
        base_url: String,
        files: Vec<String>,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Local {
            dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// One-time page configuration, fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub page_title: String,
    pub site_name: String,
    pub subtitle: String,
    pub window_size: [f32; 2],
    pub source: SourceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_title: "QualSteam Dashboard".to_string(),
            site_name: "Zydus LifeSciences, Ahmedabad.".to_string(),
            subtitle: "Customer Trial Data".to_string(),
            window_size: [1400.0, 900.0],
            source: SourceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = Self::from_toml(&text).with_context(|| format!("parsing {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn locator(&self) -> DatasetLocator {
        match &self.source {
            SourceConfig::Local { dir } => DatasetLocator::LocalDirectoryScan { dir: dir.clone() },
            SourceConfig::Remote { base_url, files } => DatasetLocator::RemoteListing {
                base_url: base_url.clone(),
                files: files.clone(),
            },
        }
    }
}
