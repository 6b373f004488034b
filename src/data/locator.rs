//! Dataset Locator Module
//! Lists known trial files and resolves a selection to a readable source.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Extension of trial files discovered by a directory scan.
pub const TRIAL_EXTENSION: &str = "csv";

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),
    #[error("Failed to list {dir}: {source}")]
    ListingFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Dataset unavailable: {0}")]
    SourceUnavailable(String),
}

/// Where the bytes of one dataset live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRef {
    Path(PathBuf),
    Url(String),
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::Path(p) => write!(f, "{}", p.display()),
            SourceRef::Url(u) => f.write_str(u),
        }
    }
}

impl SourceRef {
    /// Read the whole source into memory.
    pub fn fetch(&self) -> Result<Vec<u8>, LocatorError> {
        let bytes = match self {
            SourceRef::Path(path) => fs::read(path)
                .map_err(|e| LocatorError::SourceUnavailable(format!("{}: {e}", path.display())))?,
            SourceRef::Url(url) => reqwest::blocking::get(url)
                .and_then(|resp| resp.error_for_status())
                .and_then(|resp| resp.bytes())
                .map_err(|e| LocatorError::SourceUnavailable(format!("{url}: {e}")))?
                .to_vec(),
        };
        debug!(source = %self, bytes = bytes.len(), "fetched dataset");
        Ok(bytes)
    }
}

/// Deployment mode, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocator {
    /// Fixed identifiers resolved against a static base URL, listed in configured order.
    RemoteListing { base_url: String, files: Vec<String> },
    /// `*.csv` files in a local directory, listed lexicographically.
    LocalDirectoryScan { dir: PathBuf },
}

impl DatasetLocator {
    /// Identifiers available for selection, in display order.
    pub fn list(&self) -> Result<Vec<String>, LocatorError> {
        match self {
            DatasetLocator::RemoteListing { files, .. } => Ok(files.clone()),
            DatasetLocator::LocalDirectoryScan { dir } => {
                let names = scan_dir(dir)?;
                info!(dir = %dir.display(), count = names.len(), "scanned dataset directory");
                Ok(names)
            }
        }
    }

    /// Resolve a selected identifier. The identifier must be one [`list`](Self::list) returns.
    pub fn resolve(&self, id: &str) -> Result<SourceRef, LocatorError> {
        if !self.list()?.iter().any(|known| known == id) {
            return Err(LocatorError::UnknownDataset(id.to_string()));
        }
        let source = match self {
            DatasetLocator::RemoteListing { base_url, .. } => SourceRef::Url(join_url(base_url, id)),
            DatasetLocator::LocalDirectoryScan { dir } => SourceRef::Path(dir.join(id)),
        };
        debug!(id, %source, "resolved dataset");
        Ok(source)
    }

    /// Short description for the sidebar.
    pub fn describe(&self) -> String {
        match self {
            DatasetLocator::RemoteListing { base_url, .. } => base_url.clone(),
            DatasetLocator::LocalDirectoryScan { dir } => dir.display().to_string(),
        }
    }

    pub fn is_rescannable(&self) -> bool {
        matches!(self, DatasetLocator::LocalDirectoryScan { .. })
    }
}

fn scan_dir(dir: &Path) -> Result<Vec<String>, LocatorError> {
    let listing_failed = |source: std::io::Error| LocatorError::ListingFailed {
        dir: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(listing_failed)? {
        let entry = entry.map_err(listing_failed)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(TRIAL_EXTENSION) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

fn join_url(base: &str, id: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{id}")
    } else {
        format!("{base}/{id}")
    }
}
