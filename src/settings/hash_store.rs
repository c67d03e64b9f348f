//! Persistence of the per-job keep list and scrape interval lookups.

use crate::fs::file_reader::{FileReader, FileReaderError};
use crate::fs::file_writer::{FileWriter, WriteError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// `<KEY>_METRICS_KEEP_LIST_REGEX` -> effective keep list regex.
pub type RegexHash = BTreeMap<String, String>;
/// `<KEY>_SCRAPE_INTERVAL` -> scrape interval.
pub type IntervalHash = BTreeMap<String, String>;

#[derive(Error, Debug)]
pub enum HashStoreError {
    #[error("error reading hash file: `{0}`")]
    Read(#[from] FileReaderError),

    #[error("error writing hash file: `{0}`")]
    Write(#[from] WriteError),

    #[error("invalid hash file: `{0}`")]
    Serde(#[from] serde_yaml::Error),
}

/// A YAML mapping of strings stored at a fixed path.
#[derive(Debug, Clone, PartialEq)]
pub struct HashFile {
    path: PathBuf,
}

impl HashFile {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn persist<W: FileWriter>(
        &self,
        writer: &W,
        hash: &BTreeMap<String, String>,
    ) -> Result<(), HashStoreError> {
        let content = serde_yaml::to_string(hash)?;
        Ok(writer.write(&self.path, content)?)
    }

    pub fn load<F: FileReader>(&self, reader: &F) -> Result<BTreeMap<String, String>, HashStoreError> {
        let content = reader.read(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_yaml::from_str(&content)?)
    }
}
