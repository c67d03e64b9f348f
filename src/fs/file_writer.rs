use super::LocalFile;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tracing::instrument;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("error creating directory `{0}`: `{1}`")]
    ErrorCreatingDirectory(String, io::Error),

    #[error("error creating file: `{0}`")]
    ErrorCreatingFile(#[from] io::Error),
}

pub trait FileWriter {
    /// Replace the whole content of `path`, creating missing parent directories.
    fn write(&self, path: &Path, content: String) -> Result<(), WriteError>;
}

impl FileWriter for LocalFile {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn write(&self, path: &Path, content: String) -> Result<(), WriteError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                WriteError::ErrorCreatingDirectory(parent.display().to_string(), err)
            })?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}
