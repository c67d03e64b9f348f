use super::LocalFile;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileReaderError {
    #[error("file not found or not a file: `{0}`")]
    NotFound(String),

    #[error("error reading contents: `{0}`")]
    Read(#[from] io::Error),
}

pub trait FileReader {
    /// Read the contents of file_path and return them as string.
    ///
    /// A missing file is reported as `FileReaderError::NotFound` so callers can
    /// fall back to defaults without inspecting io error kinds.
    fn read(&self, file_path: &Path) -> Result<String, FileReaderError>;
}

impl FileReader for LocalFile {
    fn read(&self, file_path: &Path) -> Result<String, FileReaderError> {
        if !file_path.is_file() {
            return Err(FileReaderError::NotFound(file_path.display().to_string()));
        }
        Ok(fs::read_to_string(file_path)?)
    }
}
