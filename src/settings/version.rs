use crate::defaults::{
    CONFIG_VERSION_FILE, ENV_FILE_VERSION, ENV_SCHEMA_VERSION, MAX_VERSION_LENGTH,
    SCHEMA_VERSION_FILE,
};
use crate::environment::PodEnvironment;
use crate::fs::file_reader::{FileReader, FileReaderError};
use crate::settings::env_file::EnvFile;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Layout of the mounted settings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// One file per section.
    V1,
    /// Consolidated files, one string blob per section.
    V2,
    /// Nothing usable is mounted, every concern keeps its defaults.
    #[default]
    Nil,
}

impl SchemaVersion {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "v1" => SchemaVersion::V1,
            "v2" => SchemaVersion::V2,
            _ => SchemaVersion::Nil,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVersion::V1 => write!(f, "v1"),
            SchemaVersion::V2 => write!(f, "v2"),
            SchemaVersion::Nil => write!(f, ""),
        }
    }
}

/// Versions found on the settings mount, as written to the versions env file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Versions {
    pub schema: SchemaVersion,
    pub schema_value: String,
    pub config_value: String,
}

impl Versions {
    /// The schema file wins over `AZMON_AGENT_CFG_SCHEMA_VERSION`.
    pub fn read<F: FileReader>(reader: &F, settings_dir: &Path, env: &PodEnvironment) -> Self {
        let schema_value = read_version_file(reader, &settings_dir.join(SCHEMA_VERSION_FILE))
            .unwrap_or_else(|| sanitize_version(env.get_or_empty(ENV_SCHEMA_VERSION)));
        let config_value =
            read_version_file(reader, &settings_dir.join(CONFIG_VERSION_FILE)).unwrap_or_default();

        let schema = SchemaVersion::parse(&schema_value);
        debug!(schema = %schema, config_version = %config_value, "settings versions resolved");

        Self {
            schema,
            schema_value,
            config_value,
        }
    }

    pub fn to_env_file(&self) -> EnvFile {
        let mut env_file = EnvFile::default();
        env_file.push(ENV_SCHEMA_VERSION, &self.schema_value);
        env_file.push(ENV_FILE_VERSION, &self.config_value);
        env_file
    }
}

/// Trimmed content of a version file without inner spaces, at most
/// ten characters long. `None` when the file is absent or empty.
fn read_version_file<F: FileReader>(reader: &F, path: &Path) -> Option<String> {
    match reader.read(path) {
        Ok(content) => Some(sanitize_version(&content)).filter(|v| !v.is_empty()),
        Err(FileReaderError::NotFound(_)) => None,
        Err(err) => {
            warn!(path = %path.display(), "unable to read version file: {err}");
            None
        }
    }
}

fn sanitize_version(value: &str) -> String {
    value
        .trim()
        .replace(' ', "")
        .chars()
        .take(MAX_VERSION_LENGTH)
        .collect()
}
