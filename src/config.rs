use crate::defaults::{
    COLLECTOR_SETTINGS_ENV_FILENAME, CONFIGMAP_PARSER_DIR, CUSTOM_PROMETHEUS_CONFIG_PATH,
    DEBUG_MODE_ENV_FILENAME, DEFAULTS_MERGED_CONFIG_PATH, DEFAULT_PROM_CONFIGS_DIR,
    DEFAULT_SCRAPE_SETTINGS_ENV_FILENAME, INTERVAL_HASH_FILENAME, OTEL_METRICS_ENV_FILENAME,
    POD_ANNOTATION_ENV_FILENAME, PROM_MERGED_CONFIG_PATH, REGEX_HASH_FILENAME,
    RENDERED_PROM_CONFIGS_DIR, SETTINGS_DIR, V2_SETTINGS_FILES, VERSIONS_ENV_FILENAME,
};
use crate::fs::file_reader::{FileReader, FileReaderError};
use crate::registry::Plane;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("error loading config: `{0}`")]
    Read(#[from] FileReaderError),

    #[error("error loading config: `{0}`")]
    SerdeYaml(#[from] serde_yaml::Error),
}

/// Where a composition run reads its inputs from and writes its artifacts to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    pub plane: Plane,
    pub settings_dir: PathBuf,
    /// Custom Prometheus configuration merged on top of the defaults.
    pub custom_config_path: Option<PathBuf>,
    /// Pristine job templates, never modified.
    pub templates_dir: PathBuf,
    /// Staged templates, rewritten in place on every run.
    pub work_dir: PathBuf,
    /// Consolidated v2 settings documents, relative to `settings_dir`.
    pub v2_settings_files: Vec<PathBuf>,
    pub outputs: OutputPaths,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            plane: Plane::default(),
            settings_dir: PathBuf::from(SETTINGS_DIR),
            custom_config_path: Some(PathBuf::from(CUSTOM_PROMETHEUS_CONFIG_PATH)),
            templates_dir: PathBuf::from(DEFAULT_PROM_CONFIGS_DIR),
            work_dir: PathBuf::from(RENDERED_PROM_CONFIGS_DIR),
            v2_settings_files: V2_SETTINGS_FILES.iter().map(PathBuf::from).collect(),
            outputs: OutputPaths::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub defaults_merged: PathBuf,
    pub prom_merged: PathBuf,
    pub regex_hash: PathBuf,
    pub interval_hash: PathBuf,
    pub default_scrape_settings_env: PathBuf,
    pub collector_settings_env: PathBuf,
    pub debug_mode_env: PathBuf,
    pub pod_annotation_env: PathBuf,
    pub otel_metrics_env: PathBuf,
    pub versions_env: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::under(Path::new(CONFIGMAP_PARSER_DIR))
            .with_merged(DEFAULTS_MERGED_CONFIG_PATH, PROM_MERGED_CONFIG_PATH)
    }
}

impl OutputPaths {
    /// Every artifact inside `dir` with its default file name.
    pub fn under(dir: &Path) -> Self {
        Self {
            defaults_merged: dir.join("defaultsMergedConfig.yml"),
            prom_merged: dir.join("promMergedConfig.yml"),
            regex_hash: dir.join(REGEX_HASH_FILENAME),
            interval_hash: dir.join(INTERVAL_HASH_FILENAME),
            default_scrape_settings_env: dir.join(DEFAULT_SCRAPE_SETTINGS_ENV_FILENAME),
            collector_settings_env: dir.join(COLLECTOR_SETTINGS_ENV_FILENAME),
            debug_mode_env: dir.join(DEBUG_MODE_ENV_FILENAME),
            pod_annotation_env: dir.join(POD_ANNOTATION_ENV_FILENAME),
            otel_metrics_env: dir.join(OTEL_METRICS_ENV_FILENAME),
            versions_env: dir.join(VERSIONS_ENV_FILENAME),
        }
    }

    fn with_merged(self, defaults_merged: &str, prom_merged: &str) -> Self {
        Self {
            defaults_merged: PathBuf::from(defaults_merged),
            prom_merged: PathBuf::from(prom_merged),
            ..self
        }
    }
}

impl ComposerConfig {
    /// A configuration rooted at `dir`, with every input and output below it.
    pub fn rooted_at(dir: &Path) -> Self {
        Self {
            settings_dir: dir.join("settings"),
            custom_config_path: Some(dir.join("settings/prometheus/prometheus-config")),
            templates_dir: dir.join("default-prom-configs"),
            work_dir: dir.join("rendered-prom-configs"),
            outputs: OutputPaths::under(&dir.join("out")),
            ..Self::default()
        }
    }
}

pub trait ComposerConfigLoader {
    fn load_config(&self) -> Result<ComposerConfig, ConfigError>;
}

/// Loads a [`ComposerConfig`] from a YAML file. Absent keys keep their
/// defaults.
pub struct ComposerConfigLoaderFile<'a, F: FileReader> {
    reader: &'a F,
    file_path: PathBuf,
}

impl<'a, F: FileReader> ComposerConfigLoaderFile<'a, F> {
    pub fn new(reader: &'a F, file_path: &Path) -> Self {
        Self {
            reader,
            file_path: file_path.to_path_buf(),
        }
    }
}

impl<F: FileReader> ComposerConfigLoader for ComposerConfigLoaderFile<'_, F> {
    fn load_config(&self) -> Result<ComposerConfig, ConfigError> {
        let content = self.reader.read(&self.file_path)?;
        if content.trim().is_empty() {
            return Ok(ComposerConfig::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }
}
