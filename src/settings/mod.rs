//! Ingestion of the mounted agent settings.
//!
//! Every concern degrades to its defaults on its own: a missing file, a
//! malformed section or an invalid value is logged and never stops the other
//! concerns from being resolved.

pub mod collector;
pub mod enablement;
pub mod env_file;
pub mod features;
pub mod hash_store;
pub mod interval;
pub mod keep_list;
pub mod sections;
pub mod version;

use crate::environment::PodEnvironment;
use crate::fs::file_reader::{FileReader, FileReaderError};
use crate::registry::selection::{Enablement, SelectionContext};
use crate::registry::JobRegistry;
use crate::yaml::YamlError;
use collector::CollectorSettings;
use env_file::EnvFile;
use hash_store::{IntervalHash, RegexHash};
use sections::Sections;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use version::Versions;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("error reading settings: `{0}`")]
    Read(#[from] FileReaderError),

    #[error("invalid toml: `{0}`")]
    Toml(#[from] toml::de::Error),

    #[error("invalid yaml: `{0}`")]
    Yaml(#[from] YamlError),

    #[error("`{0}` is not a scalar setting")]
    InvalidSection(String),

    #[error("invalid boolean `{value}` for `{key}`")]
    InvalidBool { key: String, value: String },
}

/// Booleans as accepted in the settings: `1`, `t`, `T`, `TRUE`, `true`,
/// `True` and their false counterparts. Mixed case such as `tRUE` is
/// rejected.
pub fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(SettingsError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Everything resolved from the settings mount for one plane.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedSettings {
    pub versions: Versions,
    pub enablement: Enablement,
    pub no_defaults_enabled: bool,
    pub minimal_ingestion_profile: bool,
    pub regex_hash: RegexHash,
    pub interval_hash: IntervalHash,
    pub debug_mode: bool,
    pub pod_annotation_namespace_regex: Option<String>,
    pub otel_metrics: bool,
    pub collector: CollectorSettings,
}

impl IngestedSettings {
    pub fn selection_context(&self, env: &PodEnvironment) -> SelectionContext {
        SelectionContext::from_environment(env, self.pod_annotation_namespace_regex.is_some())
    }

    pub fn enablement_env_file(&self) -> EnvFile {
        enablement::enablement_env_file(&self.enablement, self.no_defaults_enabled)
    }

    pub fn debug_mode_env_file(&self) -> EnvFile {
        features::debug_mode_env_file(self.debug_mode)
    }

    pub fn pod_annotation_env_file(&self) -> EnvFile {
        features::pod_annotation_env_file(self.pod_annotation_namespace_regex.as_deref())
    }

    pub fn otel_metrics_env_file(&self) -> EnvFile {
        features::otel_metrics_env_file(self.otel_metrics)
    }
}

/// Reads the settings mount through `F`.
pub struct SettingsIngestor<'a, F: FileReader> {
    reader: &'a F,
    settings_dir: &'a Path,
    v2_files: &'a [PathBuf],
}

impl<'a, F: FileReader> SettingsIngestor<'a, F> {
    pub fn new(reader: &'a F, settings_dir: &'a Path, v2_files: &'a [PathBuf]) -> Self {
        Self {
            reader,
            settings_dir,
            v2_files,
        }
    }

    pub fn ingest(&self, registry: &JobRegistry, env: &PodEnvironment) -> IngestedSettings {
        let versions = Versions::read(self.reader, self.settings_dir, env);
        let schema = versions.schema;
        let sections = Sections::load(self.reader, schema, self.settings_dir, self.v2_files);

        let enablement = enablement::resolve_enablement(registry, &sections, schema);
        let pod_annotation_namespace_regex = features::pod_annotation_namespace_regex(&sections);
        let ctx = SelectionContext::from_environment(env, pod_annotation_namespace_regex.is_some());
        let no_defaults_enabled = enablement.no_defaults_enabled(registry, &ctx);

        let minimal_ingestion_profile = keep_list::minimal_ingestion_profile(&sections, schema);
        let regex_hash = keep_list::resolve_keep_lists(
            registry,
            &sections,
            schema,
            minimal_ingestion_profile,
        );
        let interval_hash = interval::resolve_intervals(registry, &sections, schema);

        info!(
            plane = %registry.plane(),
            schema = %schema,
            no_defaults_enabled,
            minimal_ingestion_profile,
            "settings ingested"
        );

        IngestedSettings {
            versions,
            enablement,
            no_defaults_enabled,
            minimal_ingestion_profile,
            regex_hash,
            interval_hash,
            debug_mode: features::debug_mode(&sections),
            pod_annotation_namespace_regex,
            otel_metrics: features::otel_metrics(&sections),
            collector: CollectorSettings::resolve(&sections, env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{
        CONFIG_VERSION_FILE, ENV_CONTROLLER_TYPE, ENV_OS_TYPE, SCHEMA_VERSION_FILE,
        SECTION_SCRAPE_ENABLED_V2, V1_SECTIONS, V2_SETTINGS_FILES,
    };
    use crate::fs::mock::MockLocalFile;
    use crate::registry::Plane;
    use assert_matches::assert_matches;
    use rstest::rstest;

    #[rstest]
    #[case::true_lower("true", true)]
    #[case::true_upper("TRUE", true)]
    #[case::one("1", true)]
    #[case::false_title(" False ", false)]
    #[case::zero("0", false)]
    #[case::t("t", true)]
    #[case::f_upper("F", false)]
    fn test_parse_bool(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(expected, parse_bool("key", value).unwrap());
    }

    #[rstest]
    #[case::mixed_case("tRUE")]
    #[case::mixed_case_false("fALSE")]
    #[case::yes("yes")]
    #[case::empty("")]
    fn test_parse_bool_rejects(#[case] value: &str) {
        assert_matches!(
            parse_bool("key", value),
            Err(SettingsError::InvalidBool { .. })
        );
    }

    #[test]
    fn test_parse_bool_invalid() {
        assert_matches!(
            parse_bool("kubelet", "yes"),
            Err(SettingsError::InvalidBool { key, value }) if key == "kubelet" && value == "yes"
        );
    }

    fn linux_replicaset() -> PodEnvironment {
        PodEnvironment::from_vars([(ENV_CONTROLLER_TYPE, "ReplicaSet"), (ENV_OS_TYPE, "linux")])
    }

    #[test]
    fn test_nothing_mounted_uses_defaults() {
        let dir = PathBuf::from("/settings");
        let v2_files: Vec<PathBuf> = V2_SETTINGS_FILES.iter().map(PathBuf::from).collect();
        let mut reader = MockLocalFile::default();
        reader.should_not_read_file_not_found(&dir.join(SCHEMA_VERSION_FILE));
        reader.should_not_read_file_not_found(&dir.join(CONFIG_VERSION_FILE));
        let registry = JobRegistry::for_plane(Plane::Controlplane);

        let settings = SettingsIngestor::new(&reader, &dir, &v2_files)
            .ingest(&registry, &linux_replicaset());

        assert_eq!(Enablement::defaults(&registry), settings.enablement);
        assert!(!settings.no_defaults_enabled);
        assert!(settings.minimal_ingestion_profile);
        assert!(!settings.debug_mode);
        assert_eq!(None, settings.pod_annotation_namespace_regex);
        assert_eq!(6, settings.regex_hash.len());
        assert_eq!("30s", settings.interval_hash["CONTROLPLANE_ETCD_SCRAPE_INTERVAL"]);
    }

    #[test]
    fn test_v2_all_disabled_sets_no_defaults() {
        let dir = PathBuf::from("/settings");
        let v2_files: Vec<PathBuf> = V2_SETTINGS_FILES.iter().map(PathBuf::from).collect();
        let mut reader = MockLocalFile::default();
        reader.should_read(&dir.join(SCHEMA_VERSION_FILE), "v2".to_string());
        reader.should_read(&dir.join(CONFIG_VERSION_FILE), "ver1".to_string());
        reader.should_not_read_file_not_found(&dir.join(&v2_files[0]));
        reader.should_read(
            &dir.join(&v2_files[1]),
            format!(
                "{SECTION_SCRAPE_ENABLED_V2}: |-\n  apiserver = false\n  etcd = false\n"
            ),
        );
        let registry = JobRegistry::for_plane(Plane::Controlplane);

        let settings = SettingsIngestor::new(&reader, &dir, &v2_files)
            .ingest(&registry, &linux_replicaset());

        assert!(settings.no_defaults_enabled);
        assert_eq!(
            Some("true"),
            settings
                .enablement_env_file()
                .get("AZMON_PROMETHEUS_NO_DEFAULT_SCRAPING_ENABLED")
        );
    }

    #[test]
    fn test_v1_reads_every_section_file() {
        let dir = PathBuf::from("/settings");
        let mut reader = MockLocalFile::default();
        reader.should_read(&dir.join(SCHEMA_VERSION_FILE), "v1".to_string());
        reader.should_not_read_file_not_found(&dir.join(CONFIG_VERSION_FILE));
        for name in V1_SECTIONS {
            reader.should_not_read_file_not_found(&dir.join(name));
        }
        let registry = JobRegistry::for_plane(Plane::Dataplane);

        let settings =
            SettingsIngestor::new(&reader, &dir, &[]).ingest(&registry, &linux_replicaset());

        assert_eq!("v1", settings.versions.schema_value);
        assert_eq!(Enablement::defaults(&registry), settings.enablement);
    }
}
