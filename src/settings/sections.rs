//! Normalisation of the mounted settings into `section -> key -> value`.

use super::version::SchemaVersion;
use super::SettingsError;
use crate::defaults::V1_SECTIONS;
use crate::fs::file_reader::{FileReader, FileReaderError};
use crate::yaml::{Node, Scalar};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub type Section = BTreeMap<String, String>;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sections(BTreeMap<String, Section>);

impl Sections {
    /// Loads every section available for `schema`. Unreadable or malformed
    /// files are logged and contribute nothing.
    pub fn load<F: FileReader>(
        reader: &F,
        schema: SchemaVersion,
        settings_dir: &Path,
        v2_files: &[PathBuf],
    ) -> Self {
        match schema {
            SchemaVersion::V1 => Self::load_v1(reader, settings_dir),
            SchemaVersion::V2 => Self::load_v2(reader, settings_dir, v2_files),
            SchemaVersion::Nil => {
                debug!("no settings schema, using defaults");
                Self::default()
            }
        }
    }

    fn load_v1<F: FileReader>(reader: &F, settings_dir: &Path) -> Self {
        let mut sections = Self::default();
        for name in V1_SECTIONS {
            let path = settings_dir.join(name);
            let Some(content) = read_optional(reader, &path) else {
                continue;
            };
            match parse_toml_section(&content) {
                Ok(section) => sections.insert(name, section),
                Err(err) => warn!(section = name, "ignoring malformed settings section: {err}"),
            }
        }
        sections
    }

    fn load_v2<F: FileReader>(reader: &F, settings_dir: &Path, v2_files: &[PathBuf]) -> Self {
        let mut sections = Self::default();
        for file in v2_files {
            let path = settings_dir.join(file);
            let Some(content) = read_optional(reader, &path) else {
                continue;
            };
            let blobs = match parse_v2_document(&content) {
                Ok(blobs) => blobs,
                Err(err) => {
                    warn!(path = %path.display(), "ignoring malformed settings file: {err}");
                    continue;
                }
            };
            for (name, blob) in blobs {
                match parse_blob(&blob) {
                    Ok(section) => sections.merge(&name, section),
                    Err(err) => warn!(section = %name, "ignoring malformed settings section: {err}"),
                }
            }
        }
        sections
    }

    pub fn insert(&mut self, name: &str, section: Section) {
        self.0.insert(name.to_string(), section);
    }

    /// Adds the keys of `section` to `name`, overriding existing keys.
    fn merge(&mut self, name: &str, section: Section) {
        self.0.entry(name.to_string()).or_default().extend(section);
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.0.get(name)
    }

    pub fn value(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section)
            .and_then(|section| section.get(key))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn read_optional<F: FileReader>(reader: &F, path: &Path) -> Option<String> {
    match reader.read(path) {
        Ok(content) => Some(content),
        Err(FileReaderError::NotFound(_)) => {
            debug!(path = %path.display(), "settings file not mounted");
            None
        }
        Err(err) => {
            warn!(path = %path.display(), "unable to read settings file: {err}");
            None
        }
    }
}

/// A v2 file maps section names to embedded documents.
fn parse_v2_document(content: &str) -> Result<BTreeMap<String, String>, SettingsError> {
    let node = Node::parse_mapping(content)?;
    let Node::Map(map) = node else {
        return Ok(BTreeMap::new());
    };
    map.into_iter()
        .map(|(name, value)| match scalar_to_string(&value) {
            Some(blob) => Ok((name, blob)),
            None => Err(SettingsError::InvalidSection(name)),
        })
        .collect()
}

/// Blobs are TOML tables of scalars, or YAML mappings of scalars when they
/// are not TOML.
fn parse_blob(blob: &str) -> Result<Section, SettingsError> {
    match parse_toml_section(blob) {
        Err(SettingsError::Toml(_)) => parse_yaml_section(blob),
        parsed => parsed,
    }
}

fn parse_yaml_section(blob: &str) -> Result<Section, SettingsError> {
    match Node::parse_mapping(blob)? {
        Node::Map(map) => map
            .into_iter()
            .map(|(key, value)| match scalar_to_string(&value) {
                Some(value) => Ok((key, value)),
                None => Err(SettingsError::InvalidSection(key)),
            })
            .collect(),
        _ => Ok(Section::new()),
    }
}

pub(super) fn parse_toml_section(content: &str) -> Result<Section, SettingsError> {
    let table: toml::Table = toml::from_str(content)?;
    let mut section = Section::new();
    for (key, value) in table {
        match value {
            toml::Value::String(value) => section.insert(key, value),
            toml::Value::Integer(value) => section.insert(key, value.to_string()),
            toml::Value::Float(value) => section.insert(key, value.to_string()),
            toml::Value::Boolean(value) => section.insert(key, value.to_string()),
            toml::Value::Datetime(value) => section.insert(key, value.to_string()),
            toml::Value::Array(_) | toml::Value::Table(_) => {
                return Err(SettingsError::InvalidSection(key));
            }
        };
    }
    Ok(section)
}

fn scalar_to_string(node: &Node) -> Option<String> {
    match node {
        Node::Scalar(Scalar::String(value)) => Some(value.clone()),
        Node::Scalar(Scalar::Bool(value)) => Some(value.to_string()),
        Node::Scalar(Scalar::Number(value)) => Some(value.to_string()),
        Node::Scalar(Scalar::Null) => Some(String::new()),
        Node::Map(_) | Node::List(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{SECTION_KEEP_LIST, SECTION_SCRAPE_ENABLED_V1};
    use crate::fs::mock::MockLocalFile;
    use crate::yaml::YamlError;
    use assert_matches::assert_matches;
    use tracing_test::traced_test;

    #[test]
    fn test_toml_values_are_stringified() {
        let section = parse_toml_section(
            r#"
kubelet = true
coredns = "15s"
retries = 3
"#,
        )
        .unwrap();

        assert_eq!(Some(&"true".to_string()), section.get("kubelet"));
        assert_eq!(Some(&"15s".to_string()), section.get("coredns"));
        assert_eq!(Some(&"3".to_string()), section.get("retries"));
    }

    #[test]
    fn test_nested_toml_is_rejected() {
        assert_matches!(
            parse_toml_section("[nested]\nkey = 1\n"),
            Err(SettingsError::InvalidSection(key)) if key == "nested"
        );
    }

    #[test]
    fn test_blob_accepts_yaml_and_toml() {
        let yaml = parse_blob("kubelet: true\ncoredns: false\n").unwrap();
        let toml = parse_blob("kubelet = true\ncoredns = false\n").unwrap();
        assert_eq!(yaml, toml);
        assert_eq!(Some(&"false".to_string()), yaml.get("coredns"));
    }

    #[test]
    fn test_toml_blob_with_colon_in_value() {
        let section = parse_blob(
            "podannotationnamespaceregex = \"kube-system: default\"\nenabled = true\n",
        )
        .unwrap();

        assert_eq!(
            Some(&"kube-system: default".to_string()),
            section.get("podannotationnamespaceregex")
        );
        assert_eq!(Some(&"true".to_string()), section.get("enabled"));
    }

    #[test]
    fn test_blob_neither_toml_nor_mapping() {
        assert_matches!(
            parse_blob("- kubelet\n- coredns\n"),
            Err(SettingsError::Yaml(YamlError::NotAMapping))
        );
    }

    #[test]
    fn test_nil_schema_has_no_sections() {
        let reader = MockLocalFile::default();
        let sections = Sections::load(&reader, SchemaVersion::Nil, Path::new("/settings"), &[]);
        assert!(sections.is_empty());
    }

    #[traced_test]
    #[test]
    fn test_v1_malformed_section_is_skipped() {
        let dir = Path::new("/settings");
        let mut reader = MockLocalFile::default();
        for name in V1_SECTIONS {
            match name {
                SECTION_SCRAPE_ENABLED_V1 => {
                    reader.should_read(&dir.join(name), "kubelet = false\n".to_string())
                }
                SECTION_KEEP_LIST => reader.should_read(&dir.join(name), "kubelet = [".to_string()),
                _ => reader.should_not_read_file_not_found(&dir.join(name)),
            }
        }

        let sections = Sections::load(&reader, SchemaVersion::V1, dir, &[]);

        assert_eq!(
            Some("false"),
            sections.value(SECTION_SCRAPE_ENABLED_V1, "kubelet")
        );
        assert!(sections.get(SECTION_KEEP_LIST).is_none());
        assert!(logs_contain("ignoring malformed settings section"));
    }

    #[test]
    fn test_v2_files_are_unioned() {
        let dir = Path::new("/settings");
        let cluster = PathBuf::from("cluster-metrics");
        let control = PathBuf::from("controlplane-metrics");
        let mut reader = MockLocalFile::default();
        reader.should_read(
            &dir.join(&cluster),
            r#"
default-targets-scrape-enabled: |-
  kubelet: false
default-targets-scrape-interval-settings: |-
  kubelet = "15s"
"#
            .to_string(),
        );
        reader.should_read(
            &dir.join(&control),
            r#"
default-targets-scrape-enabled: |-
  etcd: true
"#
            .to_string(),
        );

        let sections = Sections::load(&reader, SchemaVersion::V2, dir, &[cluster, control]);

        let enabled = sections.get("default-targets-scrape-enabled").unwrap();
        assert_eq!(Some(&"false".to_string()), enabled.get("kubelet"));
        assert_eq!(Some(&"true".to_string()), enabled.get("etcd"));
        assert_eq!(
            Some("15s"),
            sections.value("default-targets-scrape-interval-settings", "kubelet")
        );
    }
}
