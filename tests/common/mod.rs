// Not every test crate uses every helper.
#![allow(dead_code)]

use prom_config_composer::composition::driver::CompositionDriver;
use prom_config_composer::composition::CompositionOutcome;
use prom_config_composer::config::ComposerConfig;
use prom_config_composer::environment::PodEnvironment;
use prom_config_composer::fs::LocalFile;
use prom_config_composer::registry::Plane;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Built-in templates shipped with the crate.
pub fn templates_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("default-prom-configs")
}

/// A throwaway root holding the settings mount, templates and outputs of one
/// composition run.
pub struct Fixture {
    root: TempDir,
    pub config: ComposerConfig,
}

impl Fixture {
    pub fn new(plane: Plane) -> Self {
        let root = tempfile::tempdir().unwrap();
        let config = ComposerConfig {
            plane,
            ..ComposerConfig::rooted_at(root.path())
        };
        fs::create_dir_all(&config.templates_dir).unwrap();
        for entry in fs::read_dir(templates_dir()).unwrap() {
            let entry = entry.unwrap();
            fs::copy(entry.path(), config.templates_dir.join(entry.file_name())).unwrap();
        }
        Self { root, config }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn with_setting(self, name: &str, content: &str) -> Self {
        write(&self.config.settings_dir.join(name), content);
        self
    }

    pub fn with_custom_config(self, content: &str) -> Self {
        write(self.config.custom_config_path.as_ref().unwrap(), content);
        self
    }

    pub fn run(&self, vars: &[(&str, &str)]) -> CompositionOutcome {
        let env = PodEnvironment::from_vars(vars.iter().copied());
        CompositionDriver::new(&LocalFile, &self.config).run(env)
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub const LINUX_REPLICASET: &[(&str, &str)] = &[
    ("CONTROLLER_TYPE", "ReplicaSet"),
    ("OS_TYPE", "linux"),
    ("POD_NAMESPACE", "kube-system"),
    ("KUBE_STATE_NAME", "ama-metrics-ksm"),
    ("NODE_EXPORTER_NAME", "ama-metrics-node-exporter"),
    ("CLUSTER", "/subscriptions/sub/resourceGroups/rg/providers/cluster/my-cluster"),
];

pub const LINUX_DAEMONSET_ADVANCED: &[(&str, &str)] = &[
    ("CONTROLLER_TYPE", "DaemonSet"),
    ("OS_TYPE", "linux"),
    ("MODE", "advanced"),
    ("MAC", "true"),
    ("NODE_NAME", "aks-nodepool1-0"),
    ("NODE_IP", "10.224.0.4"),
    ("NODE_EXPORTER_TARGETPORT", "19100"),
];

pub const WINDOWS_DAEMONSET: &[(&str, &str)] = &[
    ("CONTROLLER_TYPE", "DaemonSet"),
    ("OS_TYPE", "windows"),
    ("NODE_NAME", "akswin000000"),
    ("NODE_IP", "10.224.0.33"),
];
