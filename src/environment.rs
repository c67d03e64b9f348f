//! Snapshot of the pod environment taken once per run.

use crate::defaults::{
    ENV_CLUSTER, ENV_CONTAINER_TYPE, ENV_CONTROLLER_TYPE, ENV_MAC, ENV_MODE, ENV_OPERATOR_ENABLED,
    ENV_OPERATOR_TARGETS_HTTPS_ENABLED, ENV_OS_TYPE, ENV_WINMODE,
};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerType {
    ReplicaSet,
    DaemonSet,
    ConfigReaderSidecar,
}

impl ControllerType {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "replicaset" => Some(ControllerType::ReplicaSet),
            "daemonset" => Some(ControllerType::DaemonSet),
            "configreadersidecar" => Some(ControllerType::ConfigReaderSidecar),
            _ => None,
        }
    }
}

impl fmt::Display for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControllerType::ReplicaSet => "ReplicaSet",
            ControllerType::DaemonSet => "DaemonSet",
            ControllerType::ConfigReaderSidecar => "ConfigReaderSidecar",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsType {
    Linux,
    Windows,
}

impl OsType {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "linux" => Some(OsType::Linux),
            "windows" => Some(OsType::Windows),
            _ => None,
        }
    }
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsType::Linux => write!(f, "linux"),
            OsType::Windows => write!(f, "windows"),
        }
    }
}

/// Immutable view over the environment variables the composer depends on.
///
/// Built from the process environment by the binary and from plain maps in
/// tests, so no stage ever reads `std::env` directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PodEnvironment {
    vars: HashMap<String, String>,
}

impl PodEnvironment {
    pub fn from_process_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Value of `name` or an empty string, the way placeholders are filled.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    fn is_true(&self, name: &str) -> bool {
        self.get(name)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    fn is_advanced(&self, name: &str) -> bool {
        self.get(name)
            .map(|v| v.trim().eq_ignore_ascii_case("advanced"))
            .unwrap_or(false)
    }

    pub fn controller_type(&self) -> Option<ControllerType> {
        self.get(ENV_CONTROLLER_TYPE).and_then(ControllerType::parse)
    }

    pub fn is_config_reader_sidecar(&self) -> bool {
        self.get(ENV_CONTAINER_TYPE).and_then(ControllerType::parse)
            == Some(ControllerType::ConfigReaderSidecar)
    }

    /// Controller type used for job selection: a config reader sidecar
    /// composes the ReplicaSet configuration.
    pub fn effective_controller_type(&self) -> Option<ControllerType> {
        if self.is_config_reader_sidecar() {
            return Some(ControllerType::ReplicaSet);
        }
        match self.controller_type() {
            Some(ControllerType::ConfigReaderSidecar) => Some(ControllerType::ReplicaSet),
            other => other,
        }
    }

    pub fn os_type(&self) -> Option<OsType> {
        self.get(ENV_OS_TYPE).and_then(OsType::parse)
    }

    pub fn advanced_mode(&self) -> bool {
        self.is_advanced(ENV_MODE)
    }

    pub fn windows_daemonset(&self) -> bool {
        self.is_advanced(ENV_WINMODE)
    }

    pub fn managed(&self) -> bool {
        self.is_true(ENV_MAC)
    }

    pub fn operator_enabled(&self) -> bool {
        self.is_true(ENV_OPERATOR_ENABLED)
    }

    /// Chart setting for https between the target allocator and the
    /// ReplicaSet.
    pub fn operator_targets_https_enabled(&self) -> bool {
        self.is_true(ENV_OPERATOR_TARGETS_HTTPS_ENABLED)
    }

    pub fn cluster(&self) -> &str {
        self.get_or_empty(ENV_CLUSTER).trim()
    }
}
