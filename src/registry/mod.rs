//! Catalog of the built-in scrape jobs.

pub mod catalog;
pub mod keep_lists;
pub mod selection;

use crate::defaults::CONTROLPLANE_V1_KEY_PREFIX;
use crate::environment::{ControllerType, OsType};
use crate::settings::version::SchemaVersion;
use selection::Placement;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;

/// Which group of Kubernetes components a run composes scrape jobs for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    #[default]
    Dataplane,
    Controlplane,
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plane::Dataplane => write!(f, "dataplane"),
            Plane::Controlplane => write!(f, "controlplane"),
        }
    }
}

/// A built-in scrape job. The per-run customer keep list and scrape interval
/// are not stored here; they live in the hashes of a composition session.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeJobDefinition {
    pub name: &'static str,
    /// Upper-case key used in environment variable and hash key names.
    pub env_key: &'static str,
    pub plane: Plane,
    pub enabled_by_default: bool,
    pub os: OsType,
    /// Declared controller, used to decide whether any defaults are enabled.
    pub controller: ControllerType,
    pub minimal_keep_list: &'static str,
    /// Applicability predicates, tried in order.
    pub placements: &'static [Placement],
    /// Only composed when a pod annotation namespace regex is configured.
    pub namespace_filtered: bool,
}

impl ScrapeJobDefinition {
    /// Key of this job inside the settings sections.
    pub fn settings_key(&self, schema: SchemaVersion) -> String {
        match (self.plane, schema) {
            (Plane::Controlplane, SchemaVersion::V1) => {
                format!("{CONTROLPLANE_V1_KEY_PREFIX}{}", self.name)
            }
            _ => self.name.to_string(),
        }
    }

    pub fn templates(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.placements.iter().map(|placement| placement.template)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobRegistry {
    plane: Plane,
    jobs: Vec<ScrapeJobDefinition>,
}

impl JobRegistry {
    pub fn for_plane(plane: Plane) -> Self {
        let jobs = match plane {
            Plane::Dataplane => catalog::DATA_PLANE_JOBS,
            Plane::Controlplane => catalog::CONTROL_PLANE_JOBS,
        };
        Self::new(plane, jobs.to_vec())
    }

    pub fn new(plane: Plane, jobs: Vec<ScrapeJobDefinition>) -> Self {
        Self { plane, jobs }
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn jobs(&self) -> &[ScrapeJobDefinition] {
        &self.jobs
    }

    pub fn get(&self, name: &str) -> Option<&ScrapeJobDefinition> {
        self.jobs.iter().find(|job| job.name == name)
    }

    /// Every template file any job of this registry may be composed from.
    pub fn template_files(&self) -> BTreeSet<&'static str> {
        self.jobs
            .iter()
            .flat_map(ScrapeJobDefinition::templates)
            .collect()
    }
}
