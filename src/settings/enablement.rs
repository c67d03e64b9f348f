use super::sections::Sections;
use super::version::SchemaVersion;
use super::{parse_bool, SettingsError};
use crate::defaults::{
    ENV_NO_DEFAULT_SCRAPING_ENABLED, SECTION_SCRAPE_ENABLED_V1, SECTION_SCRAPE_ENABLED_V2,
};
use crate::registry::selection::Enablement;
use crate::registry::JobRegistry;
use crate::settings::env_file::EnvFile;
use tracing::{info, warn};

fn section_name(schema: SchemaVersion) -> Option<&'static str> {
    match schema {
        SchemaVersion::V1 => Some(SECTION_SCRAPE_ENABLED_V1),
        SchemaVersion::V2 => Some(SECTION_SCRAPE_ENABLED_V2),
        SchemaVersion::Nil => None,
    }
}

/// Registry defaults overridden by the enablement section. A single invalid
/// value discards the whole section.
pub fn resolve_enablement(
    registry: &JobRegistry,
    sections: &Sections,
    schema: SchemaVersion,
) -> Enablement {
    let mut enablement = Enablement::defaults(registry);
    let Some(section) = section_name(schema).and_then(|name| sections.get(name)) else {
        info!("default scrape settings not mounted, using defaults");
        return enablement;
    };

    let overrides: Result<Vec<_>, SettingsError> = registry
        .jobs()
        .iter()
        .filter_map(|job| {
            section
                .get(&job.settings_key(schema))
                .map(|value| parse_bool(job.name, value).map(|enabled| (job, enabled)))
        })
        .collect();

    match overrides {
        Ok(overrides) => {
            for (job, enabled) in overrides {
                info!(job = job.name, enabled, "scrape enablement from settings");
                enablement.set(job, enabled);
            }
        }
        Err(err) => warn!("discarding default scrape settings: {err}"),
    }
    enablement
}

pub fn enablement_env_file(enablement: &Enablement, no_defaults_enabled: bool) -> EnvFile {
    let mut env_file = EnvFile::default();
    for (name, enabled) in enablement.iter() {
        env_file.push(name, enabled);
    }
    env_file.push(ENV_NO_DEFAULT_SCRAPING_ENABLED, no_defaults_enabled);
    env_file
}
