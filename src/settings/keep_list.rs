use super::hash_store::RegexHash;
use super::parse_bool;
use super::sections::Sections;
use super::version::SchemaVersion;
use crate::defaults::{
    keep_list_hash_key, KEY_MINIMAL_PROFILE_V1, KEY_MINIMAL_PROFILE_V2, SECTION_KEEP_LIST,
    SECTION_MINIMAL_INGESTION_PROFILE,
};
use crate::registry::{JobRegistry, ScrapeJobDefinition};
use regex::Regex;
use tracing::{debug, warn};

/// Whether the minimal ingestion profile applies. Defaults to enabled when
/// the flag is missing or unparsable.
pub fn minimal_ingestion_profile(sections: &Sections, schema: SchemaVersion) -> bool {
    let (section, key) = match schema {
        SchemaVersion::V1 => (SECTION_KEEP_LIST, KEY_MINIMAL_PROFILE_V1),
        SchemaVersion::V2 => (SECTION_MINIMAL_INGESTION_PROFILE, KEY_MINIMAL_PROFILE_V2),
        SchemaVersion::Nil => return true,
    };
    match sections.value(section, key).map(|value| parse_bool(key, value)) {
        Some(Ok(enabled)) => enabled,
        Some(Err(err)) => {
            warn!("keeping minimal ingestion profile enabled: {err}");
            true
        }
        None => true,
    }
}

/// Customer keep list of `job`, `None` when unset or not a valid regex.
fn customer_keep_list<'a>(
    sections: &'a Sections,
    job: &ScrapeJobDefinition,
    schema: SchemaVersion,
) -> Option<&'a str> {
    let value = sections.value(SECTION_KEEP_LIST, &job.settings_key(schema))?;
    match Regex::new(value) {
        Ok(_) => Some(value),
        Err(err) => {
            warn!(job = job.name, "ignoring invalid keep list regex: {err}");
            None
        }
    }
}

/// Effective keep list: the customer regex, followed by `|` and the minimal
/// keep list when the minimal profile is enabled.
pub fn effective_keep_list(customer: &str, minimal: &str, minimal_profile: bool) -> String {
    if minimal_profile {
        format!("{customer}|{minimal}")
    } else {
        customer.to_string()
    }
}

pub fn resolve_keep_lists(
    registry: &JobRegistry,
    sections: &Sections,
    schema: SchemaVersion,
    minimal_profile: bool,
) -> RegexHash {
    registry
        .jobs()
        .iter()
        .map(|job| {
            let customer = customer_keep_list(sections, job, schema).unwrap_or_default();
            let regex = effective_keep_list(customer, job.minimal_keep_list, minimal_profile);
            debug!(job = job.name, regex = %regex, "keep list resolved");
            (keep_list_hash_key(job.env_key), regex)
        })
        .collect()
}
