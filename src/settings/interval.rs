use super::hash_store::IntervalHash;
use super::sections::Sections;
use super::version::SchemaVersion;
use crate::defaults::{scrape_interval_hash_key, DEFAULT_SCRAPE_INTERVAL, SECTION_SCRAPE_INTERVAL};
use crate::registry::JobRegistry;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

const DURATION_PATTERN: &str = r"^((\d+y)?(\d+w)?(\d+d)?(\d+h)?(\d+m)?(\d+s)?(\d+ms)?|0)$";

fn duration_regex() -> Option<&'static Regex> {
    static DURATION_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    DURATION_REGEX
        .get_or_init(|| Regex::new(DURATION_PATTERN).ok())
        .as_ref()
}

/// True when `value` follows the Prometheus duration grammar. The empty
/// string matches the grammar but is not a usable interval.
pub fn is_valid_duration(value: &str) -> bool {
    !value.is_empty() && duration_regex().is_some_and(|re| re.is_match(value))
}

/// `value` when it is a valid duration, `fallback` otherwise.
pub fn check_duration(value: &str, fallback: &str) -> String {
    if is_valid_duration(value) {
        value.to_string()
    } else {
        debug!(value, fallback, "invalid duration replaced");
        fallback.to_string()
    }
}

pub fn resolve_intervals(
    registry: &JobRegistry,
    sections: &Sections,
    schema: SchemaVersion,
) -> IntervalHash {
    registry
        .jobs()
        .iter()
        .map(|job| {
            let interval = match sections.value(SECTION_SCRAPE_INTERVAL, &job.settings_key(schema))
            {
                Some(value) if !is_valid_duration(value) => {
                    warn!(job = job.name, value, "invalid scrape interval, using default");
                    DEFAULT_SCRAPE_INTERVAL.to_string()
                }
                Some(value) => value.to_string(),
                None => DEFAULT_SCRAPE_INTERVAL.to_string(),
            };
            (scrape_interval_hash_key(job.env_key), interval)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Plane;
    use crate::settings::sections::Section;
    use rstest::rstest;

    #[rstest]
    #[case::seconds("15s", true)]
    #[case::compound("1h30m", true)]
    #[case::millis("500ms", true)]
    #[case::zero("0", true)]
    #[case::empty("", false)]
    #[case::text("not-a-duration", false)]
    #[case::no_unit("15", false)]
    #[case::wrong_order("30s1m", false)]
    fn test_duration_grammar(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(expected, is_valid_duration(value));
    }

    #[test]
    fn test_check_duration() {
        assert_eq!("15s", check_duration("15s", DEFAULT_SCRAPE_INTERVAL));
        assert_eq!("30s", check_duration("not-a-duration", DEFAULT_SCRAPE_INTERVAL));
    }

    #[test]
    fn test_resolve_intervals() {
        let registry = JobRegistry::for_plane(Plane::Dataplane);
        let mut sections = Sections::default();
        sections.insert(
            SECTION_SCRAPE_INTERVAL,
            Section::from([
                ("kubelet".to_string(), "15s".to_string()),
                ("coredns".to_string(), "not-a-duration".to_string()),
            ]),
        );

        let hash = resolve_intervals(&registry, &sections, SchemaVersion::V1);

        assert_eq!("15s", hash["KUBELET_SCRAPE_INTERVAL"]);
        assert_eq!("30s", hash["COREDNS_SCRAPE_INTERVAL"]);
        assert_eq!("30s", hash["CADVISOR_SCRAPE_INTERVAL"]);
        assert_eq!(registry.jobs().len(), hash.len());
    }
}
