//! Single-flag sections: debug mode, pod annotation scraping and
//! OpenTelemetry metrics.

use super::parse_bool;
use super::sections::Sections;
use crate::defaults::{
    ENV_DEBUG_MODE_ENABLED, ENV_FULL_OTLP_ENABLED, ENV_POD_ANNOTATION_NAMESPACES_REGEX,
    KEY_ENABLED, KEY_POD_ANNOTATION_NAMESPACE_REGEX, SECTION_DEBUG_MODE, SECTION_OTEL_METRICS,
    SECTION_POD_ANNOTATION,
};
use crate::settings::env_file::EnvFile;
use regex::Regex;
use tracing::{error, info, warn};

fn enabled_flag(sections: &Sections, section: &str) -> bool {
    match sections.value(section, KEY_ENABLED).map(|v| parse_bool(section, v)) {
        Some(Ok(enabled)) => enabled,
        Some(Err(err)) => {
            warn!("{err}, keeping `{section}` disabled");
            false
        }
        None => false,
    }
}

pub fn debug_mode(sections: &Sections) -> bool {
    let enabled = enabled_flag(sections, SECTION_DEBUG_MODE);
    info!(enabled, "debug mode");
    enabled
}

pub fn otel_metrics(sections: &Sections) -> bool {
    enabled_flag(sections, SECTION_OTEL_METRICS)
}

/// Namespace regex restricting pod annotation based scraping. Invalid
/// expressions are dropped.
pub fn pod_annotation_namespace_regex(sections: &Sections) -> Option<String> {
    let value = sections
        .value(SECTION_POD_ANNOTATION, KEY_POD_ANNOTATION_NAMESPACE_REGEX)?
        .trim();
    if value.is_empty() {
        return None;
    }
    match Regex::new(value) {
        Ok(_) => {
            info!(regex = value, "using namespace regex for pod annotations");
            Some(value.to_string())
        }
        Err(err) => {
            error!("invalid namespace regex for pod annotations: {err}");
            None
        }
    }
}

pub fn debug_mode_env_file(enabled: bool) -> EnvFile {
    let mut env_file = EnvFile::default();
    env_file.push(ENV_DEBUG_MODE_ENABLED, enabled);
    env_file
}

pub fn otel_metrics_env_file(enabled: bool) -> EnvFile {
    let mut env_file = EnvFile::default();
    env_file.push(ENV_FULL_OTLP_ENABLED, enabled);
    env_file
}

pub fn pod_annotation_env_file(regex: Option<&str>) -> EnvFile {
    let mut env_file = EnvFile::default();
    env_file.push_quoted(ENV_POD_ANNOTATION_NAMESPACES_REGEX, regex.unwrap_or_default());
    env_file
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::sections::Section;
    use rstest::rstest;
    use tracing_test::traced_test;

    fn single(section: &str, key: &str, value: &str) -> Sections {
        let mut sections = Sections::default();
        sections.insert(section, Section::from([(key.to_string(), value.to_string())]));
        sections
    }

    #[rstest]
    #[case::missing(Sections::default(), false)]
    #[case::enabled(single(SECTION_DEBUG_MODE, KEY_ENABLED, "true"), true)]
    #[case::invalid(single(SECTION_DEBUG_MODE, KEY_ENABLED, "yes please"), false)]
    fn test_debug_mode(#[case] sections: Sections, #[case] expected: bool) {
        assert_eq!(expected, debug_mode(&sections));
        assert_eq!(
            format!("DEBUG_MODE_ENABLED={expected}\n"),
            debug_mode_env_file(expected).render()
        );
    }

    #[test]
    fn test_otel_metrics() {
        assert!(otel_metrics(&single(SECTION_OTEL_METRICS, KEY_ENABLED, "1")));
        assert!(!otel_metrics(&Sections::default()));
    }

    #[test]
    fn test_pod_annotation_regex() {
        let sections = single(
            SECTION_POD_ANNOTATION,
            KEY_POD_ANNOTATION_NAMESPACE_REGEX,
            "kube-system|default",
        );
        let regex = pod_annotation_namespace_regex(&sections);
        assert_eq!(Some("kube-system|default".to_string()), regex);
        assert_eq!(
            "AZMON_PROMETHEUS_POD_ANNOTATION_NAMESPACES_REGEX='kube-system|default'\n",
            pod_annotation_env_file(regex.as_deref()).render()
        );
    }

    #[traced_test]
    #[test]
    fn test_invalid_pod_annotation_regex_is_dropped() {
        let sections = single(
            SECTION_POD_ANNOTATION,
            KEY_POD_ANNOTATION_NAMESPACE_REGEX,
            "kube-(system",
        );
        assert_eq!(None, pod_annotation_namespace_regex(&sections));
        assert!(logs_contain("invalid namespace regex for pod annotations"));
    }
}
