// Paths

pub const SETTINGS_DIR: &str = "/etc/config/settings";
pub const CUSTOM_PROMETHEUS_CONFIG_PATH: &str = "/etc/config/settings/prometheus/prometheus-config";
pub const DEFAULT_PROM_CONFIGS_DIR: &str = "/opt/microsoft/otelcollector/default-prom-configs";
pub const RENDERED_PROM_CONFIGS_DIR: &str = "/opt/microsoft/otelcollector/rendered-prom-configs";
pub const CONFIGMAP_PARSER_DIR: &str = "/opt/microsoft/configmapparser";

pub const DEFAULTS_MERGED_CONFIG_PATH: &str = "/opt/defaultsMergedConfig.yml";
pub const PROM_MERGED_CONFIG_PATH: &str = "/opt/promMergedConfig.yml";

pub const REGEX_HASH_FILENAME: &str = "config_def_targets_metrics_keep_list_hash";
pub const INTERVAL_HASH_FILENAME: &str = "config_def_targets_scrape_intervals_hash";
pub const DEFAULT_SCRAPE_SETTINGS_ENV_FILENAME: &str = "config_default_scrape_settings_env_var";
pub const COLLECTOR_SETTINGS_ENV_FILENAME: &str = "config_prometheus_collector_settings_env_var";
pub const DEBUG_MODE_ENV_FILENAME: &str = "config_debug_mode_env_var";
pub const POD_ANNOTATION_ENV_FILENAME: &str = "config_def_pod_annotation_based_scraping";
pub const OTEL_METRICS_ENV_FILENAME: &str = "config_opentelemetry_metrics_env_var";
pub const VERSIONS_ENV_FILENAME: &str = "config_versions_env_var";

// Settings files and sections

pub const SCHEMA_VERSION_FILE: &str = "schema-version";
pub const CONFIG_VERSION_FILE: &str = "config-version";
pub const V2_SETTINGS_FILES: [&str; 2] = ["cluster-metrics", "controlplane-metrics"];

pub const SECTION_SCRAPE_ENABLED_V1: &str = "default-scrape-settings-enabled";
pub const SECTION_SCRAPE_ENABLED_V2: &str = "default-targets-scrape-enabled";
pub const SECTION_KEEP_LIST: &str = "default-targets-metrics-keep-list";
pub const SECTION_MINIMAL_INGESTION_PROFILE: &str = "minimal-ingestion-profile";
pub const SECTION_SCRAPE_INTERVAL: &str = "default-targets-scrape-interval-settings";
pub const SECTION_POD_ANNOTATION: &str = "pod-annotation-based-scraping";
pub const SECTION_COLLECTOR_SETTINGS: &str = "prometheus-collector-settings";
pub const SECTION_DEBUG_MODE: &str = "debug-mode";
pub const SECTION_OTEL_METRICS: &str = "opentelemetry-metrics";

/// Every section a v1 mount may carry, one file each.
pub const V1_SECTIONS: [&str; 8] = [
    SECTION_SCRAPE_ENABLED_V1,
    SECTION_KEEP_LIST,
    SECTION_SCRAPE_INTERVAL,
    SECTION_POD_ANNOTATION,
    SECTION_COLLECTOR_SETTINGS,
    SECTION_DEBUG_MODE,
    SECTION_OTEL_METRICS,
    SECTION_MINIMAL_INGESTION_PROFILE,
];

pub const KEY_MINIMAL_PROFILE_V1: &str = "minimalingestionprofile";
pub const KEY_MINIMAL_PROFILE_V2: &str = "enabled";
pub const KEY_ENABLED: &str = "enabled";
pub const KEY_POD_ANNOTATION_NAMESPACE_REGEX: &str = "podannotationnamespaceregex";
pub const KEY_METRIC_ACCOUNT_NAME: &str = "default_metric_account_name";
pub const KEY_CLUSTER_ALIAS: &str = "cluster_alias";
pub const KEY_OPERATOR_ENABLED: &str = "operator_enabled";
pub const KEY_HTTPS_CONFIG: &str = "https_config";

pub const CONTROLPLANE_V1_KEY_PREFIX: &str = "controlplane-";

// Values

pub const DEFAULT_SCRAPE_INTERVAL: &str = "30s";
pub const DEFAULT_GLOBAL_SCRAPE_INTERVAL: &str = "1m";
pub const MAX_VERSION_LENGTH: usize = 10;

pub const LABEL_LIMIT: u64 = 63;
pub const LABEL_NAME_LENGTH_LIMIT: u64 = 511;
pub const LABEL_VALUE_LENGTH_LIMIT: u64 = 1023;

pub const SCRAPE_INTERVAL_PLACEHOLDER: &str = "SCRAPE_INTERVAL";

// Environment variables

pub const ENV_CONTROLLER_TYPE: &str = "CONTROLLER_TYPE";
pub const ENV_CONTAINER_TYPE: &str = "CONTAINER_TYPE";
pub const ENV_OS_TYPE: &str = "OS_TYPE";
pub const ENV_MODE: &str = "MODE";
pub const ENV_WINMODE: &str = "WINMODE";
pub const ENV_MAC: &str = "MAC";
pub const ENV_CLUSTER: &str = "CLUSTER";
pub const ENV_SCHEMA_VERSION: &str = "AZMON_AGENT_CFG_SCHEMA_VERSION";
pub const ENV_FILE_VERSION: &str = "AZMON_AGENT_CFG_FILE_VERSION";
pub const ENV_OPERATOR_ENABLED: &str = "AZMON_OPERATOR_ENABLED";
pub const ENV_OPERATOR_TARGETS_HTTPS_ENABLED: &str = "OPERATOR_TARGETS_HTTPS_ENABLED";
pub const ENV_NO_DEFAULT_SCRAPING_ENABLED: &str = "AZMON_PROMETHEUS_NO_DEFAULT_SCRAPING_ENABLED";
pub const ENV_POD_ANNOTATION_NAMESPACES_REGEX: &str =
    "AZMON_PROMETHEUS_POD_ANNOTATION_NAMESPACES_REGEX";
pub const ENV_DEBUG_MODE_ENABLED: &str = "DEBUG_MODE_ENABLED";
pub const ENV_FULL_OTLP_ENABLED: &str = "AZMON_FULL_OTLP_ENABLED";
pub const ENV_METRIC_ACCOUNT_NAME: &str = "AZMON_DEFAULT_METRIC_ACCOUNT_NAME";
pub const ENV_CLUSTER_LABEL: &str = "AZMON_CLUSTER_LABEL";
pub const ENV_CLUSTER_ALIAS: &str = "AZMON_CLUSTER_ALIAS";
pub const ENV_OPERATOR_ENABLED_CHART_SETTING: &str = "AZMON_OPERATOR_ENABLED_CHART_SETTING";
pub const ENV_OPERATOR_ENABLED_CFG_MAP_SETTING: &str = "AZMON_OPERATOR_ENABLED_CFG_MAP_SETTING";
pub const ENV_OPERATOR_HTTPS_ENABLED_CHART_SETTING: &str = "AZMON_OPERATOR_HTTPS_ENABLED_CHART_SETTING";
pub const ENV_OPERATOR_HTTPS_ENABLED: &str = "AZMON_OPERATOR_HTTPS_ENABLED";

pub fn scraping_enabled_env(env_key: &str) -> String {
    format!("AZMON_PROMETHEUS_{env_key}_SCRAPING_ENABLED")
}

pub fn keep_list_hash_key(env_key: &str) -> String {
    format!("{env_key}_METRICS_KEEP_LIST_REGEX")
}

pub fn scrape_interval_hash_key(env_key: &str) -> String {
    format!("{env_key}_SCRAPE_INTERVAL")
}
