use super::sections::Sections;
use crate::defaults::{
    ENV_CLUSTER_ALIAS, ENV_CLUSTER_LABEL, ENV_METRIC_ACCOUNT_NAME, ENV_OPERATOR_ENABLED,
    ENV_OPERATOR_ENABLED_CFG_MAP_SETTING, ENV_OPERATOR_ENABLED_CHART_SETTING,
    ENV_OPERATOR_HTTPS_ENABLED, ENV_OPERATOR_HTTPS_ENABLED_CHART_SETTING, KEY_CLUSTER_ALIAS,
    KEY_HTTPS_CONFIG, KEY_METRIC_ACCOUNT_NAME, KEY_OPERATOR_ENABLED, SECTION_COLLECTOR_SETTINGS,
};
use crate::environment::PodEnvironment;
use crate::settings::env_file::EnvFile;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

fn non_alphanumeric() -> Option<&'static Regex> {
    static NON_ALPHANUMERIC: OnceLock<Option<Regex>> = OnceLock::new();
    NON_ALPHANUMERIC
        .get_or_init(|| Regex::new("[^0-9a-zA-Z]+").ok())
        .as_ref()
}

/// Replaces every run of characters outside `[0-9a-zA-Z]` with `_` and trims
/// leading and trailing underscores.
pub fn sanitize_cluster_name(name: &str) -> String {
    let name = name.trim();
    let replaced = match non_alphanumeric() {
        Some(re) => re.replace_all(name, "_").into_owned(),
        None => name.to_string(),
    };
    replaced.trim_matches('_').to_string()
}

/// Cluster name from `CLUSTER`; a managed cluster reports its full resource
/// id, of which only the last segment is kept.
pub fn cluster_name(env: &PodEnvironment) -> String {
    let cluster = env.cluster().trim();
    if env.managed() {
        cluster.rsplit('/').next().unwrap_or_default().to_string()
    } else {
        cluster.to_string()
    }
}

/// Cluster alias derived from the environment, used when no alias is
/// configured.
pub fn derived_cluster_alias(env: &PodEnvironment) -> String {
    sanitize_cluster_name(&cluster_name(env))
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollectorSettings {
    pub metric_account_name: String,
    pub cluster_alias: String,
    pub cluster_label: String,
    pub operator_enabled: bool,
    pub operator_enabled_chart: bool,
    pub operator_https_enabled: bool,
    pub operator_https_enabled_chart: bool,
}

impl CollectorSettings {
    pub fn resolve(sections: &Sections, env: &PodEnvironment) -> Self {
        let mut settings = CollectorSettings {
            cluster_alias: derived_cluster_alias(env),
            ..Default::default()
        };
        let section = sections.get(SECTION_COLLECTOR_SETTINGS);
        if section.is_none() {
            debug!("collector settings not mounted, using defaults");
        }

        if let Some(section) = section {
            if let Some(account) = section.get(KEY_METRIC_ACCOUNT_NAME) {
                info!(account = %account, "using configured default metric account");
                settings.metric_account_name = account.clone();
            }
            let configured = section
                .get(KEY_CLUSTER_ALIAS)
                .map(String::as_str)
                .map(sanitize_cluster_name)
                .filter(|alias| !alias.is_empty());
            if let Some(alias) = configured {
                info!(alias = %alias, "using configured cluster alias");
                settings.cluster_alias = alias;
            }
        }

        if env.operator_enabled() {
            settings.operator_enabled_chart = true;
            settings.operator_enabled = section
                .and_then(|section| section.get(KEY_OPERATOR_ENABLED))
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"));
        }

        if env.operator_targets_https_enabled() {
            settings.operator_https_enabled_chart = true;
            let https_config = section.and_then(|section| section.get(KEY_HTTPS_CONFIG));
            settings.operator_https_enabled =
                !https_config.is_some_and(|value| value.trim().eq_ignore_ascii_case("false"));
            debug!(
                enabled = settings.operator_https_enabled,
                "https between target allocator and replicaset resolved"
            );
        }

        settings.cluster_label = if settings.cluster_alias.is_empty() {
            cluster_name(env)
        } else {
            settings.cluster_alias.clone()
        };
        settings
    }

    pub fn to_env_file(&self) -> EnvFile {
        let mut env_file = EnvFile::default();
        env_file.push(ENV_METRIC_ACCOUNT_NAME, &self.metric_account_name);
        env_file.push(ENV_CLUSTER_LABEL, &self.cluster_label);
        env_file.push(ENV_CLUSTER_ALIAS, &self.cluster_alias);
        env_file.push(ENV_OPERATOR_ENABLED_CHART_SETTING, self.operator_enabled_chart);
        if self.operator_enabled {
            env_file.push(ENV_OPERATOR_ENABLED, self.operator_enabled);
            env_file.push(ENV_OPERATOR_ENABLED_CFG_MAP_SETTING, self.operator_enabled);
        }
        env_file.push(
            ENV_OPERATOR_HTTPS_ENABLED_CHART_SETTING,
            self.operator_https_enabled_chart,
        );
        env_file.push(ENV_OPERATOR_HTTPS_ENABLED, self.operator_https_enabled);
        env_file
    }
}
