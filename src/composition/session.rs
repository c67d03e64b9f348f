use crate::defaults::{keep_list_hash_key, scrape_interval_hash_key};
use crate::environment::PodEnvironment;
use crate::registry::selection::{SelectedJob, SelectionContext};
use crate::registry::JobRegistry;
use crate::settings::IngestedSettings;
use crate::template::rewriter::Rewrite;

/// State of one composition run, built fresh per run and passed to every
/// stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub registry: JobRegistry,
    pub env: PodEnvironment,
    pub settings: IngestedSettings,
}

impl Session {
    pub fn new(registry: JobRegistry, env: PodEnvironment, settings: IngestedSettings) -> Self {
        Self {
            registry,
            env,
            settings,
        }
    }

    pub fn selection_context(&self) -> SelectionContext {
        self.settings.selection_context(&self.env)
    }

    pub fn selected_jobs(&self) -> Vec<SelectedJob<'_>> {
        self.registry
            .select_applicable_jobs(&self.settings.enablement, &self.selection_context())
    }

    /// How the staged template of `job` has to be rewritten.
    pub fn rewrite_for(&self, job: &SelectedJob) -> Rewrite<'_> {
        let env_key = job.definition.env_key;
        Rewrite {
            keep_list_regex: self
                .settings
                .regex_hash
                .get(&keep_list_hash_key(env_key))
                .map(String::as_str)
                .unwrap_or_default(),
            scrape_interval: self
                .settings
                .interval_hash
                .get(&scrape_interval_hash_key(env_key))
                .map(String::as_str),
            placeholders: job
                .placement
                .placeholders
                .iter()
                .map(|name| (*name, self.env.get_or_empty(name)))
                .collect(),
            namespace_regex: job
                .definition
                .namespace_filtered
                .then_some(self.settings.pod_annotation_namespace_regex.as_deref())
                .flatten(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{ENV_CONTROLLER_TYPE, ENV_MODE, ENV_OS_TYPE};
    use crate::registry::selection::Enablement;
    use crate::registry::Plane;
    use crate::settings::collector::CollectorSettings;
    use crate::settings::hash_store::{IntervalHash, RegexHash};
    use crate::settings::version::Versions;

    fn settings(registry: &JobRegistry) -> IngestedSettings {
        IngestedSettings {
            versions: Versions::default(),
            enablement: Enablement::defaults(registry),
            no_defaults_enabled: false,
            minimal_ingestion_profile: true,
            regex_hash: RegexHash::new(),
            interval_hash: IntervalHash::new(),
            debug_mode: false,
            pod_annotation_namespace_regex: None,
            otel_metrics: false,
            collector: CollectorSettings::default(),
        }
    }

    #[test]
    fn test_rewrite_reads_hashes_and_environment() {
        let registry = JobRegistry::for_plane(Plane::Dataplane);
        let mut settings = settings(&registry);
        settings.regex_hash.insert(
            "KUBELET_METRICS_KEEP_LIST_REGEX".to_string(),
            "|kubelet_node_name".to_string(),
        );
        settings
            .interval_hash
            .insert("KUBELET_SCRAPE_INTERVAL".to_string(), "15s".to_string());
        let env = PodEnvironment::from_vars([
            (ENV_CONTROLLER_TYPE, "DaemonSet"),
            (ENV_OS_TYPE, "linux"),
            (ENV_MODE, "advanced"),
            ("NODE_NAME", "node-1"),
            ("NODE_IP", "10.0.0.4"),
        ]);
        let session = Session::new(registry, env, settings);

        let jobs = session.selected_jobs();
        let kubelet = jobs
            .iter()
            .find(|job| job.definition.name == "kubelet")
            .unwrap();
        let rewrite = session.rewrite_for(kubelet);

        assert_eq!("|kubelet_node_name", rewrite.keep_list_regex);
        assert_eq!(Some("15s"), rewrite.scrape_interval);
        assert_eq!(
            vec![("NODE_NAME", "node-1"), ("NODE_IP", "10.0.0.4"), ("OS_TYPE", "linux")],
            rewrite.placeholders
        );
        assert_eq!(None, rewrite.namespace_regex);
    }

    #[test]
    fn test_missing_hash_entries() {
        let registry = JobRegistry::for_plane(Plane::Controlplane);
        let settings = settings(&registry);
        let env =
            PodEnvironment::from_vars([(ENV_CONTROLLER_TYPE, "ReplicaSet"), (ENV_OS_TYPE, "linux")]);
        let session = Session::new(registry, env, settings);

        let jobs = session.selected_jobs();
        let rewrite = session.rewrite_for(&jobs[0]);

        assert_eq!("", rewrite.keep_list_regex);
        assert_eq!(None, rewrite.scrape_interval);
        // unset placeholders become empty
        assert_eq!(vec![("POD_NAMESPACE", "")], rewrite.placeholders);
    }

    #[test]
    fn test_namespace_regex_only_for_pod_annotations() {
        let registry = JobRegistry::for_plane(Plane::Dataplane);
        let mut settings = settings(&registry);
        settings.pod_annotation_namespace_regex = Some("kube-system".to_string());
        let pod_annotations = registry.get("podannotations").unwrap().clone();
        settings.enablement.set(&pod_annotations, true);
        let env =
            PodEnvironment::from_vars([(ENV_CONTROLLER_TYPE, "ReplicaSet"), (ENV_OS_TYPE, "linux")]);
        let session = Session::new(registry, env, settings);

        let jobs = session.selected_jobs();
        for job in &jobs {
            let expected = job.definition.namespace_filtered.then_some("kube-system");
            assert_eq!(expected, session.rewrite_for(job).namespace_regex);
        }
        assert!(jobs.iter().any(|job| job.definition.namespace_filtered));
    }
}
