//! Declarative placement predicates and job selection.
//!
//! Every job lists the placements it may run in. A placement is a plain
//! conjunction of requirements, evaluated the same way for every job; the
//! first matching placement picks the template the job is composed from.

use super::{JobRegistry, ScrapeJobDefinition};
use crate::defaults::scraping_enabled_env;
use crate::environment::{ControllerType, OsType, PodEnvironment};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRequirement {
    Any,
    Simple,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsRequirement {
    Any,
    Only(OsType),
    /// Linux nodes, or any node once the Windows daemonset is enabled.
    LinuxOrWindowsDaemonset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// `None` places the job on every controller.
    pub controller: Option<ControllerType>,
    pub mode: ModeRequirement,
    pub os: OsRequirement,
    pub windows_daemonset: bool,
    pub managed: bool,
    pub template: &'static str,
    pub placeholders: &'static [&'static str],
}

impl Placement {
    pub const fn replica_set(template: &'static str) -> Self {
        Self::new(Some(ControllerType::ReplicaSet), template)
    }

    pub const fn daemon_set(template: &'static str) -> Self {
        Self::new(Some(ControllerType::DaemonSet), template)
    }

    /// Any controller on any OS, gated by enablement alone.
    pub const fn anywhere(template: &'static str) -> Self {
        Self::new(None, template)
    }

    const fn new(controller: Option<ControllerType>, template: &'static str) -> Self {
        Self {
            controller,
            mode: ModeRequirement::Any,
            os: OsRequirement::Any,
            windows_daemonset: false,
            managed: false,
            template,
            placeholders: &[],
        }
    }

    pub const fn simple(self) -> Self {
        Self {
            mode: ModeRequirement::Simple,
            ..self
        }
    }

    pub const fn advanced(self) -> Self {
        Self {
            mode: ModeRequirement::Advanced,
            ..self
        }
    }

    pub const fn on(self, os: OsType) -> Self {
        Self {
            os: OsRequirement::Only(os),
            ..self
        }
    }

    pub const fn linux_or_windows_daemonset(self) -> Self {
        Self {
            os: OsRequirement::LinuxOrWindowsDaemonset,
            ..self
        }
    }

    pub const fn windows_daemonset(self) -> Self {
        Self {
            windows_daemonset: true,
            ..self
        }
    }

    pub const fn managed(self) -> Self {
        Self {
            managed: true,
            ..self
        }
    }

    pub const fn with_placeholders(self, placeholders: &'static [&'static str]) -> Self {
        Self {
            placeholders,
            ..self
        }
    }

    pub fn matches(&self, ctx: &SelectionContext) -> bool {
        let controller = self
            .controller
            .map_or(true, |controller| ctx.controller == Some(controller));
        let mode = match self.mode {
            ModeRequirement::Any => true,
            ModeRequirement::Simple => !ctx.advanced_mode,
            ModeRequirement::Advanced => ctx.advanced_mode,
        };
        let os = match self.os {
            OsRequirement::Any => true,
            OsRequirement::Only(os) => ctx.os == Some(os),
            OsRequirement::LinuxOrWindowsDaemonset => {
                ctx.os == Some(OsType::Linux) || ctx.windows_daemonset
            }
        };
        controller
            && mode
            && os
            && (!self.windows_daemonset || ctx.windows_daemonset)
            && (!self.managed || ctx.managed)
    }
}

/// The facts about the running pod that placements are evaluated against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionContext {
    /// Effective controller: a config reader sidecar is a ReplicaSet here.
    pub controller: Option<ControllerType>,
    pub os: Option<OsType>,
    pub advanced_mode: bool,
    pub windows_daemonset: bool,
    pub managed: bool,
    /// Whether a pod annotation namespace regex is configured.
    pub namespace_filter: bool,
}

impl SelectionContext {
    pub fn from_environment(env: &PodEnvironment, namespace_filter: bool) -> Self {
        Self {
            controller: env.effective_controller_type(),
            os: env.os_type(),
            advanced_mode: env.advanced_mode(),
            windows_daemonset: env.windows_daemonset(),
            managed: env.managed(),
            namespace_filter,
        }
    }
}

/// Per-job enablement, keyed by the `AZMON_PROMETHEUS_<KEY>_SCRAPING_ENABLED`
/// variable name of each job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enablement {
    flags: BTreeMap<String, bool>,
}

impl Enablement {
    pub fn defaults(registry: &JobRegistry) -> Self {
        Self {
            flags: registry
                .jobs()
                .iter()
                .map(|job| (scraping_enabled_env(job.env_key), job.enabled_by_default))
                .collect(),
        }
    }

    pub fn set(&mut self, job: &ScrapeJobDefinition, enabled: bool) {
        self.flags.insert(scraping_enabled_env(job.env_key), enabled);
    }

    pub fn is_enabled(&self, job: &ScrapeJobDefinition) -> bool {
        self.flags
            .get(&scraping_enabled_env(job.env_key))
            .copied()
            .unwrap_or(false)
    }

    pub fn get(&self, env_name: &str) -> Option<bool> {
        self.flags.get(env_name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }

    /// True unless some job declared for this pod's controller and OS is
    /// enabled.
    pub fn no_defaults_enabled(&self, registry: &JobRegistry, ctx: &SelectionContext) -> bool {
        !registry.jobs().iter().any(|job| {
            ctx.controller == Some(job.controller)
                && ctx.os == Some(job.os)
                && self.is_enabled(job)
        })
    }
}

/// A job chosen for composition together with the placement that matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedJob<'a> {
    pub definition: &'a ScrapeJobDefinition,
    pub placement: &'a Placement,
}

impl<'a> SelectedJob<'a> {
    pub fn template(&self) -> &'static str {
        self.placement.template
    }
}

impl JobRegistry {
    /// Enabled jobs with a placement matching `ctx`, in catalog order.
    pub fn select_applicable_jobs(
        &self,
        enablement: &Enablement,
        ctx: &SelectionContext,
    ) -> Vec<SelectedJob<'_>> {
        self.jobs()
            .iter()
            .filter(|job| enablement.is_enabled(job))
            .filter(|job| !job.namespace_filtered || ctx.namespace_filter)
            .filter_map(|job| {
                job.placements
                    .iter()
                    .find(|placement| placement.matches(ctx))
                    .map(|placement| SelectedJob {
                        definition: job,
                        placement,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Plane;
    use rstest::rstest;

    fn ctx(controller: ControllerType, os: OsType) -> SelectionContext {
        SelectionContext {
            controller: Some(controller),
            os: Some(os),
            ..Default::default()
        }
    }

    fn all_enabled(registry: &JobRegistry) -> Enablement {
        let mut enablement = Enablement::defaults(registry);
        registry
            .jobs()
            .iter()
            .for_each(|job| enablement.set(job, true));
        enablement
    }

    fn selected_templates(registry: &JobRegistry, ctx: &SelectionContext) -> Vec<&'static str> {
        registry
            .select_applicable_jobs(&all_enabled(registry), ctx)
            .iter()
            .map(SelectedJob::template)
            .collect()
    }

    #[rstest]
    #[case::kubelet_rs_simple("kubelet", ctx(ControllerType::ReplicaSet, OsType::Linux), Some("kubeletDefaultRsSimple.yml"))]
    #[case::kubelet_rs_advanced("kubelet", SelectionContext { advanced_mode: true, ..ctx(ControllerType::ReplicaSet, OsType::Linux) }, None)]
    #[case::kubelet_ds_simple("kubelet", ctx(ControllerType::DaemonSet, OsType::Linux), None)]
    #[case::kubelet_ds_advanced_linux("kubelet", SelectionContext { advanced_mode: true, ..ctx(ControllerType::DaemonSet, OsType::Linux) }, Some("kubeletDefaultDs.yml"))]
    #[case::kubelet_ds_advanced_windows("kubelet", SelectionContext { advanced_mode: true, ..ctx(ControllerType::DaemonSet, OsType::Windows) }, None)]
    #[case::kubelet_ds_advanced_windows_daemonset("kubelet", SelectionContext { advanced_mode: true, windows_daemonset: true, ..ctx(ControllerType::DaemonSet, OsType::Windows) }, Some("kubeletDefaultDs.yml"))]
    #[case::cadvisor_ds_windows("cadvisor", SelectionContext { advanced_mode: true, windows_daemonset: true, ..ctx(ControllerType::DaemonSet, OsType::Windows) }, None)]
    #[case::coredns_rs("coredns", ctx(ControllerType::ReplicaSet, OsType::Linux), Some("corednsDefault.yml"))]
    #[case::coredns_ds("coredns", SelectionContext { advanced_mode: true, ..ctx(ControllerType::DaemonSet, OsType::Linux) }, None)]
    #[case::retina_unmanaged("networkobservabilityRetina", SelectionContext { advanced_mode: true, ..ctx(ControllerType::DaemonSet, OsType::Linux) }, None)]
    #[case::retina_managed("networkobservabilityRetina", SelectionContext { advanced_mode: true, managed: true, ..ctx(ControllerType::DaemonSet, OsType::Windows) }, Some("networkobservabilityRetinaDefaultDs.yml"))]
    #[case::retina_rs("networkobservabilityRetina", SelectionContext { managed: true, ..ctx(ControllerType::ReplicaSet, OsType::Linux) }, None)]
    #[case::hubble_managed_windows("networkobservabilityHubble", SelectionContext { advanced_mode: true, managed: true, ..ctx(ControllerType::DaemonSet, OsType::Windows) }, None)]
    #[case::windowsexporter_rs_simple("windowsexporter", ctx(ControllerType::ReplicaSet, OsType::Linux), Some("windowsexporterDefaultRsSimple.yml"))]
    #[case::windowsexporter_ds("windowsexporter", SelectionContext { advanced_mode: true, windows_daemonset: true, ..ctx(ControllerType::DaemonSet, OsType::Windows) }, Some("windowsexporterDefaultDs.yml"))]
    #[case::windowsexporter_ds_no_winmode("windowsexporter", SelectionContext { advanced_mode: true, ..ctx(ControllerType::DaemonSet, OsType::Windows) }, None)]
    #[case::podannotations_without_namespaces("podannotations", ctx(ControllerType::ReplicaSet, OsType::Linux), None)]
    #[case::podannotations_with_namespaces("podannotations", SelectionContext { namespace_filter: true, ..ctx(ControllerType::ReplicaSet, OsType::Linux) }, Some("podannotationsDefault.yml"))]
    fn test_data_plane_placement(
        #[case] job: &str,
        #[case] ctx: SelectionContext,
        #[case] expected: Option<&str>,
    ) {
        let registry = JobRegistry::for_plane(Plane::Dataplane);
        let enablement = all_enabled(&registry);
        let template = registry
            .select_applicable_jobs(&enablement, &ctx)
            .into_iter()
            .find(|selected| selected.definition.name == job)
            .map(|selected| selected.template());
        assert_eq!(expected, template);
    }

    #[test]
    fn test_unknown_controller_selects_only_controller_agnostic_jobs() {
        let registry = JobRegistry::for_plane(Plane::Dataplane);
        let ctx = SelectionContext {
            os: Some(OsType::Linux),
            advanced_mode: true,
            ..Default::default()
        };
        assert_eq!(
            vec!["prometheusCollectorHealthDefault.yml"],
            selected_templates(&registry, &ctx)
        );
    }

    #[test]
    fn test_windows_daemonset_simple_mode_selects_only_collector_health() {
        let registry = JobRegistry::for_plane(Plane::Dataplane);
        let ctx = ctx(ControllerType::DaemonSet, OsType::Windows);
        assert_eq!(
            vec!["prometheusCollectorHealthDefault.yml"],
            selected_templates(&registry, &ctx)
        );
    }

    #[rstest]
    #[case::replicaset_linux(ctx(ControllerType::ReplicaSet, OsType::Linux))]
    #[case::daemonset_linux(SelectionContext { advanced_mode: true, ..ctx(ControllerType::DaemonSet, OsType::Linux) })]
    #[case::daemonset_windows(SelectionContext { advanced_mode: true, windows_daemonset: true, ..ctx(ControllerType::DaemonSet, OsType::Windows) })]
    #[case::daemonset_windows_simple(ctx(ControllerType::DaemonSet, OsType::Windows))]
    #[case::replicaset_windows(ctx(ControllerType::ReplicaSet, OsType::Windows))]
    fn test_collector_health_follows_enablement_only(#[case] ctx: SelectionContext) {
        let registry = JobRegistry::for_plane(Plane::Dataplane);
        let health = registry.get("prometheuscollectorhealth").unwrap().clone();
        let mut enablement = Enablement::defaults(&registry);

        let selected = |enablement: &Enablement| {
            registry
                .select_applicable_jobs(enablement, &ctx)
                .iter()
                .any(|selected| selected.definition.name == "prometheuscollectorhealth")
        };

        assert!(!selected(&enablement));
        enablement.set(&health, true);
        assert!(selected(&enablement));
    }

    #[test]
    fn test_control_plane_defaults_on_replicaset() {
        let registry = JobRegistry::for_plane(Plane::Controlplane);
        let enablement = Enablement::defaults(&registry);
        let ctx = ctx(ControllerType::ReplicaSet, OsType::Linux);

        let names: Vec<&str> = registry
            .select_applicable_jobs(&enablement, &ctx)
            .iter()
            .map(|selected| selected.definition.name)
            .collect();

        assert_eq!(vec!["apiserver", "etcd"], names);
        assert!(!enablement.no_defaults_enabled(&registry, &ctx));
    }

    #[test]
    fn test_disabled_jobs_are_not_selected() {
        let registry = JobRegistry::for_plane(Plane::Dataplane);
        let mut enablement = Enablement::defaults(&registry);
        registry
            .jobs()
            .iter()
            .for_each(|job| enablement.set(job, false));
        let ctx = ctx(ControllerType::ReplicaSet, OsType::Linux);

        assert!(registry.select_applicable_jobs(&enablement, &ctx).is_empty());
        assert!(enablement.no_defaults_enabled(&registry, &ctx));
    }

    #[rstest]
    #[case::replicaset_linux(ControllerType::ReplicaSet, OsType::Linux, false)]
    #[case::daemonset_linux(ControllerType::DaemonSet, OsType::Linux, false)]
    #[case::daemonset_windows(ControllerType::DaemonSet, OsType::Windows, true)]
    fn test_no_defaults_enabled_uses_declared_controller_and_os(
        #[case] controller: ControllerType,
        #[case] os: OsType,
        #[case] expected: bool,
    ) {
        let registry = JobRegistry::for_plane(Plane::Dataplane);
        let enablement = Enablement::defaults(&registry);
        assert_eq!(
            expected,
            enablement.no_defaults_enabled(&registry, &ctx(controller, os))
        );
    }

    #[test]
    fn test_enablement_is_keyed_by_env_name() {
        let registry = JobRegistry::for_plane(Plane::Dataplane);
        let enablement = Enablement::defaults(&registry);
        assert_eq!(
            Some(true),
            enablement.get("AZMON_PROMETHEUS_KUBELET_SCRAPING_ENABLED")
        );
        assert_eq!(
            Some(false),
            enablement.get("AZMON_PROMETHEUS_POD_ANNOTATION_SCRAPING_ENABLED")
        );
    }
}
