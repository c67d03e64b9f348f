use super::keep_lists;
use super::selection::Placement;
use super::{Plane, ScrapeJobDefinition};
use crate::environment::{ControllerType, OsType};
use ControllerType::{DaemonSet, ReplicaSet};
use OsType::{Linux, Windows};

const NODE_PLACEHOLDERS: &[&str] = &["NODE_NAME", "NODE_IP"];
const KUBELET_PLACEHOLDERS: &[&str] = &["NODE_NAME", "NODE_IP", "OS_TYPE"];
const NODE_EXPORTER_PLACEHOLDERS: &[&str] = &["NODE_NAME", "NODE_IP", "NODE_EXPORTER_TARGETPORT"];
const NODE_EXPORTER_RS_PLACEHOLDERS: &[&str] = &["NODE_EXPORTER_NAME", "POD_NAMESPACE"];
const KUBE_STATE_PLACEHOLDERS: &[&str] = &["KUBE_STATE_NAME", "POD_NAMESPACE"];
const NAMESPACE_PLACEHOLDERS: &[&str] = &["POD_NAMESPACE"];

const KUBELET: &[Placement] = &[
    Placement::replica_set("kubeletDefaultRsSimple.yml").simple(),
    Placement::daemon_set("kubeletDefaultDs.yml")
        .advanced()
        .linux_or_windows_daemonset()
        .with_placeholders(KUBELET_PLACEHOLDERS),
];

const CADVISOR: &[Placement] = &[
    Placement::replica_set("cadvisorDefaultRsSimple.yml").simple(),
    Placement::daemon_set("cadvisorDefaultDs.yml")
        .advanced()
        .on(OsType::Linux)
        .with_placeholders(NODE_PLACEHOLDERS),
];

const NODE_EXPORTER: &[Placement] = &[
    Placement::replica_set("nodeexporterDefaultRsSimple.yml")
        .simple()
        .with_placeholders(NODE_EXPORTER_RS_PLACEHOLDERS),
    Placement::daemon_set("nodeexporterDefaultDs.yml")
        .advanced()
        .on(OsType::Linux)
        .with_placeholders(NODE_EXPORTER_PLACEHOLDERS),
];

const WINDOWS_EXPORTER: &[Placement] = &[
    Placement::replica_set("windowsexporterDefaultRsSimple.yml")
        .simple()
        .on(OsType::Linux),
    Placement::daemon_set("windowsexporterDefaultDs.yml")
        .advanced()
        .windows_daemonset()
        .on(OsType::Windows)
        .with_placeholders(NODE_PLACEHOLDERS),
];

const WINDOWS_KUBE_PROXY: &[Placement] = &[
    Placement::replica_set("windowskubeproxyDefaultRsSimple.yml")
        .simple()
        .on(OsType::Linux),
    Placement::daemon_set("windowskubeproxyDefaultDs.yml")
        .advanced()
        .windows_daemonset()
        .on(OsType::Windows)
        .with_placeholders(NODE_PLACEHOLDERS),
];

// Network observability jobs run on the node only; a ReplicaSet can still
// scrape them through a custom configuration.
const KAPPIE_BASIC: &[Placement] = &[Placement::daemon_set("kappieBasicDefaultDs.yml")
    .advanced()
    .managed()
    .with_placeholders(NODE_PLACEHOLDERS)];

const RETINA: &[Placement] = &[Placement::daemon_set("networkobservabilityRetinaDefaultDs.yml")
    .advanced()
    .managed()
    .with_placeholders(NODE_PLACEHOLDERS)];

const HUBBLE: &[Placement] = &[Placement::daemon_set("networkobservabilityHubbleDefaultDs.yml")
    .advanced()
    .managed()
    .on(OsType::Linux)
    .with_placeholders(NODE_PLACEHOLDERS)];

const CILIUM: &[Placement] = &[Placement::daemon_set("networkobservabilityCiliumDefaultDs.yml")
    .advanced()
    .managed()
    .on(OsType::Linux)
    .with_placeholders(NODE_PLACEHOLDERS)];

const fn replica_set_only(template: &'static str, placeholders: &'static [&'static str]) -> [Placement; 1] {
    [Placement::replica_set(template).with_placeholders(placeholders)]
}

const COREDNS: &[Placement] = &replica_set_only("corednsDefault.yml", &[]);
const KUBE_PROXY: &[Placement] = &replica_set_only("kubeproxyDefault.yml", &[]);
const APISERVER: &[Placement] = &replica_set_only("apiserverDefault.yml", &[]);
const KUBE_STATE: &[Placement] = &replica_set_only("kubestateDefault.yml", KUBE_STATE_PLACEHOLDERS);
const POD_ANNOTATIONS: &[Placement] = &replica_set_only("podannotationsDefault.yml", &[]);
const ACSTOR_CAPACITY_PROVISIONER: &[Placement] =
    &replica_set_only("acstorCapacityProvisionerDefaultFile.yml", &[]);
const ACSTOR_METRICS_EXPORTER: &[Placement] =
    &replica_set_only("acstorMetricsExporterDefaultFile.yml", &[]);
const COLLECTOR_HEALTH: &[Placement] =
    &[Placement::anywhere("prometheusCollectorHealthDefault.yml")];

const CP_APISERVER: &[Placement] =
    &replica_set_only("controlplane_apiserver.yml", NAMESPACE_PLACEHOLDERS);
const CP_CLUSTER_AUTOSCALER: &[Placement] =
    &replica_set_only("controlplane_cluster_autoscaler.yml", NAMESPACE_PLACEHOLDERS);
const CP_KUBE_SCHEDULER: &[Placement] =
    &replica_set_only("controlplane_kube_scheduler.yml", NAMESPACE_PLACEHOLDERS);
const CP_KUBE_CONTROLLER_MANAGER: &[Placement] =
    &replica_set_only("controlplane_kube_controller_manager.yml", NAMESPACE_PLACEHOLDERS);
const CP_ETCD: &[Placement] = &replica_set_only("controlplane_etcd.yml", NAMESPACE_PLACEHOLDERS);
const CP_NODE_AUTO_PROVISIONING: &[Placement] =
    &replica_set_only("controlplane_node_auto_provisioning.yml", NAMESPACE_PLACEHOLDERS);

#[allow(clippy::too_many_arguments)]
const fn job(
    name: &'static str,
    env_key: &'static str,
    plane: Plane,
    enabled_by_default: bool,
    os: OsType,
    controller: ControllerType,
    minimal_keep_list: &'static str,
    placements: &'static [Placement],
) -> ScrapeJobDefinition {
    ScrapeJobDefinition {
        name,
        env_key,
        plane,
        enabled_by_default,
        os,
        controller,
        minimal_keep_list,
        placements,
        namespace_filtered: false,
    }
}

#[allow(clippy::too_many_arguments)]
const fn data_plane(
    name: &'static str,
    env_key: &'static str,
    enabled_by_default: bool,
    os: OsType,
    controller: ControllerType,
    minimal_keep_list: &'static str,
    placements: &'static [Placement],
) -> ScrapeJobDefinition {
    job(
        name,
        env_key,
        Plane::Dataplane,
        enabled_by_default,
        os,
        controller,
        minimal_keep_list,
        placements,
    )
}

const fn control_plane(
    name: &'static str,
    env_key: &'static str,
    enabled_by_default: bool,
    minimal_keep_list: &'static str,
    placements: &'static [Placement],
) -> ScrapeJobDefinition {
    job(
        name,
        env_key,
        Plane::Controlplane,
        enabled_by_default,
        OsType::Linux,
        ControllerType::ReplicaSet,
        minimal_keep_list,
        placements,
    )
}

pub static DATA_PLANE_JOBS: &[ScrapeJobDefinition] = &[
    data_plane("kubelet", "KUBELET", true, Linux, DaemonSet, keep_lists::KUBELET, KUBELET),
    data_plane("coredns", "COREDNS", false, Linux, ReplicaSet, keep_lists::COREDNS, COREDNS),
    data_plane("cadvisor", "CADVISOR", true, Linux, DaemonSet, keep_lists::CADVISOR, CADVISOR),
    data_plane("kubeproxy", "KUBEPROXY", false, Linux, ReplicaSet, keep_lists::KUBEPROXY, KUBE_PROXY),
    data_plane("apiserver", "APISERVER", false, Linux, ReplicaSet, keep_lists::APISERVER, APISERVER),
    data_plane("kubestate", "KUBESTATE", true, Linux, ReplicaSet, keep_lists::KUBESTATE, KUBE_STATE),
    data_plane(
        "nodeexporter",
        "NODEEXPORTER",
        true,
        Linux,
        DaemonSet,
        keep_lists::NODEEXPORTER,
        NODE_EXPORTER,
    ),
    data_plane(
        "kappiebasic",
        "KAPPIEBASIC",
        false,
        Linux,
        DaemonSet,
        keep_lists::KAPPIEBASIC,
        KAPPIE_BASIC,
    ),
    data_plane(
        "windowsexporter",
        "WINDOWSEXPORTER",
        false,
        Windows,
        DaemonSet,
        keep_lists::WINDOWSEXPORTER,
        WINDOWS_EXPORTER,
    ),
    data_plane(
        "windowskubeproxy",
        "WINDOWSKUBEPROXY",
        false,
        Windows,
        DaemonSet,
        keep_lists::WINDOWSKUBEPROXY,
        WINDOWS_KUBE_PROXY,
    ),
    data_plane(
        "networkobservabilityRetina",
        "NETWORKOBSERVABILITYRETINA",
        true,
        Linux,
        DaemonSet,
        keep_lists::NETWORKOBSERVABILITY_RETINA,
        RETINA,
    ),
    data_plane(
        "networkobservabilityHubble",
        "NETWORKOBSERVABILITYHUBBLE",
        true,
        Linux,
        DaemonSet,
        keep_lists::NETWORKOBSERVABILITY_HUBBLE,
        HUBBLE,
    ),
    data_plane(
        "networkobservabilityCilium",
        "NETWORKOBSERVABILITYCILIUM",
        true,
        Linux,
        DaemonSet,
        keep_lists::NETWORKOBSERVABILITY_CILIUM,
        CILIUM,
    ),
    ScrapeJobDefinition {
        namespace_filtered: true,
        ..data_plane(
            "podannotations",
            "POD_ANNOTATION",
            false,
            Linux,
            ReplicaSet,
            keep_lists::POD_ANNOTATIONS,
            POD_ANNOTATIONS,
        )
    },
    data_plane(
        "acstor-capacity-provisioner",
        "ACSTORCAPACITYPROVISIONER",
        true,
        Linux,
        ReplicaSet,
        keep_lists::ACSTOR_CAPACITY_PROVISIONER,
        ACSTOR_CAPACITY_PROVISIONER,
    ),
    data_plane(
        "acstor-metrics-exporter",
        "ACSTORMETRICSEXPORTER",
        true,
        Linux,
        ReplicaSet,
        keep_lists::ACSTOR_METRICS_EXPORTER,
        ACSTOR_METRICS_EXPORTER,
    ),
    data_plane(
        "prometheuscollectorhealth",
        "PROMETHEUS_COLLECTOR_HEALTH",
        false,
        Linux,
        ReplicaSet,
        keep_lists::PROMETHEUS_COLLECTOR_HEALTH,
        COLLECTOR_HEALTH,
    ),
];

pub static CONTROL_PLANE_JOBS: &[ScrapeJobDefinition] = &[
    control_plane(
        "apiserver",
        "CONTROLPLANE_APISERVER",
        true,
        keep_lists::CONTROLPLANE_APISERVER,
        CP_APISERVER,
    ),
    control_plane(
        "cluster-autoscaler",
        "CONTROLPLANE_CLUSTER_AUTOSCALER",
        false,
        keep_lists::CONTROLPLANE_CLUSTER_AUTOSCALER,
        CP_CLUSTER_AUTOSCALER,
    ),
    control_plane(
        "kube-scheduler",
        "CONTROLPLANE_KUBE_SCHEDULER",
        false,
        keep_lists::CONTROLPLANE_KUBE_SCHEDULER,
        CP_KUBE_SCHEDULER,
    ),
    control_plane(
        "kube-controller-manager",
        "CONTROLPLANE_KUBE_CONTROLLER_MANAGER",
        false,
        keep_lists::CONTROLPLANE_KUBE_CONTROLLER_MANAGER,
        CP_KUBE_CONTROLLER_MANAGER,
    ),
    control_plane(
        "etcd",
        "CONTROLPLANE_ETCD",
        true,
        keep_lists::CONTROLPLANE_ETCD,
        CP_ETCD,
    ),
    control_plane(
        "node-auto-provisioning",
        "CONTROLPLANE_NODE_AUTO_PROVISIONING",
        false,
        keep_lists::CONTROLPLANE_NODE_AUTO_PROVISIONING,
        CP_NODE_AUTO_PROVISIONING,
    ),
];
