mod common;

use prom_config_composer::registry::{JobRegistry, Plane};
use prom_config_composer::template::placeholder_marker;
use prom_config_composer::yaml::Node;
use regex::Regex;
use rstest::rstest;
use std::collections::BTreeSet;
use std::fs;

#[rstest]
#[case::data_plane(Plane::Dataplane)]
#[case::control_plane(Plane::Controlplane)]
fn every_placement_template_is_shipped(#[case] plane: Plane) {
    let registry = JobRegistry::for_plane(plane);
    let markers = Regex::new(r"\$\$([A-Za-z0-9_]+)\$\$").unwrap();

    for job in registry.jobs() {
        for placement in job.placements {
            let path = common::templates_dir().join(placement.template);
            let content = fs::read_to_string(&path)
                .unwrap_or_else(|err| panic!("{}: {err}", path.display()));

            let found: BTreeSet<&str> = markers
                .captures_iter(&content)
                .filter_map(|captures| captures.get(1).map(|m| m.as_str()))
                .collect();
            let mut expected: BTreeSet<&str> = placement.placeholders.iter().copied().collect();
            expected.insert("SCRAPE_INTERVAL");
            assert_eq!(expected, found, "{}", placement.template);

            let parsed = Node::parse_mapping(&content.replace(&placeholder_marker("SCRAPE_INTERVAL"), "30s"))
                .unwrap();
            assert!(parsed.scrape_configs().is_some(), "{}", placement.template);
        }
    }
}
