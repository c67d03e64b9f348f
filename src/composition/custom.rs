//! The customer supplied Prometheus configuration.

use crate::defaults::{
    DEFAULT_GLOBAL_SCRAPE_INTERVAL, DEFAULT_SCRAPE_INTERVAL, LABEL_LIMIT, LABEL_NAME_LENGTH_LIMIT,
    LABEL_VALUE_LENGTH_LIMIT,
};
use crate::fs::file_reader::{FileReader, FileReaderError};
use crate::settings::interval::is_valid_duration;
use crate::yaml::merge::deep_merge_documents;
use crate::yaml::Node;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reads and parses the custom configuration. Absent, empty or malformed
/// documents all mean "no custom configuration".
pub fn load_custom_config<F: FileReader>(reader: &F, path: &Path) -> Option<Node> {
    let content = match reader.read(path) {
        Ok(content) => content,
        Err(FileReaderError::NotFound(_)) => {
            info!("custom prometheus config does not exist, using only default scrape targets");
            return None;
        }
        Err(err) => {
            warn!(path = %path.display(), "custom prometheus config will not be used: {err}");
            return None;
        }
    };
    if content.trim().is_empty() {
        debug!(path = %path.display(), "custom prometheus config is empty");
        return None;
    }
    match Node::parse_mapping(&content) {
        Ok(document) if !document.is_empty() => Some(document),
        Ok(_) => None,
        Err(err) => {
            warn!(path = %path.display(), "custom prometheus config will not be used: {err}");
            None
        }
    }
}

/// Scrape interval given to every staged template, taken from the custom
/// `global.scrape_interval`.
///
/// An invalid global interval is replaced by `1m` in the custom document
/// while the templates still get `30s`.
pub fn resolve_global_interval(custom: Option<&mut Node>) -> String {
    let Some(global) = custom.and_then(|doc| doc.get_mut("global")) else {
        return DEFAULT_SCRAPE_INTERVAL.to_string();
    };
    let Some(global) = global.as_map_mut() else {
        return DEFAULT_SCRAPE_INTERVAL.to_string();
    };
    let Some(interval) = global.get("scrape_interval") else {
        return DEFAULT_SCRAPE_INTERVAL.to_string();
    };

    let valid = interval
        .as_str()
        .filter(|value| is_valid_duration(value))
        .map(str::to_string);
    match valid {
        Some(value) => value,
        None => {
            warn!(
                fallback = DEFAULT_GLOBAL_SCRAPE_INTERVAL,
                "invalid global scrape interval in custom prometheus config"
            );
            global.insert(
                "scrape_interval".to_string(),
                Node::string(DEFAULT_GLOBAL_SCRAPE_INTERVAL),
            );
            DEFAULT_SCRAPE_INTERVAL.to_string()
        }
    }
}

/// Caps the label limits of every custom scrape job.
pub fn apply_label_limits(custom: &mut Node) {
    let Some(blocks) = custom.scrape_configs_mut() else {
        warn!("no jobs found to set label limits in custom prometheus config");
        return;
    };
    for block in blocks.iter_mut().filter_map(Node::as_map_mut) {
        block.insert("label_limit".to_string(), Node::number(LABEL_LIMIT));
        block.insert(
            "label_name_length_limit".to_string(),
            Node::number(LABEL_NAME_LENGTH_LIMIT),
        );
        block.insert(
            "label_value_length_limit".to_string(),
            Node::number(LABEL_VALUE_LENGTH_LIMIT),
        );
        debug!(
            job = block.get("job_name").and_then(Node::as_str).unwrap_or_default(),
            "label limits set"
        );
    }
}

/// The document written as the final configuration when a custom one is
/// mounted.
///
/// Empty defaults leave the custom document as is, and a custom document
/// without scrape jobs leaves the defaults as they are.
pub fn merge_with_custom(defaults: Option<&Node>, custom: Node) -> Node {
    match defaults {
        Some(defaults) if !defaults.is_empty() => {
            if custom.scrape_configs().is_some() {
                deep_merge_documents(defaults.clone(), &custom)
            } else {
                info!("custom prometheus config has no scrape configs, using the defaults");
                defaults.clone()
            }
        }
        _ => {
            warn!("merged default scrape config is empty, using only custom scrape config");
            custom
        }
    }
}
