use super::{substitute, TemplateError};
use crate::fs::file_reader::FileReader;
use crate::fs::file_writer::FileWriter;
use crate::yaml::{Mapping, Node};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info};

const METRIC_NAME_LABEL: &str = "__name__";
const NAMESPACE_LABEL: &str = "__meta_kubernetes_namespace";

fn unresolved_marker() -> Option<&'static Regex> {
    static UNRESOLVED_MARKER: OnceLock<Option<Regex>> = OnceLock::new();
    UNRESOLVED_MARKER
        .get_or_init(|| Regex::new(r"\$\$([A-Za-z0-9_]+)\$\$").ok())
        .as_ref()
}

/// What to change in one staged job template.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Rewrite<'a> {
    pub keep_list_regex: &'a str,
    /// Left untouched in the template when `None`.
    pub scrape_interval: Option<&'a str>,
    pub placeholders: Vec<(&'a str, &'a str)>,
    /// Keeps only targets in the matching namespaces.
    pub namespace_regex: Option<&'a str>,
}

/// Rewrites staged templates in place: read, mutate, write back.
pub struct TemplateRewriter<'a, F> {
    fs: &'a F,
}

impl<'a, F: FileReader + FileWriter> TemplateRewriter<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self { fs }
    }

    /// Applies `rewrite` to the template at `path` and returns the rewritten
    /// document.
    pub fn rewrite(&self, path: &Path, rewrite: &Rewrite) -> Result<Node, TemplateError> {
        let content = substitute(&self.fs.read(path)?, &rewrite.placeholders);
        if let Some(marker) = unresolved_marker().and_then(|re| re.captures(&content)) {
            return Err(TemplateError::UnresolvedPlaceholder(marker[1].to_string()));
        }

        let mut document = Node::parse_mapping(&content)?;
        match document.scrape_configs_mut() {
            Some(blocks) => {
                for block in blocks.iter_mut().filter_map(Node::as_map_mut) {
                    apply_to_block(block, rewrite);
                }
            }
            None => info!(path = %path.display(), "no scrape configs found, template left as is"),
        }

        self.fs.write(path, document.to_yaml_string()?)?;
        debug!(path = %path.display(), "template rewritten");
        Ok(document)
    }
}

fn apply_to_block(block: &mut Mapping, rewrite: &Rewrite) {
    if let Some(interval) = rewrite.scrape_interval {
        block.insert("scrape_interval".to_string(), Node::string(interval));
    }
    if !rewrite.keep_list_regex.is_empty() {
        append_rule(
            block,
            "metric_relabel_configs",
            keep_rule(METRIC_NAME_LABEL, rewrite.keep_list_regex),
        );
    }
    let namespaces = rewrite
        .namespace_regex
        .map(strip_quotes)
        .filter(|namespaces| !namespaces.is_empty());
    if let Some(namespaces) = namespaces {
        append_rule(block, "relabel_configs", keep_rule(NAMESPACE_LABEL, namespaces));
    }
}

fn keep_rule(label: &str, regex: &str) -> Node {
    Node::Map(Mapping::from([
        (
            "source_labels".to_string(),
            Node::List(vec![Node::string(label)]),
        ),
        ("action".to_string(), Node::string("keep")),
        ("regex".to_string(), Node::string(regex)),
    ]))
}

/// Appends `rule` to the `key` list of `block`, creating it when absent or
/// replacing a value that is not a list.
fn append_rule(block: &mut Mapping, key: &str, rule: Node) {
    let rules = block
        .entry(key.to_string())
        .or_insert_with(|| Node::List(Vec::new()));
    match rules.as_list_mut() {
        Some(list) => list.push(rule),
        None => *rules = Node::List(vec![rule]),
    }
}

/// A surrounding pair of double quotes is removed, then every leading and
/// trailing single quote.
fn strip_quotes(value: &str) -> &str {
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    value.trim_matches('\'')
}
