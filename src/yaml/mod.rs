//! Untyped YAML documents as a tagged tree.
//!
//! Templates, the custom configuration and every merged output are handled as
//! [`Node`] values. Mappings are keyed by strings and kept sorted, which is
//! also the order they are written back in.

pub mod merge;

use serde_yaml::Value;
use std::collections::BTreeMap;
use thiserror::Error;

pub type Mapping = BTreeMap<String, Node>;

#[derive(Error, Debug)]
pub enum YamlError {
    #[error("invalid yaml: `{0}`")]
    Parse(#[from] serde_yaml::Error),

    #[error("expected a mapping at the document root")]
    NotAMapping,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Map(Mapping),
    List(Vec<Node>),
    Scalar(Scalar),
}

impl Node {
    pub fn empty_map() -> Self {
        Node::Map(Mapping::new())
    }

    pub fn string<S: Into<String>>(value: S) -> Self {
        Node::Scalar(Scalar::String(value.into()))
    }

    pub fn number<N: Into<serde_yaml::Number>>(value: N) -> Self {
        Node::Scalar(Scalar::Number(value.into()))
    }

    /// Parses any YAML text. An empty document is a `Null` scalar.
    pub fn parse(content: &str) -> Result<Self, YamlError> {
        let value: Value = serde_yaml::from_str(content)?;
        Ok(Node::from(value))
    }

    /// Parses YAML text that must hold a mapping at the root. An empty
    /// document is accepted as an empty mapping.
    pub fn parse_mapping(content: &str) -> Result<Self, YamlError> {
        match Node::parse(content)? {
            node @ Node::Map(_) => Ok(node),
            Node::Scalar(Scalar::Null) => Ok(Node::empty_map()),
            _ => Err(YamlError::NotAMapping),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String, YamlError> {
        Ok(serde_yaml::to_string(&Value::from(self.clone()))?)
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Node>> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_map().and_then(|map| map.get(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.as_map_mut().and_then(|map| map.get_mut(key))
    }

    /// True for an empty mapping or a null document.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Map(map) => map.is_empty(),
            Node::List(list) => list.is_empty(),
            Node::Scalar(Scalar::Null) => true,
            Node::Scalar(_) => false,
        }
    }

    /// The `scrape_configs` sequence of a Prometheus document, if present.
    pub fn scrape_configs(&self) -> Option<&Vec<Node>> {
        self.get("scrape_configs").and_then(Node::as_list)
    }

    pub fn scrape_configs_mut(&mut self) -> Option<&mut Vec<Node>> {
        self.get_mut("scrape_configs").and_then(Node::as_list_mut)
    }

    /// `job_name` of every scrape block, in order.
    pub fn job_names(&self) -> Vec<String> {
        self.scrape_configs()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter_map(|block| block.get("job_name").and_then(Node::as_str))
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n)),
            Value::String(s) => Node::Scalar(Scalar::String(s)),
            Value::Sequence(seq) => Node::List(seq.into_iter().map(Node::from).collect()),
            Value::Mapping(map) => Node::Map(
                map.into_iter()
                    .map(|(k, v)| (key_to_string(k), Node::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        match node {
            Node::Scalar(Scalar::Null) => Value::Null,
            Node::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            Node::Scalar(Scalar::Number(n)) => Value::Number(n),
            Node::Scalar(Scalar::String(s)) => Value::String(s),
            Node::List(list) => Value::Sequence(list.into_iter().map(Value::from).collect()),
            Node::Map(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (Value::String(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Node::Map(map)
    }
}

fn key_to_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        // complex keys never appear in scrape configs, keep them readable anyway
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SCRAPE_DOC: &str = r#"
scrape_configs:
  - job_name: kubelet
    scrape_interval: 30s
    metric_relabel_configs: []
  - job_name: cadvisor
    honor_labels: true
"#;

    #[test]
    fn test_parse_scrape_doc() {
        let actual = Node::parse_mapping(SCRAPE_DOC);
        assert!(actual.is_ok());
        let node = actual.unwrap();
        assert_eq!(vec!["kubelet", "cadvisor"], node.job_names());
        assert_eq!(
            Some(&Node::Scalar(Scalar::Bool(true))),
            node.scrape_configs().unwrap()[1].get("honor_labels")
        );
    }

    #[test]
    fn test_empty_document_is_empty_mapping() {
        let node = Node::parse_mapping("").unwrap();
        assert_eq!(Node::empty_map(), node);
        assert!(node.is_empty());
    }

    #[test]
    fn test_non_mapping_root_is_rejected() {
        assert_matches!(
            Node::parse_mapping("- a\n- b\n"),
            Err(YamlError::NotAMapping)
        );
        assert_matches!(Node::parse_mapping("a: [b"), Err(YamlError::Parse(_)));
    }

    #[test]
    fn test_non_string_keys_become_strings() {
        let node = Node::parse("1: one\ntrue: yes\n").unwrap();
        assert_eq!(Some("one"), node.get("1").and_then(Node::as_str));
        assert_eq!(Some("yes"), node.get("true").and_then(Node::as_str));
    }

    #[test]
    fn test_serialization_keeps_structure() {
        let node = Node::parse_mapping(SCRAPE_DOC).unwrap();
        let reparsed = Node::parse_mapping(&node.to_yaml_string().unwrap()).unwrap();
        assert_eq!(node, reparsed);
    }
}
