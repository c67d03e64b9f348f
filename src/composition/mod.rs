//! Composition of the final scrape configuration for one plane.

pub mod custom;
pub mod driver;
pub mod session;

use crate::registry::Plane;
use crate::yaml::merge::deep_merge_documents;
use crate::yaml::{Mapping, Node};
use std::path::{Path, PathBuf};

/// What a composition run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionOutcome {
    pub plane: Plane,
    /// Jobs whose rewritten template made it into the defaults document.
    pub selected_jobs: Vec<String>,
    /// Jobs that applied but whose template could not be used.
    pub skipped_jobs: Vec<String>,
    pub no_defaults_enabled: bool,
    pub defaults: Option<Node>,
    /// Defaults combined with the custom configuration.
    pub merged: Option<Node>,
    pub written: Vec<PathBuf>,
}

impl CompositionOutcome {
    pub fn was_written(&self, path: &Path) -> bool {
        self.written.iter().any(|written| written == path)
    }
}

/// Folds the rewritten job documents into one, starting from an empty
/// `scrape_configs` list. `None` when there is nothing to fold.
pub fn merge_default_documents<I>(documents: I) -> Option<Node>
where
    I: IntoIterator<Item = Node>,
{
    let mut documents = documents.into_iter().peekable();
    documents.peek()?;

    let seed = Node::Map(Mapping::from([(
        "scrape_configs".to_string(),
        Node::List(Vec::new()),
    )]));
    Some(documents.fold(seed, |merged, document| {
        deep_merge_documents(merged, &document)
    }))
}
