//! Built-in job templates: staging into the working directory and the
//! per-job rewrite.

pub mod rewriter;
pub mod staging;

use crate::fs::file_reader::FileReaderError;
use crate::fs::file_writer::WriteError;
use crate::yaml::YamlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("error reading template: `{0}`")]
    Read(#[from] FileReaderError),

    #[error("error writing template: `{0}`")]
    Write(#[from] WriteError),

    #[error("invalid template: `{0}`")]
    Yaml(#[from] YamlError),

    #[error("unresolved placeholder `{0}`")]
    UnresolvedPlaceholder(String),
}

/// `$$NAME$$`, the marker replaced by a value in a template.
pub fn placeholder_marker(name: &str) -> String {
    format!("$${name}$$")
}

/// Replaces the `$$NAME$$` marker of every `(name, value)` pair.
pub fn substitute(content: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(content.to_string(), |content, (name, value)| {
            content.replace(&placeholder_marker(name), value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_replaces_every_occurrence() {
        let content = "a: $$NODE_IP$$\nb: $$NODE_IP$$:$$PORT$$\nc: $$OTHER$$\n";
        let result = substitute(content, &[("NODE_IP", "10.0.0.1"), ("PORT", "9100")]);

        assert_eq!("a: 10.0.0.1\nb: 10.0.0.1:9100\nc: $$OTHER$$\n", result);
    }
}
