use crate::fs::file_writer::{FileWriter, WriteError};
use std::path::Path;

/// `NAME=value` lines sourced by the collector start-up scripts.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EnvFile {
    lines: Vec<(String, String)>,
}

impl EnvFile {
    pub fn push<V: ToString>(&mut self, name: &str, value: V) {
        self.lines.push((name.to_string(), value.to_string()));
    }

    /// Adds a single-quoted value, for values the shell must not expand.
    pub fn push_quoted(&mut self, name: &str, value: &str) {
        self.lines.push((name.to_string(), format!("'{value}'")));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|(line_name, _)| line_name == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|(name, value)| format!("{name}={value}\n"))
            .collect()
    }

    pub fn write<W: FileWriter>(&self, writer: &W, path: &Path) -> Result<(), WriteError> {
        writer.write(path, self.render())
    }
}
