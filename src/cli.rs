use crate::registry::Plane;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
pub struct Cli {
    /// YAML file overriding the default input and output paths
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plane to compose, overrides the configuration file
    #[arg(short, long, value_enum)]
    plane: Option<Plane>,

    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

impl Cli {
    /// Parses command line arguments
    pub fn init_composer_cli() -> Self {
        Self::parse()
    }

    pub fn get_config(&self) -> Option<PathBuf> {
        self.config.clone()
    }

    pub fn plane(&self) -> Option<Plane> {
        self.plane
    }

    pub fn log_level(&self) -> Level {
        self.log_level
    }
}
