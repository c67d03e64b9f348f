pub mod cli;
pub mod composition;
pub mod config;
pub mod defaults;
pub mod environment;
pub mod fs;
pub mod logging;
pub mod registry;
pub mod settings;
pub mod template;
pub mod yaml;
