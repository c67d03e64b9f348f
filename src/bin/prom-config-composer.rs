use std::error::Error;

use tracing::info;

use prom_config_composer::{
    cli::Cli,
    composition::driver::CompositionDriver,
    config::{ComposerConfig, ComposerConfigLoader, ComposerConfigLoaderFile},
    environment::PodEnvironment,
    fs::LocalFile,
    logging::Logging,
};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::init_composer_cli();

    // init logging singleton
    Logging::try_init(cli.log_level())?;

    let mut config = match cli.get_config() {
        Some(path) => {
            info!(path = %path.display(), "loading composer config");
            ComposerConfigLoaderFile::new(&LocalFile, &path).load_config()?
        }
        None => ComposerConfig::default(),
    };
    if let Some(plane) = cli.plane() {
        config.plane = plane;
    }

    let env = PodEnvironment::from_process_env();
    let outcome = CompositionDriver::new(&LocalFile, &config).run(env);

    info!(
        plane = %outcome.plane,
        jobs = ?outcome.selected_jobs,
        no_defaults_enabled = outcome.no_defaults_enabled,
        "done"
    );
    Ok(())
}
