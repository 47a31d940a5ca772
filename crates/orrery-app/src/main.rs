//! `orrery`: open a window and explore the Earth and Moon.
//!
//! Startup order: CLI, config directory, config file, CLI overrides,
//! logging, validation, event loop.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use orrery_app::run_with_config;
use orrery_config::{CliArgs, Config, default_config_dir};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    // Logging is not up yet; keep the failure and report it once it is.
    let (mut config, load_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );

    if let Some(e) = load_error {
        warn!("Could not load {}: {e}; using defaults", config_dir.display());
    }
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        return ExitCode::FAILURE;
    }

    info!("Orrery starting");
    info!(
        "Window: {}x{} | vsync: {} | config: {}",
        config.window.width,
        config.window.height,
        config.window.vsync,
        config_dir.display()
    );

    match run_with_config(config, config_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Orrery stopped: {e}");
            ExitCode::FAILURE
        }
    }
}
