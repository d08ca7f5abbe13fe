//! The `loam` binary: headless terrain streaming run.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use loam_app::driver;
use loam_config::{CliArgs, Config, resolve_config_dir};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = match resolve_config_dir(args.config.clone()) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let (mut config, load_error) = match Config::load_or_create(&config_dir) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_cli_overrides(&args);

    let log_dir = log_dir(&config_dir);
    if let Err(e) = loam_log::init_logging(Some(&log_dir), Some(&config)) {
        eprintln!("failed to initialise logging: {e}");
    }
    if let Some(e) = load_error {
        warn!("{e}; continuing with defaults");
    }
    info!("config directory: {}", config_dir.display());

    match driver::run(&config) {
        Ok(report) => {
            if report.leaked_meshes > 0 {
                warn!("{} meshes still alive after shutdown", report.leaked_meshes);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Platform log directory, falling back to a `logs` folder beside the config.
fn log_dir(config_dir: &std::path::Path) -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("loam").join("logs"))
        .unwrap_or_else(|| config_dir.join("logs"))
}
