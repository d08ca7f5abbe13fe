//! Configuration for the terrain streamer.
//!
//! Settings persist to disk as `config.ron`. Every section defaults field by
//! field, so older or partial files keep loading. Command-line flags override
//! whatever was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, Config, DebugConfig, DriverConfig, MeshConfig, NoiseConfig, NoiseKindConfig,
    StreamConfig, default_config_dir, resolve_config_dir,
};
pub use error::ConfigError;
