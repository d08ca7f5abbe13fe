//! Command-line overrides.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Headless terrain streamer.
///
/// Flags override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "loam", about = "Stream infinite heightfield terrain around a moving observer")]
pub struct CliArgs {
    /// Grid cells per chunk side.
    #[arg(long)]
    pub chunk_size: Option<u32>,

    /// Render distance in chunks.
    #[arg(long)]
    pub render_distance: Option<u32>,

    /// Noise seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Simulation steps to run.
    #[arg(long)]
    pub steps: Option<u64>,

    /// Observer speed in grid units per second.
    #[arg(long)]
    pub speed: Option<f64>,

    /// Observer heading in degrees, counter-clockwise from +X.
    #[arg(long)]
    pub heading: Option<f64>,

    /// Pace steps against the wall clock.
    #[arg(long)]
    pub realtime: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(size) = args.chunk_size {
            self.stream.chunk_size = size;
        }
        if let Some(rd) = args.render_distance {
            self.stream.render_distance = rd;
        }
        if let Some(seed) = args.seed {
            self.noise.seed = seed;
        }
        if let Some(steps) = args.steps {
            self.driver.steps = steps;
        }
        if let Some(speed) = args.speed {
            self.driver.speed = speed;
        }
        if let Some(heading) = args.heading {
            self.driver.heading_deg = heading;
        }
        if args.realtime {
            self.driver.realtime = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            render_distance: Some(5),
            seed: Some(42),
            speed: Some(12.5),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.stream.render_distance, 5);
        assert_eq!(config.noise.seed, 42);
        assert_eq!(config.driver.speed, 12.5);
        // Untouched fields keep their defaults.
        assert_eq!(config.stream.chunk_size, 100);
        assert_eq!(config.driver.steps, 600);
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "loam",
            "--chunk-size",
            "64",
            "--steps",
            "10",
            "--realtime",
            "--config",
            "/tmp/loam",
        ])
        .unwrap();
        assert_eq!(args.chunk_size, Some(64));
        assert_eq!(args.steps, Some(10));
        assert!(args.realtime);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/loam")));
    }
}
