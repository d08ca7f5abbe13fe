//! Configuration sections, their defaults, and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration.
pub const CONFIG_FILE: &str = "config.ron";

const APP_DIR: &str = "loam";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Chunk grid and residency window.
    pub stream: StreamConfig,
    /// Per-chunk mesh geometry.
    pub mesh: MeshConfig,
    /// Height noise.
    pub noise: NoiseConfig,
    /// Headless driver run.
    pub driver: DriverConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Chunk grid and residency window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamConfig {
    /// Grid cells per chunk side.
    pub chunk_size: u32,
    /// Chebyshev radius, in chunks, of the resident window.
    pub render_distance: u32,
    /// Material name bound to every chunk mesh.
    pub material: String,
}

/// Per-chunk mesh geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Local distance between neighbouring vertices.
    pub scale: f32,
    /// UV distance between neighbouring vertices.
    pub uv_scale: f32,
    /// Height sample multiplier.
    pub z_multiplier: f32,
}

/// Base gradient noise.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum NoiseKindConfig {
    /// Classic Perlin noise.
    #[default]
    Perlin,
    /// Simplex noise.
    Simplex,
}

/// Fractal height noise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    /// Generator seed.
    pub seed: u32,
    /// Base noise algorithm.
    pub kind: NoiseKindConfig,
    /// First-octave frequency in cycles per grid unit.
    pub frequency: f64,
    /// Added to sample coordinates before scaling by frequency.
    pub offset: f64,
    /// Octave count.
    pub octaves: u32,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Amplitude multiplier per octave.
    pub persistence: f64,
}

/// Headless driver run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DriverConfig {
    /// Simulation steps to run before shutting down.
    pub steps: u64,
    /// Observer speed in grid units per second.
    pub speed: f64,
    /// Heading in degrees, counter-clockwise from +X.
    pub heading_deg: f64,
    /// Observer start position `(x, y)` in grid units.
    pub start: (f64, f64),
    /// Pace steps against the wall clock instead of running flat out.
    pub realtime: bool,
    /// Byte budget for the in-memory mesh sink. `None` is unlimited.
    pub sink_budget_bytes: Option<usize>,
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g. "debug", "info,loam_stream=trace").
    pub log_level: String,
    /// Also write JSON logs to the log directory.
    pub log_to_file: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            chunk_size: 100,
            render_distance: 3,
            material: "M_Terrain".to_string(),
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            scale: 100.0,
            uv_scale: 1.0,
            z_multiplier: 1000.0,
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            kind: NoiseKindConfig::Perlin,
            frequency: 0.01,
            offset: 1.0,
            octaves: 3,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            steps: 600,
            speed: 250.0,
            heading_deg: 0.0,
            start: (0.0, 0.0),
            realtime: false,
            sink_budget_bytes: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

/// Per-user config directory, e.g. `~/.config/loam` on Linux.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// The directory given on the command line, else [`default_config_dir`].
pub fn resolve_config_dir(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    explicit
        .or_else(default_config_dir)
        .ok_or(ConfigError::NoConfigDir)
}

impl Config {
    /// Load `config.ron` from `config_dir`, or write and return the defaults
    /// if the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save as `config.ron` in `config_dir`, creating the directory if needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(false)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        let config_path = config_dir.join(CONFIG_FILE);
        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path,
            source,
        })
    }

    /// Re-read `config.ron`: `Some(new)` if it differs from `self`, `None`
    /// otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
